#[cfg(test)]
pub mod mocks {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use crate::application::providers::{MediaProvider, ProviderError};
    use crate::domain::entities::Media;
    use crate::infrastructure::storage::{FileStorage, StorageError};

    /// Provider that records every hook call by name
    #[derive(Debug)]
    pub struct RecordingProvider {
        name: String,
        calls: Arc<Mutex<Vec<String>>>,
        fail_on: Option<&'static str>,
        update_description: Option<String>,
    }

    impl RecordingProvider {
        pub fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                calls: Arc::new(Mutex::new(Vec::new())),
                fail_on: None,
                update_description: None,
            }
        }

        /// Shared log of hook names, in call order
        pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.calls)
        }

        /// Fail the named hook with `ProviderError::InvalidContent`
        #[must_use]
        pub fn failing_on(mut self, hook: &'static str) -> Self {
            self.fail_on = Some(hook);
            self
        }

        /// Overwrite the description during `pre_update`
        #[must_use]
        pub fn describing_on_update(mut self, description: &str) -> Self {
            self.update_description = Some(description.to_string());
            self
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        fn record(&self, hook: &'static str) -> Result<(), ProviderError> {
            self.calls.lock().unwrap().push(hook.to_string());
            if self.fail_on == Some(hook) {
                return Err(ProviderError::InvalidContent { message: format!("{hook} failed") });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MediaProvider for RecordingProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn transform(&self, _media: &mut Media) -> Result<(), ProviderError> {
            self.record("transform")
        }

        async fn pre_persist(&self, _media: &mut Media) -> Result<(), ProviderError> {
            self.record("pre_persist")
        }

        async fn post_persist(&self, _media: &mut Media) -> Result<(), ProviderError> {
            self.record("post_persist")
        }

        async fn pre_update(&self, media: &mut Media) -> Result<(), ProviderError> {
            self.record("pre_update")?;
            if let Some(description) = &self.update_description {
                media.description = Some(description.clone());
            }
            Ok(())
        }

        async fn post_update(&self, _media: &mut Media) -> Result<(), ProviderError> {
            self.record("post_update")
        }

        async fn pre_remove(&self, _media: &mut Media) -> Result<(), ProviderError> {
            self.record("pre_remove")
        }

        async fn post_remove(&self, _media: &mut Media) -> Result<(), ProviderError> {
            self.record("post_remove")
        }
    }

    /// File storage backed by a map, for provider tests
    #[derive(Debug, Default)]
    pub struct InMemoryStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
        fail_store: bool,
    }

    impl InMemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_store_failure(mut self) -> Self {
            self.fail_store = true;
            self
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        pub fn get(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned()
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        pub fn len(&self) -> usize {
            self.files.lock().unwrap().len()
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        pub fn is_empty(&self) -> bool {
            self.files.lock().unwrap().is_empty()
        }
    }

    #[async_trait]
    impl FileStorage for InMemoryStorage {
        async fn store(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
            if self.fail_store {
                return Err(StorageError::IoError { message: "disk full".to_string() });
            }
            self.files.lock().unwrap().insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn retrieve(&self, path: &str) -> Result<Vec<u8>, StorageError> {
            self.get(path).ok_or_else(|| StorageError::FileNotFound { path: path.to_string() })
        }

        async fn exists(&self, path: &str) -> Result<bool, StorageError> {
            Ok(self.files.lock().unwrap().contains_key(path))
        }

        async fn delete(&self, path: &str) -> Result<bool, StorageError> {
            Ok(self.files.lock().unwrap().remove(path).is_some())
        }

        fn get_path(&self, path: &str) -> String {
            format!("memory://{path}")
        }
    }
}
