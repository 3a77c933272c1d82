use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{MediaProvider, ProviderError};
use crate::domain::entities::{Media, MediaId};
use crate::domain::value_objects::{ContentHash, ProviderStatus};
use crate::infrastructure::storage::{FileStorage, detect_content_type, sharded_path};

/// Stores uploads as-is under a content-addressed reference.
///
/// Stale files (a replaced upload, or everything belonging to a removed media)
/// are collected in the pre hooks and only deleted by the matching post hook,
/// so nothing is lost if the write rolls back. Every pre hook cycle starts
/// from an empty queue: paths left behind by a failed write are dropped, never
/// deleted by a later flush of the same media.
pub struct FileProvider {
    name: String,
    storage: Arc<dyn FileStorage>,
    retired: Mutex<HashMap<MediaId, Vec<String>>>,
}

impl FileProvider {
    pub fn new(storage: Arc<dyn FileStorage>) -> Self {
        Self::with_name("file", storage)
    }

    /// File handling registered under another provider name
    pub fn with_name(name: impl Into<String>, storage: Arc<dyn FileStorage>) -> Self {
        Self { name: name.into(), storage, retired: Mutex::new(HashMap::new()) }
    }

    pub fn storage(&self) -> &Arc<dyn FileStorage> {
        &self.storage
    }

    /// Storage path of the media's main file
    pub fn reference_path(media: &Media) -> Option<String> {
        media.provider_reference.as_deref().map(|reference| sharded_path(&media.context, reference))
    }

    /// Schedule `paths` for deletion by the next `post_update`/`post_remove` of `id`
    pub async fn retire(&self, id: MediaId, paths: Vec<String>) {
        if paths.is_empty() {
            return;
        }
        self.retired.lock().await.entry(id).or_default().extend(paths);
    }

    /// Drop every path scheduled for `id` without deleting it
    pub async fn forget_retired(&self, id: MediaId) {
        if let Some(paths) = self.retired.lock().await.remove(&id) {
            debug!(
                provider = %self.name,
                media_id = %id,
                count = paths.len(),
                "Dropped file deletions left by an unfinished write"
            );
        }
    }

    /// Paths scheduled for deletion for `id`
    pub async fn retired_paths(&self, id: MediaId) -> Vec<String> {
        self.retired.lock().await.get(&id).cloned().unwrap_or_default()
    }

    /// Write pending binary content, returning whether anything was written
    async fn write_binary_content(&self, media: &mut Media) -> Result<bool, ProviderError> {
        let Some(content) = media.binary_content.take() else {
            return Ok(false);
        };

        let Some(path) = Self::reference_path(media) else {
            media.binary_content = Some(content);
            return Err(ProviderError::InvalidContent {
                message: format!("media {} has content but no provider reference", media.id),
            });
        };

        if let Err(e) = self.storage.store(&path, &content.bytes).await {
            media.binary_content = Some(content);
            return Err(e.into());
        }

        debug!(provider = %self.name, media_id = %media.id, path = %path, "Stored media file");
        Ok(true)
    }

    async fn delete_retired(&self, id: MediaId) -> Result<(), ProviderError> {
        let paths = self.retired.lock().await.remove(&id).unwrap_or_default();

        for path in paths {
            if self.storage.delete(&path).await? {
                info!(provider = %self.name, media_id = %id, path = %path, "Deleted media file");
            } else {
                warn!(
                    provider = %self.name,
                    media_id = %id,
                    path = %path,
                    "Media file not found in storage (may have been already deleted)"
                );
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for FileProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileProvider").field("name", &self.name).finish_non_exhaustive()
    }
}

#[async_trait]
impl MediaProvider for FileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.forget_retired(media.id).await;

        let Some(content) = media.binary_content.as_ref() else {
            return Ok(());
        };

        if content.bytes.is_empty() {
            return Err(ProviderError::InvalidContent {
                message: format!("uploaded file `{}` is empty", content.filename),
            });
        }

        let reference = ContentHash::of(&content.bytes).reference(content.extension().as_deref());
        let content_type = detect_content_type(&content.bytes, Some(&content.filename));
        let filename = content.filename.clone();
        let size = content.bytes.len() as u64;

        let replaced = media.provider_reference.as_deref() != Some(reference.as_str());
        if media.id.is_assigned() && replaced {
            if let Some(previous) = Self::reference_path(media) {
                self.retire(media.id, vec![previous]).await;
            }
        }

        media.provider_reference = Some(reference);
        media.content_type = Some(content_type);
        media.size = Some(size);
        media.set_metadata_value("filename", json!(filename));
        if media.name.is_none() {
            media.name = Some(filename);
        }
        media.set_provider_status(ProviderStatus::Ok);

        Ok(())
    }

    async fn pre_persist(&self, media: &mut Media) -> Result<(), ProviderError> {
        let now = Utc::now();
        media.created_at = Some(now);
        media.updated_at = Some(now);
        Ok(())
    }

    async fn post_persist(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.write_binary_content(media).await?;
        Ok(())
    }

    async fn pre_update(&self, media: &mut Media) -> Result<(), ProviderError> {
        media.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn post_update(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.write_binary_content(media).await?;
        self.delete_retired(media.id).await
    }

    async fn pre_remove(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.forget_retired(media.id).await;
        if let Some(path) = Self::reference_path(media) {
            self.retire(media.id, vec![path]).await;
        }
        Ok(())
    }

    async fn post_remove(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.delete_retired(media.id).await
    }
}
