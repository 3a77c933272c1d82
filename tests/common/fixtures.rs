use async_trait::async_trait;
use media_lifecycle::application::providers::{MediaProvider, ProviderError, ProviderPool};
use media_lifecycle::domain::entities::{Category, Entity, Media};
use media_lifecycle::infrastructure::persistence::InMemoryCategoryManager;
use mockall::mock;
use std::sync::Arc;

/// The hooks of a provider, split from its name so they can be mocked
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    async fn transform(&self, media: &mut Media) -> Result<(), ProviderError>;
    async fn pre_persist(&self, media: &mut Media) -> Result<(), ProviderError>;
    async fn post_persist(&self, media: &mut Media) -> Result<(), ProviderError>;
    async fn pre_update(&self, media: &mut Media) -> Result<(), ProviderError>;
    async fn post_update(&self, media: &mut Media) -> Result<(), ProviderError>;
    async fn pre_remove(&self, media: &mut Media) -> Result<(), ProviderError>;
    async fn post_remove(&self, media: &mut Media) -> Result<(), ProviderError>;
}

mock! {
    pub ProviderHooks {}

    #[async_trait]
    impl LifecycleHooks for ProviderHooks {
        async fn transform(&self, media: &mut Media) -> Result<(), ProviderError>;
        async fn pre_persist(&self, media: &mut Media) -> Result<(), ProviderError>;
        async fn post_persist(&self, media: &mut Media) -> Result<(), ProviderError>;
        async fn pre_update(&self, media: &mut Media) -> Result<(), ProviderError>;
        async fn post_update(&self, media: &mut Media) -> Result<(), ProviderError>;
        async fn pre_remove(&self, media: &mut Media) -> Result<(), ProviderError>;
        async fn post_remove(&self, media: &mut Media) -> Result<(), ProviderError>;
    }
}

/// Provider whose hooks are mockall expectations.
///
/// Hooks without an expectation panic when called.
pub struct MockedProvider {
    name: String,
    hooks: MockProviderHooks,
}

impl MockedProvider {
    pub fn new(name: &str, hooks: MockProviderHooks) -> Self {
        Self { name: name.to_string(), hooks }
    }
}

#[async_trait]
impl MediaProvider for MockedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.hooks.transform(media).await
    }

    async fn pre_persist(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.hooks.pre_persist(media).await
    }

    async fn post_persist(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.hooks.post_persist(media).await
    }

    async fn pre_update(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.hooks.pre_update(media).await
    }

    async fn post_update(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.hooks.post_update(media).await
    }

    async fn pre_remove(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.hooks.pre_remove(media).await
    }

    async fn post_remove(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.hooks.post_remove(media).await
    }
}

/// Pool holding a single mocked provider
pub fn pool_with(name: &str, hooks: MockProviderHooks) -> Arc<ProviderPool> {
    Arc::new(ProviderPool::default().with_provider(Arc::new(MockedProvider::new(name, hooks))))
}

/// Tracked entity unrelated to media
#[derive(Debug, Default)]
pub struct Tag {
    pub label: String,
}

impl Entity for Tag {
    fn entity_name(&self) -> &'static str {
        "tag"
    }
}

/// Category manager with one root category per given context
pub async fn category_manager(contexts: &[&str]) -> Arc<InMemoryCategoryManager> {
    let manager = Arc::new(InMemoryCategoryManager::new());
    for context in contexts {
        manager.add(Category::root(format!("{context} root"), *context)).await;
    }
    manager
}
