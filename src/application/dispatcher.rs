//! Bridges persistence lifecycle notifications to media providers.
//!
//! Every notification carries an arbitrary entity. Entities that are not media,
//! and media whose provider is not registered, are skipped without error.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::application::category_cache::RootCategoryCache;
use crate::application::error::LifecycleError;
use crate::application::providers::{MediaProvider, ProviderError, ProviderPool};
use crate::domain::entities::{Entity, Media};
use crate::domain::value_objects::LifecycleEvent;
use crate::infrastructure::persistence::ChangeTracker;

/// Payload of a lifecycle notification: the affected entity and the change
/// tracking of the session that is flushing it
pub struct LifecycleEventArgs<'a> {
    pub entity: &'a mut dyn Entity,
    pub tracker: &'a mut dyn ChangeTracker,
}

impl<'a> LifecycleEventArgs<'a> {
    pub fn new(entity: &'a mut dyn Entity, tracker: &'a mut dyn ChangeTracker) -> Self {
        Self { entity, tracker }
    }
}

/// Forwards lifecycle notifications for media entities to their provider
pub struct MediaEventSubscriber {
    pool: Arc<ProviderPool>,
    root_categories: Option<RootCategoryCache>,
}

impl MediaEventSubscriber {
    pub fn new(pool: Arc<ProviderPool>) -> Self {
        Self { pool, root_categories: None }
    }

    /// Enable default category assignment backed by `cache`
    #[must_use]
    pub fn with_root_categories(mut self, cache: RootCategoryCache) -> Self {
        self.root_categories = Some(cache);
        self
    }

    pub fn pool(&self) -> &ProviderPool {
        &self.pool
    }

    pub fn subscribed_events(&self) -> &'static [LifecycleEvent] {
        &LifecycleEvent::ALL
    }

    /// Provider registered for `entity`, if it is a media entity
    pub fn resolve_provider(&self, entity: &dyn Entity) -> Option<Arc<dyn MediaProvider>> {
        let Some(media) = entity.as_media() else {
            trace!(entity = entity.entity_name(), "Not a media entity, skipping");
            return None;
        };

        let provider = self.pool.get_provider(&media.provider_name);
        if provider.is_none() {
            debug!(
                media_id = %media.id,
                provider = %media.provider_name,
                "No provider registered for media, skipping"
            );
        }
        provider
    }

    /// Route `event` to the matching hook
    pub async fn dispatch(
        &self,
        event: LifecycleEvent,
        args: LifecycleEventArgs<'_>,
    ) -> Result<(), LifecycleError> {
        match event {
            LifecycleEvent::PrePersist => self.pre_persist(args).await,
            LifecycleEvent::PreUpdate => self.pre_update(args).await,
            LifecycleEvent::PreRemove => self.pre_remove(args).await,
            LifecycleEvent::PostPersist => self.post_persist(args).await,
            LifecycleEvent::PostUpdate => self.post_update(args).await,
            LifecycleEvent::PostRemove => self.post_remove(args).await,
        }
    }

    pub async fn pre_persist(&self, args: LifecycleEventArgs<'_>) -> Result<(), LifecycleError> {
        let event = LifecycleEvent::PrePersist;
        let Some((media, provider)) = self.media_with_provider(args.entity) else {
            return Ok(());
        };

        provider.transform(media).await.map_err(provider_error(&*provider, event))?;
        provider.pre_persist(media).await.map_err(provider_error(&*provider, event))
    }

    /// Providers mutate the media after the session computed its change-set,
    /// so the change-set is recomputed before the write
    pub async fn pre_update(&self, args: LifecycleEventArgs<'_>) -> Result<(), LifecycleError> {
        let event = LifecycleEvent::PreUpdate;
        let Some((media, provider)) = self.media_with_provider(args.entity) else {
            return Ok(());
        };

        provider.transform(media).await.map_err(provider_error(&*provider, event))?;
        provider.pre_update(media).await.map_err(provider_error(&*provider, event))?;

        args.tracker.recompute_single_entity_change_set(media)?;
        Ok(())
    }

    pub async fn pre_remove(&self, args: LifecycleEventArgs<'_>) -> Result<(), LifecycleError> {
        let event = LifecycleEvent::PreRemove;
        let Some((media, provider)) = self.media_with_provider(args.entity) else {
            return Ok(());
        };

        provider.pre_remove(media).await.map_err(provider_error(&*provider, event))
    }

    pub async fn post_persist(&self, args: LifecycleEventArgs<'_>) -> Result<(), LifecycleError> {
        let event = LifecycleEvent::PostPersist;
        let Some((media, provider)) = self.media_with_provider(args.entity) else {
            return Ok(());
        };

        provider.post_persist(media).await.map_err(provider_error(&*provider, event))
    }

    pub async fn post_update(&self, args: LifecycleEventArgs<'_>) -> Result<(), LifecycleError> {
        let event = LifecycleEvent::PostUpdate;
        let Some((media, provider)) = self.media_with_provider(args.entity) else {
            return Ok(());
        };

        provider.post_update(media).await.map_err(provider_error(&*provider, event))
    }

    pub async fn post_remove(&self, args: LifecycleEventArgs<'_>) -> Result<(), LifecycleError> {
        let event = LifecycleEvent::PostRemove;
        let Some((media, provider)) = self.media_with_provider(args.entity) else {
            return Ok(());
        };

        provider.post_remove(media).await.map_err(provider_error(&*provider, event))
    }

    /// Give a media without category the root category of its context.
    ///
    /// # Errors
    /// `LifecycleError::Configuration` when the context has no root category.
    pub async fn assign_default_category(
        &self,
        entity: &mut dyn Entity,
    ) -> Result<(), LifecycleError> {
        let Some(media) = entity.as_media_mut() else {
            return Ok(());
        };
        if media.category.is_some() {
            return Ok(());
        }
        let Some(cache) = &self.root_categories else {
            return Ok(());
        };

        let category = cache.get(&media.context).await?;
        debug!(
            media_id = %media.id,
            context = %media.context,
            category = %category.id,
            "Assigned root category to media"
        );
        media.category = Some(category);

        Ok(())
    }

    /// Flush boundary: lets the category cache apply its refresh policy
    pub async fn begin_flush(&self) {
        if let Some(cache) = &self.root_categories {
            cache.on_flush_start().await;
        }
    }

    pub async fn invalidate_root_categories(&self) {
        if let Some(cache) = &self.root_categories {
            cache.invalidate().await;
        }
    }

    fn media_with_provider<'e>(
        &self,
        entity: &'e mut dyn Entity,
    ) -> Option<(&'e mut Media, Arc<dyn MediaProvider>)> {
        let provider = self.resolve_provider(&*entity)?;
        let media = entity.as_media_mut()?;
        Some((media, provider))
    }
}

impl std::fmt::Debug for MediaEventSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaEventSubscriber")
            .field("pool", &self.pool)
            .field("root_categories", &self.root_categories)
            .finish()
    }
}

fn provider_error(
    provider: &dyn MediaProvider,
    event: LifecycleEvent,
) -> impl FnOnce(ProviderError) -> LifecycleError {
    let provider = provider.name().to_string();
    move |source| LifecycleError::Provider { provider, event, source }
}
