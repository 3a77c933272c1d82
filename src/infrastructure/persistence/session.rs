use std::sync::Arc;

use tracing::{debug, info};

use super::{ChangeSet, PersistenceError, UnitOfWork};
use crate::application::dispatcher::{LifecycleEventArgs, MediaEventSubscriber};
use crate::application::error::LifecycleError;
use crate::domain::entities::{Media, MediaId};
use crate::domain::repositories::{MediaRepository, RepositoryError};

/// Minimal entity manager: writes media through a repository and emits the
/// lifecycle notifications around each write.
///
/// Pre hooks run before the write and may still change what is written. Post
/// hooks run only after a successful write.
pub struct MediaSession<R: MediaRepository + ?Sized> {
    repository: Arc<R>,
    subscriber: Arc<MediaEventSubscriber>,
    unit_of_work: UnitOfWork,
}

impl<R: MediaRepository + ?Sized> MediaSession<R> {
    pub fn new(repository: Arc<R>, subscriber: Arc<MediaEventSubscriber>) -> Self {
        Self { repository, subscriber, unit_of_work: UnitOfWork::new() }
    }

    pub fn unit_of_work(&self) -> &UnitOfWork {
        &self.unit_of_work
    }

    pub fn subscriber(&self) -> &MediaEventSubscriber {
        &self.subscriber
    }

    /// Insert a new media; its id is set on success
    pub async fn persist(&mut self, media: &mut Media) -> Result<MediaId, LifecycleError> {
        self.subscriber.begin_flush().await;
        self.subscriber.assign_default_category(media).await?;

        self.subscriber.pre_persist(LifecycleEventArgs::new(media, &mut self.unit_of_work)).await?;

        let id = self.repository.insert(media).await?;
        media.id = id;
        self.unit_of_work.mark_persisted(media)?;

        self.subscriber.post_persist(LifecycleEventArgs::new(media, &mut self.unit_of_work)).await?;

        info!(media_id = %id, provider = %media.provider_name, "Persisted media");
        Ok(id)
    }

    /// Write the changes of a managed media, returning the change-set written
    pub async fn update(&mut self, media: &mut Media) -> Result<ChangeSet, LifecycleError> {
        if !self.unit_of_work.is_managed(media.id) {
            return Err(PersistenceError::UnmanagedEntity(media.id).into());
        }
        self.subscriber.begin_flush().await;

        let change_set = self.unit_of_work.compute_change_set(media)?;
        if change_set.is_empty() && media.binary_content.is_none() {
            debug!(media_id = %media.id, "No changes to write");
            return Ok(change_set);
        }

        self.subscriber.pre_update(LifecycleEventArgs::new(media, &mut self.unit_of_work)).await?;

        let change_set = self.unit_of_work.take_change_set(media.id);
        if !change_set.is_empty() {
            self.repository.update(media).await?;
            self.unit_of_work.mark_persisted(media)?;
        }

        self.subscriber.post_update(LifecycleEventArgs::new(media, &mut self.unit_of_work)).await?;

        info!(media_id = %media.id, fields = change_set.len(), "Updated media");
        Ok(change_set)
    }

    pub async fn remove(&mut self, media: &mut Media) -> Result<(), LifecycleError> {
        self.subscriber.begin_flush().await;

        self.subscriber.pre_remove(LifecycleEventArgs::new(media, &mut self.unit_of_work)).await?;

        if !self.repository.delete(media.id).await? {
            return Err(RepositoryError::NotFound(media.id).into());
        }
        self.unit_of_work.detach(media.id);

        self.subscriber.post_remove(LifecycleEventArgs::new(media, &mut self.unit_of_work)).await?;

        info!(media_id = %media.id, "Removed media");
        Ok(())
    }

    /// Load a media and start tracking it.
    ///
    /// The snapshot is taken before the default category is assigned, so an
    /// assignment made here is written by the next `update`.
    pub async fn find(&mut self, id: MediaId) -> Result<Option<Media>, LifecycleError> {
        let Some(mut media) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        self.unit_of_work.mark_persisted(&media)?;
        self.subscriber.assign_default_category(&mut media).await?;

        Ok(Some(media))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::providers::ProviderPool;
    use crate::infrastructure::persistence::InMemoryMediaRepository;
    use crate::test_utils::mocks::RecordingProvider;

    fn session_with(
        provider: RecordingProvider,
    ) -> (MediaSession<InMemoryMediaRepository>, Arc<InMemoryMediaRepository>) {
        let pool = ProviderPool::default().with_provider(Arc::new(provider));
        let subscriber = Arc::new(MediaEventSubscriber::new(Arc::new(pool)));
        let repository = Arc::new(InMemoryMediaRepository::new());
        (MediaSession::new(repository.clone(), subscriber), repository)
    }

    #[tokio::test]
    async fn test_persist_orders_hooks_around_insert() {
        let provider = RecordingProvider::new("file");
        let calls = provider.calls();
        let (mut session, repository) = session_with(provider);
        let mut media = Media::new("file", "default");

        let id = session.persist(&mut media).await.unwrap();

        assert_eq!(media.id, id);
        assert!(session.unit_of_work().is_managed(id));
        assert!(repository.find_by_id(id).await.unwrap().is_some());
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            ["transform", "pre_persist", "post_persist"]
        );
    }

    #[tokio::test]
    async fn test_update_without_changes_skips_hooks() {
        let provider = RecordingProvider::new("file");
        let calls = provider.calls();
        let (mut session, _) = session_with(provider);
        let mut media = Media::new("file", "default");
        session.persist(&mut media).await.unwrap();
        calls.lock().unwrap().clear();

        let change_set = session.update(&mut media).await.unwrap();

        assert!(change_set.is_empty());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unmanaged_media_fails() {
        let (mut session, _) = session_with(RecordingProvider::new("file"));
        let mut media = Media::new("file", "default");

        let result = session.update(&mut media).await;

        assert!(matches!(result, Err(LifecycleError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_remove_missing_row_skips_post_hook() {
        let provider = RecordingProvider::new("file");
        let calls = provider.calls();
        let (mut session, _) = session_with(provider);
        let mut media = Media::new("file", "default");
        media.id = MediaId::new(42);

        let result = session.remove(&mut media).await;

        assert!(matches!(result, Err(LifecycleError::Repository(RepositoryError::NotFound(_)))));
        assert_eq!(calls.lock().unwrap().as_slice(), ["pre_remove"]);
    }

    #[tokio::test]
    async fn test_find_tracks_loaded_media() {
        let (mut session, repository) = session_with(RecordingProvider::new("file"));
        let id = repository.insert(&Media::new("file", "default")).await.unwrap();

        let found = session.find(id).await.unwrap().unwrap();

        assert_eq!(found.id, id);
        assert!(session.unit_of_work().is_managed(id));
    }

    #[tokio::test]
    async fn test_find_after_remove_returns_none() {
        let (mut session, _) = session_with(RecordingProvider::new("file"));
        let mut media = Media::new("file", "default");
        let id = session.persist(&mut media).await.unwrap();

        session.remove(&mut media).await.unwrap();

        assert!(!session.unit_of_work().is_managed(id));
        assert!(session.find(id).await.unwrap().is_none());
    }
}
