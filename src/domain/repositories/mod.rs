use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::{Category, Media, MediaId};

/// Errors raised by repository implementations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Media not found: {0}")]
    NotFound(MediaId),

    #[error("Media {0} is already persisted")]
    AlreadyPersisted(MediaId),

    #[error("Repository unavailable: {message}")]
    Unavailable { message: String },
}

/// Repository trait for media persistence
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Insert a new media and return the assigned id
    async fn insert(&self, media: &Media) -> Result<MediaId, RepositoryError>;

    /// Overwrite an existing media
    async fn update(&self, media: &Media) -> Result<(), RepositoryError>;

    /// Delete media by ID, returning whether a row was removed
    async fn delete(&self, id: MediaId) -> Result<bool, RepositoryError>;

    async fn find_by_id(&self, id: MediaId) -> Result<Option<Media>, RepositoryError>;
}

/// Read access to the classification tree
#[async_trait]
pub trait CategoryManager: Send + Sync {
    /// Root categories keyed by context.
    ///
    /// `include_children` lets store-backed implementations eagerly load each
    /// root's subtree. Media lifecycle handling passes `false`.
    async fn get_root_categories(
        &self,
        include_children: bool,
    ) -> Result<HashMap<String, Category>, RepositoryError>;
}
