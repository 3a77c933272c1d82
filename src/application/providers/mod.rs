//! Media providers: one strategy per media kind, looked up by name.

use async_trait::async_trait;

mod file;
mod image;
mod pool;

pub use file::FileProvider;
pub use image::ImageProvider;
pub use pool::{MediaContext, ProviderPool, ThumbnailFormat};

use crate::domain::entities::Media;
use crate::infrastructure::storage::StorageError;

/// Errors raised inside provider hooks
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid content: {message}")]
    InvalidContent { message: String },

    #[error("Image processing error: {0}")]
    Image(#[from] ::image::ImageError),
}

/// Processing hooks for one kind of media.
///
/// The subscriber calls `transform` before `pre_persist` and `pre_update`.
/// Pre hooks run before the write and may mutate the media; post hooks run
/// once the write is durable and are where external side effects belong.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Name stored in `Media::provider_name`
    fn name(&self) -> &str;

    /// Derive provider fields (reference, metadata, dimensions) from pending content
    async fn transform(&self, media: &mut Media) -> Result<(), ProviderError>;

    async fn pre_persist(&self, media: &mut Media) -> Result<(), ProviderError>;

    async fn post_persist(&self, media: &mut Media) -> Result<(), ProviderError>;

    async fn pre_update(&self, media: &mut Media) -> Result<(), ProviderError>;

    async fn post_update(&self, media: &mut Media) -> Result<(), ProviderError>;

    async fn pre_remove(&self, media: &mut Media) -> Result<(), ProviderError>;

    async fn post_remove(&self, media: &mut Media) -> Result<(), ProviderError>;
}

impl std::fmt::Debug for dyn MediaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaProvider")
            .field("name", &self.name())
            .finish()
    }
}
