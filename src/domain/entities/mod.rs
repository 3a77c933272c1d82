pub mod category;
pub mod media;

pub use category::*;
pub use media::*;

/// A domain object tracked by the persistence layer.
///
/// Lifecycle notifications carry any entity; only entities exposing the media
/// capability are forwarded to a provider.
pub trait Entity: Send + Sync {
    /// Short name used in logs
    fn entity_name(&self) -> &'static str;

    fn as_media(&self) -> Option<&Media> {
        None
    }

    fn as_media_mut(&mut self) -> Option<&mut Media> {
        None
    }
}
