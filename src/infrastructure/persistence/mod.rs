//! In-process persistence: change tracking, a flush-ordering session and
//! in-memory repositories.

mod change_tracker;
mod in_memory;
mod session;
mod unit_of_work;

pub use change_tracker::{ChangeTracker, NoopChangeTracker};
pub use in_memory::{InMemoryCategoryManager, InMemoryMediaRepository};
pub use session::MediaSession;
pub use unit_of_work::{ChangeSet, FieldChange, UnitOfWork};

use crate::domain::entities::MediaId;

/// Errors raised by change tracking
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Media {0} is not managed by this unit of work")]
    UnmanagedEntity(MediaId),

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
