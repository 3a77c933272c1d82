use thiserror::Error;

use crate::application::providers::ProviderError;
use crate::domain::repositories::RepositoryError;
use crate::domain::value_objects::LifecycleEvent;
use crate::infrastructure::persistence::PersistenceError;

/// Errors surfaced by lifecycle handling, propagated into the flush that
/// triggered them
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Deployment mistake: a context has no root category. Not retried.
    #[error("There is no main category related to context: {context}")]
    Configuration { context: String },

    #[error("Provider `{provider}` failed during {event}: {source}")]
    Provider {
        provider: String,
        event: LifecycleEvent,
        #[source]
        source: ProviderError,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl LifecycleError {
    /// Get the error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            LifecycleError::Configuration { .. } => "configuration",
            LifecycleError::Provider { .. } => "provider",
            LifecycleError::Persistence(_) => "persistence",
            LifecycleError::Repository(_) => "repository",
        }
    }

    /// Whether retrying the flush could succeed without operator action
    pub fn is_retryable(&self) -> bool {
        matches!(self, LifecycleError::Repository(RepositoryError::Unavailable { .. }))
    }
}
