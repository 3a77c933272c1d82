use async_trait::async_trait;

mod filesystem_storage;
pub mod utils;

pub use filesystem_storage::FilesystemStorage;
pub use utils::*;

/// Error types for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::IoError { message: error.to_string() }
    }
}

/// Binary storage used by providers, addressed by relative paths
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Write `bytes` at `path`, replacing any previous content
    async fn store(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    async fn retrieve(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete the file at `path`; `Ok(false)` when nothing was there
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// Location of `path` in the backing store (for serving or logging)
    fn get_path(&self, path: &str) -> String;
}
