use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{FileStorage, StorageError, utils::validate_relative_path};

/// Filesystem-backed storage rooted at a base directory
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    base_path: PathBuf,
}

impl FilesystemStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    fn full_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        validate_relative_path(path)?;
        Ok(self.base_path.join(path))
    }

    /// Ensure directory structure exists for a file
    async fn ensure_directory(&self, file_path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Clean up empty directories (best effort, ignore errors)
    async fn cleanup_empty_directories(&self, mut dir_path: &Path) {
        while dir_path != self.base_path && dir_path.starts_with(&self.base_path) {
            match fs::read_dir(dir_path).await {
                Ok(mut entries) => {
                    if entries.next_entry().await.unwrap_or(None).is_some() {
                        break;
                    }

                    if fs::remove_dir(dir_path).await.is_err() {
                        break;
                    }

                    tracing::debug!("Cleaned up empty directory: {}", dir_path.display());
                }
                Err(_) => break,
            }

            match dir_path.parent() {
                Some(parent) => dir_path = parent,
                None => break,
            }
        }
    }
}

#[async_trait]
impl FileStorage for FilesystemStorage {
    async fn store(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let file_path = self.full_path(path)?;
        self.ensure_directory(&file_path).await?;

        // Write to a sibling temp file, then rename into place
        let temp_path = file_path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
        }
        fs::rename(&temp_path, &file_path).await?;

        tracing::info!("Stored file at path: {}", file_path.display());
        Ok(())
    }

    async fn retrieve(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let file_path = self.full_path(path)?;

        if !file_path.exists() {
            return Err(StorageError::FileNotFound {
                path: file_path.to_string_lossy().to_string(),
            });
        }

        Ok(fs::read(&file_path).await?)
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.full_path(path)?.exists())
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let file_path = self.full_path(path)?;

        if !file_path.exists() {
            return Ok(false);
        }

        fs::remove_file(&file_path).await?;

        if let Some(parent) = file_path.parent() {
            self.cleanup_empty_directories(parent).await;
        }

        tracing::info!("Deleted file at path: {}", file_path.display());
        Ok(true)
    }

    fn get_path(&self, path: &str) -> String {
        self.base_path.join(path).to_string_lossy().to_string()
    }
}
