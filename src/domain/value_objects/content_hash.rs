use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of uploaded content, used to build provider references
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    /// Create a content hash from a SHA-256 hex string
    ///
    /// # Errors
    /// Returns an error if the hash is not a valid 64-character hex string
    pub fn new(hash: &str) -> Result<Self, ContentHashError> {
        if hash.len() != 64 {
            return Err(ContentHashError::InvalidLength(hash.len()));
        }

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ContentHashError::InvalidCharacters);
        }

        Ok(Self(hash.to_lowercase()))
    }

    /// Hash raw bytes
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Provider reference for this content: `<hash>.<extension>`
    #[must_use]
    pub fn reference(&self, extension: Option<&str>) -> String {
        match extension {
            Some(ext) if !ext.is_empty() => format!("{}.{ext}", self.0),
            _ => self.0.clone(),
        }
    }

    /// Nested directory components (ab/cd) used to shard stored files
    #[must_use]
    pub fn path_components(&self) -> (&str, &str) {
        (&self.0[0..2], &self.0[2..4])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContentHash {
    type Err = ContentHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Errors that can occur when parsing a content hash
#[derive(Debug, thiserror::Error)]
pub enum ContentHashError {
    #[error("Invalid hash length: expected 64 characters, got {0}")]
    InvalidLength(usize),
    #[error("Invalid characters: hash must contain only hexadecimal characters")]
    InvalidCharacters,
}
