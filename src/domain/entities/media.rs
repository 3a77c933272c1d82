use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Entity};
use crate::domain::value_objects::ProviderStatus;

/// Core media entity, processed by the provider named in `provider_name`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: MediaId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub enabled: bool,
    pub provider_name: String,
    pub provider_status: ProviderStatus,
    pub provider_reference: Option<String>,
    pub provider_metadata: serde_json::Map<String, serde_json::Value>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub length: Option<f64>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub context: String,
    pub category: Option<Category>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Upload waiting to be handled by the provider; never persisted
    #[serde(skip)]
    pub binary_content: Option<BinaryContent>,
}

/// Unique identifier for media (assigned by the repository on insert)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaId(i64);

impl MediaId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether the repository has assigned an id yet
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MediaId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Raw uploaded file attached to a media before its provider stores it
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryContent {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl BinaryContent {
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { filename: filename.into(), bytes }
    }

    /// Lower-cased extension of the original filename, if any
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
    }
}

impl std::fmt::Debug for BinaryContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryContent")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Media {
    /// Create a new, not yet persisted media for a provider and context
    #[must_use]
    pub fn new(provider_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            id: MediaId::new(0),
            name: None,
            description: None,
            enabled: true,
            provider_name: provider_name.into(),
            provider_status: ProviderStatus::Pending,
            provider_reference: None,
            provider_metadata: serde_json::Map::new(),
            width: None,
            height: None,
            length: None,
            content_type: None,
            size: None,
            context: context.into(),
            category: None,
            created_at: None,
            updated_at: None,
            binary_content: None,
        }
    }

    /// Attach an upload for the provider to process
    #[must_use]
    pub fn with_binary_content(mut self, content: BinaryContent) -> Self {
        self.binary_content = Some(content);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_binary_content(&mut self, content: BinaryContent) {
        self.binary_content = Some(content);
    }

    pub fn set_provider_status(&mut self, status: ProviderStatus) {
        self.provider_status = status;
    }

    /// Read a string value from the provider metadata
    #[must_use]
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.provider_metadata.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn set_metadata_value(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.provider_metadata.insert(key.into(), value);
    }

    /// Check if the provider finished processing this media
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.provider_status.is_ok()
    }
}

impl Entity for Media {
    fn entity_name(&self) -> &'static str {
        "media"
    }

    fn as_media(&self) -> Option<&Media> {
        Some(self)
    }

    fn as_media_mut(&mut self) -> Option<&mut Media> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_creation() {
        let media = Media::new("image", "default");

        assert_eq!(media.provider_name, "image");
        assert_eq!(media.context, "default");
        assert!(!media.id.is_assigned());
        assert!(media.category.is_none());
        assert_eq!(media.provider_status, ProviderStatus::Pending);
        assert!(!media.is_ready());
    }

    #[test]
    fn test_media_id_operations() {
        let id1 = MediaId::new(1);
        let id2 = MediaId::new(2);

        assert_ne!(id1, id2);
        assert_eq!(id1.as_i64(), 1);
        assert_eq!(MediaId::from(42).as_i64(), 42);
        assert_eq!(id1.to_string(), "1");
    }

    #[test]
    fn test_binary_content_is_not_serialized() {
        let media = Media::new("file", "default")
            .with_binary_content(BinaryContent::new("a.txt", b"hi".to_vec()));

        let value = serde_json::to_value(&media).unwrap();
        assert!(value.get("binary_content").is_none());

        let restored: Media = serde_json::from_value(value).unwrap();
        assert!(restored.binary_content.is_none());
    }

    #[test]
    fn test_binary_content_extension() {
        assert_eq!(BinaryContent::new("Photo.JPG", vec![]).extension().as_deref(), Some("jpg"));
        assert_eq!(BinaryContent::new("README", vec![]).extension(), None);
    }

    #[test]
    fn test_binary_content_debug_hides_bytes() {
        let debug = format!("{:?}", BinaryContent::new("a.bin", vec![0; 2048]));
        assert!(debug.contains("len: 2048"));
        assert!(!debug.contains("0, 0"));
    }

    #[test]
    fn test_metadata_helpers() {
        let mut media = Media::new("file", "default");
        media.set_metadata_value("filename", serde_json::json!("report.pdf"));

        assert_eq!(media.metadata_str("filename"), Some("report.pdf"));
        assert_eq!(media.metadata_str("missing"), None);
    }

    #[test]
    fn test_media_is_media_entity() {
        let mut media = Media::new("file", "default");
        assert_eq!(media.entity_name(), "media");
        assert!(media.as_media().is_some());
        media.as_media_mut().unwrap().enabled = false;
        assert!(!media.enabled);
    }
}
