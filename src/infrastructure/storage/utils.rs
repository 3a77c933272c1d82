use super::StorageError;
use crate::domain::value_objects::ContentHash;

/// Build the sharded storage path for a provider reference
/// (e.g. `default/2c/f2/2cf24d...png`)
///
/// Only content-addressed references are sharded; anything else is stored
/// flat under the context.
pub fn sharded_path(context: &str, reference: &str) -> String {
    let stem = reference.split_once('.').map_or(reference, |(stem, _)| stem);

    match stem.parse::<ContentHash>() {
        Ok(hash) => {
            let (first, second) = hash.path_components();
            format!("{context}/{first}/{second}/{reference}")
        }
        Err(_) => format!("{context}/{reference}"),
    }
}

/// Reject absolute paths and parent traversal
pub fn validate_relative_path(path: &str) -> Result<(), StorageError> {
    let candidate = std::path::Path::new(path);
    let escapes = candidate.components().any(|component| {
        !matches!(component, std::path::Component::Normal(_) | std::path::Component::CurDir)
    });

    if path.is_empty() || escapes {
        return Err(StorageError::InvalidPath { path: path.to_string() });
    }

    Ok(())
}

/// Detect MIME type from file content
pub fn detect_content_type(data: &[u8], filename: Option<&str>) -> String {
    // First, try to detect from content
    if data.len() >= 4 {
        match &data[0..4] {
            [0xFF, 0xD8, 0xFF, ..] => return "image/jpeg".to_string(),
            [0x89, 0x50, 0x4E, 0x47] => return "image/png".to_string(),
            [0x47, 0x49, 0x46, 0x38] => return "image/gif".to_string(),
            [0x25, 0x50, 0x44, 0x46] => return "application/pdf".to_string(),
            [0x52, 0x49, 0x46, 0x46] if data.len() >= 12 && &data[8..12] == b"WEBP" => {
                return "image/webp".to_string();
            }
            _ => {}
        }
    }

    if data.len() >= 12 && data[4..8] == [0x66, 0x74, 0x79, 0x70] {
        return if &data[8..12] == b"avif" || &data[8..12] == b"avis" {
            "image/avif".to_string()
        } else {
            "video/mp4".to_string()
        };
    }

    // Fall back to filename extension
    if let Some(filename) = filename {
        match filename.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()).as_deref() {
            Some("jpg" | "jpeg") => "image/jpeg".to_string(),
            Some("png") => "image/png".to_string(),
            Some("gif") => "image/gif".to_string(),
            Some("webp") => "image/webp".to_string(),
            Some("avif") => "image/avif".to_string(),
            Some("mp4") => "video/mp4".to_string(),
            Some("webm") => "video/webm".to_string(),
            Some("mov") => "video/quicktime".to_string(),
            Some("mp3") => "audio/mpeg".to_string(),
            Some("pdf") => "application/pdf".to_string(),
            Some("txt") => "text/plain".to_string(),
            Some("csv") => "text/csv".to_string(),
            _ => "application/octet-stream".to_string(),
        }
    } else {
        "application/octet-stream".to_string()
    }
}
