//! Descriptor of an upload that passed every security check

use serde::{Deserialize, Serialize};

/// Image formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    /// Maps an extension (without the dot, any case) to a kind
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    /// Maps a declared content type (any case, parameters ignored) to a kind
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Webp => "image/webp",
        }
    }

    /// Canonical extension used for stored files
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
        }
    }
}

/// Result of a successful upload validation
///
/// Only produced by the file security validator and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFileDescriptor {
    /// Payload size in bytes
    pub size: u64,
    /// Declared content type, normalized to lowercase
    pub mime_type: String,
    /// Filename as supplied by the client
    pub original_filename: String,
    /// Lowercase extension without the dot
    pub extension: String,
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(ImageKind::from_extension("JPG"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("WebP"), Some(ImageKind::Webp));
        assert_eq!(ImageKind::from_extension("gif"), None);
    }

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(ImageKind::from_mime("IMAGE/PNG"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_mime("image/jpeg; charset=binary"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_mime("text/html"), None);
    }
}
