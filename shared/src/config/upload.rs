//! Upload validation limits

use serde::{Deserialize, Serialize};

/// Limits applied to uploaded image files before they reach storage
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Maximum payload size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Maximum decoded image width in pixels
    #[serde(default = "default_max_dimension")]
    pub max_image_width: u32,

    /// Maximum decoded image height in pixels
    #[serde(default = "default_max_dimension")]
    pub max_image_height: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            max_image_width: default_max_dimension(),
            max_image_height: default_max_dimension(),
        }
    }
}

impl UploadConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let parse = |key: &str| std::env::var(key).ok().and_then(|v| v.parse().ok());
        let defaults = Self::default();

        Self {
            max_file_size: parse("UPLOAD_MAX_FILE_SIZE").unwrap_or(defaults.max_file_size),
            max_image_width: parse("UPLOAD_MAX_IMAGE_WIDTH")
                .map(|v: u64| v as u32)
                .unwrap_or(defaults.max_image_width),
            max_image_height: parse("UPLOAD_MAX_IMAGE_HEIGHT")
                .map(|v: u64| v as u32)
                .unwrap_or(defaults.max_image_height),
        }
    }

    /// Set the maximum payload size in bytes
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Set the maximum decoded dimensions
    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_image_width = width;
        self.max_image_height = height;
        self
    }
}

fn default_max_file_size() -> u64 {
    3 * 1024 * 1024 // 3 MiB
}

fn default_max_dimension() -> u32 {
    4096
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_config_default() {
        let config = UploadConfig::default();
        assert_eq!(config.max_file_size, 3_145_728);
        assert_eq!(config.max_image_width, 4096);
        assert_eq!(config.max_image_height, 4096);
    }

    #[test]
    fn test_upload_config_builder() {
        let config = UploadConfig::default()
            .with_max_file_size(1024)
            .with_max_dimensions(640, 480);
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.max_image_width, 640);
        assert_eq!(config.max_image_height, 480);
    }
}
