//! Upload security validation
//!
//! Every upload passes, in order: size, filename, extension, declared content
//! type, then content. Content inspection reads the image header for its
//! dimensions before any pixel buffer is allocated, then fully decodes under
//! allocation limits to prove the payload really is the declared format.

mod filename;


use std::io::Cursor;

use image::{ImageFormat, ImageReader, Limits};
use tracing::{debug, warn};

use ag_shared::config::UploadConfig;
use ag_shared::utils::masking::{snippet, LOG_SNIPPET_CHARS};

use crate::domain::entities::upload::{ImageKind, UploadedFileDescriptor};
use crate::errors::SecurityViolation;

pub use filename::{file_extension, generate_storage_filename, validate_filename, MAX_FILENAME_CHARS};

/// Validates uploaded image files before they reach storage
#[derive(Debug, Clone)]
pub struct FileSecurityValidator {
    config: UploadConfig,
}

impl Default for FileSecurityValidator {
    fn default() -> Self {
        Self::new(UploadConfig::default())
    }
}

impl FileSecurityValidator {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Runs every check against an uploaded payload
    ///
    /// Decoding is CPU-bound; async callers should run this on a blocking thread.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The complete payload
    /// * `declared_mime` - Content type claimed by the client
    /// * `original_filename` - Filename claimed by the client
    ///
    /// # Returns
    ///
    /// * `Ok(UploadedFileDescriptor)` - All checks passed
    /// * `Err(SecurityViolation)` - The first check that failed
    pub fn validate(
        &self,
        bytes: &[u8],
        declared_mime: &str,
        original_filename: &str,
    ) -> Result<UploadedFileDescriptor, SecurityViolation> {
        let result = self.run_checks(bytes, declared_mime, original_filename);
        if let Err(violation) = &result {
            warn!(
                filename = %snippet(original_filename, LOG_SNIPPET_CHARS),
                mime = %snippet(declared_mime, LOG_SNIPPET_CHARS),
                size = bytes.len(),
                reason = %violation,
                "Upload rejected"
            );
        }
        result
    }

    fn run_checks(
        &self,
        bytes: &[u8],
        declared_mime: &str,
        original_filename: &str,
    ) -> Result<UploadedFileDescriptor, SecurityViolation> {
        let size = bytes.len() as u64;
        if size == 0 {
            return Err(SecurityViolation::EmptyFile);
        }
        if size > self.config.max_file_size {
            return Err(SecurityViolation::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }

        validate_filename(original_filename)?;

        let extension = file_extension(original_filename);
        let kind = ImageKind::from_extension(&extension).ok_or_else(|| {
            SecurityViolation::ExtensionNotAllowed {
                extension: extension.clone(),
            }
        })?;

        let mime_type = declared_mime.trim().to_ascii_lowercase();
        let declared_kind = ImageKind::from_mime(&mime_type).ok_or_else(|| {
            SecurityViolation::MimeTypeNotAllowed {
                mime: snippet(&mime_type, LOG_SNIPPET_CHARS),
            }
        })?;
        if declared_kind != kind {
            return Err(SecurityViolation::ContentMismatch);
        }

        let (width, height) = self.inspect_content(bytes, kind)?;
        debug!(width, height, size, kind = ?kind, "Upload accepted");

        Ok(UploadedFileDescriptor {
            size,
            mime_type,
            original_filename: original_filename.to_string(),
            extension,
            kind,
            width,
            height,
        })
    }

    /// Confirms the bytes are a decodable image of the expected kind within bounds
    fn inspect_content(&self, bytes: &[u8], expected: ImageKind) -> Result<(u32, u32), SecurityViolation> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|_| SecurityViolation::UndecodableImage)?;

        let format = match reader.format() {
            Some(format) => format,
            None => return Err(SecurityViolation::UndecodableImage),
        };
        if kind_of(format) != Some(expected) {
            return Err(SecurityViolation::ContentMismatch);
        }

        // Header only; no pixel buffer yet
        let (width, height) = reader
            .into_dimensions()
            .map_err(|_| SecurityViolation::UndecodableImage)?;
        self.check_dimensions(width, height)?;

        let mut reader = ImageReader::with_format(Cursor::new(bytes), format);
        reader.limits(self.decode_limits());
        reader.decode().map_err(|_| SecurityViolation::UndecodableImage)?;

        Ok((width, height))
    }

    fn check_dimensions(&self, width: u32, height: u32) -> Result<(), SecurityViolation> {
        let (max_width, max_height) = (self.config.max_image_width, self.config.max_image_height);
        if width == 0 || height == 0 {
            return Err(SecurityViolation::UndecodableImage);
        }
        if width > max_width || height > max_height {
            return Err(SecurityViolation::ImageTooLarge {
                width,
                height,
                max_width,
                max_height,
            });
        }
        Ok(())
    }

    fn decode_limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.config.max_image_width);
        limits.max_image_height = Some(self.config.max_image_height);
        // RGBA8 at the maximum size, plus decoder working memory
        let pixels = u64::from(self.config.max_image_width) * u64::from(self.config.max_image_height);
        limits.max_alloc = Some(pixels * 4 + 16 * 1024 * 1024);
        limits
    }
}

fn kind_of(format: ImageFormat) -> Option<ImageKind> {
    match format {
        ImageFormat::Jpeg => Some(ImageKind::Jpeg),
        ImageFormat::Png => Some(ImageKind::Png),
        ImageFormat::WebP => Some(ImageKind::Webp),
        _ => None,
    }
}
