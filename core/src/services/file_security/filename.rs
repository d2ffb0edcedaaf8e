//! Filename safety checks and storage name generation

use chrono::Utc;
use uuid::Uuid;

use crate::errors::SecurityViolation;

/// Longest accepted client filename, in characters
pub const MAX_FILENAME_CHARS: usize = 255;

/// Windows device names that cannot be used as a file stem
const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Rejects traversal sequences, separators, NUL bytes, overlong and reserved names
pub fn validate_filename(filename: &str) -> Result<(), SecurityViolation> {
    if filename.trim().is_empty() {
        return Err(SecurityViolation::UnsafeFilename { reason: "empty filename" });
    }
    if filename.contains("..") {
        return Err(SecurityViolation::UnsafeFilename { reason: "parent directory reference" });
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err(SecurityViolation::UnsafeFilename { reason: "path separator" });
    }
    if filename.contains('\0') {
        return Err(SecurityViolation::UnsafeFilename { reason: "NUL byte" });
    }
    if filename.chars().count() > MAX_FILENAME_CHARS {
        return Err(SecurityViolation::UnsafeFilename { reason: "filename too long" });
    }

    // "CON.tar.png" still names the device
    let stem = filename.split('.').next().unwrap_or(filename).trim_end();
    if RESERVED_NAMES.iter().any(|reserved| reserved.eq_ignore_ascii_case(stem)) {
        return Err(SecurityViolation::UnsafeFilename { reason: "reserved device name" });
    }

    Ok(())
}

/// Lowercase text after the last `.`, or `""` when there is none
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Collision-resistant name for storing an accepted upload
///
/// Format: `{user_id}_{unix_millis}_{8 hex chars}.{ext}`. The extension may be
/// given with or without its dot; an empty extension adds no suffix.
pub fn generate_storage_filename(user_id: i64, extension: &str) -> String {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    let millis = Utc::now().timestamp_millis();

    if extension.is_empty() {
        format!("{}_{}_{}", user_id, millis, suffix)
    } else {
        format!("{}_{}_{}.{}", user_id, millis, suffix, extension)
    }
}
