//! Upload folder layout and file-type checks.
//!
//! Uploaded files live under `<uploads_dir>/<feature>/<generated-name>` and
//! are served statically under `/uploads`.

use crate::error::CoreError;

/// Feature folders under the uploads root.
pub const FOLDER_LANDING: &str = "landing";
pub const FOLDER_DESTINATIONS: &str = "destinations";
pub const FOLDER_VIBES: &str = "vibes";
pub const FOLDER_VENDORS: &str = "vendors";

/// URL prefix the uploads root is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Image extensions accepted for upload.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Maximum size of one uploaded image in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Return the lowercase extension of `filename` if it is an accepted image type.
pub fn image_extension(field: &str, filename: &str) -> Result<String, CoreError> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::invalid_field(
            field,
            format!(
                "Unsupported image type '.{ext}'. Supported: {}",
                IMAGE_EXTENSIONS.join(", ")
            ),
        ));
    }
    Ok(ext)
}

/// Reject empty or oversized uploads.
pub fn validate_size(field: &str, len: usize) -> Result<(), CoreError> {
    if len == 0 {
        return Err(CoreError::invalid_field(field, "Uploaded file is empty"));
    }
    if len > MAX_IMAGE_BYTES {
        return Err(CoreError::invalid_field(
            field,
            format!("Uploaded file exceeds {} MiB", MAX_IMAGE_BYTES / (1024 * 1024)),
        ));
    }
    Ok(())
}

/// Public URL path of a stored file.
pub fn public_path(folder: &str, file_name: &str) -> String {
    format!("{PUBLIC_PREFIX}/{folder}/{file_name}")
}
