//! Multipart form reading and image storage.
//!
//! Images are written to `<uploads_dir>/<feature>/<uuid>.<ext>` and referred
//! to by their public `/uploads/...` path.

use std::collections::HashMap;
use std::path::Path;

use axum::body::Bytes;
use axum::extract::Multipart;
use wedplan_core::uploads::{image_extension, public_path, validate_size, PUBLIC_PREFIX};

use crate::error::{AppError, AppResult};

/// One file part of a multipart request.
#[derive(Debug)]
pub struct UploadedFile {
    /// Form field name (`image`, `card0`, ...).
    pub field: String,
    pub file_name: String,
    pub data: Bytes,
}

/// A fully buffered multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub texts: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl MultipartForm {
    /// Buffer every part. Parts with a file name are files, the rest text.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.files.push(UploadedFile {
                        field: name,
                        file_name,
                        data,
                    });
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.texts.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    /// Remove and return the file part named `field`.
    pub fn take_file(&mut self, field: &str) -> Option<UploadedFile> {
        let idx = self.files.iter().position(|f| f.field == field)?;
        Some(self.files.remove(idx))
    }

    /// Decode the JSON text part `name`, or `null` when absent.
    pub fn json(&self, name: &str) -> AppResult<serde_json::Value> {
        match self.text(name).map(str::trim).filter(|t| !t.is_empty()) {
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| AppError::BadRequest(format!("Field '{name}' is not valid JSON: {e}"))),
            None => Ok(serde_json::Value::Null),
        }
    }
}

/// Check and store an image under `folder`, returning its public path.
pub async fn store_image(
    uploads_dir: &Path,
    folder: &str,
    file: &UploadedFile,
) -> AppResult<String> {
    let ext = image_extension(&file.field, &file.file_name)?;
    validate_size(&file.field, file.data.len())?;

    let dir = uploads_dir.join(folder);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let stored_name = format!("{}.{ext}", uuid::Uuid::new_v4());
    tokio::fs::write(dir.join(&stored_name), &file.data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(folder, file = %stored_name, bytes = file.data.len(), "Stored upload");
    Ok(public_path(folder, &stored_name))
}

/// Delete files previously returned by [`store_image`].
///
/// Paths outside the uploads root are ignored. Failures are logged, not
/// returned: this runs on error paths that already carry an error.
pub async fn remove_stored<I, S>(uploads_dir: &Path, public_paths: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for public in public_paths {
        let public = public.as_ref();
        let Some(relative) = public
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.split('/').any(|seg| seg == ".."))
        else {
            tracing::warn!(path = public, "Not an upload path, skipping removal");
            continue;
        };
        match tokio::fs::remove_file(uploads_dir.join(relative)).await {
            Ok(()) => tracing::info!(path = public, "Removed upload"),
            Err(err) => tracing::warn!(path = public, error = %err, "Failed to remove upload"),
        }
    }
}
