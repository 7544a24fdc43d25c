//! Handlers for the `/landing` page sections.

use axum::extract::{Multipart, Path, State};
use serde::Serialize;
use serde_json::Value;
use wedplan_core::landing::schema::ALL_SECTIONS;
use wedplan_core::error::CoreError;
use wedplan_core::landing::{merge_section, MediaFiles, Section};
use wedplan_core::types::Timestamp;
use wedplan_core::uploads::FOLDER_LANDING;
use wedplan_db::models::landing_section::LandingSection;
use wedplan_db::repositories::LandingSectionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::uploads::{remove_stored, store_image, MultipartForm};

/// A section as the landing page consumes it. Sections never edited are
/// returned with every declared field empty.
#[derive(Debug, Serialize)]
pub struct SectionView {
    pub section_number: u8,
    pub name: &'static str,
    pub content: Value,
    pub updated_at: Option<Timestamp>,
}

impl SectionView {
    fn build(section: Section, stored: Option<LandingSection>) -> AppResult<Self> {
        let (content, updated_at) = match stored {
            Some(row) => (row.content, Some(row.updated_at)),
            None => (
                merge_section(section, &Value::Null, &MediaFiles::new(), None)?,
                None,
            ),
        };
        Ok(Self {
            section_number: section.number(),
            name: section.schema().name,
            content,
            updated_at,
        })
    }
}

fn resolve(n: u8) -> AppResult<Section> {
    Ok(Section::from_number(n)?)
}

/// GET /api/v1/landing/sections
pub async fn list_sections(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<SectionView>>> {
    let mut stored = LandingSectionRepo::list(&state.pool).await?;
    let mut views = Vec::with_capacity(ALL_SECTIONS.len());
    for section in ALL_SECTIONS {
        let row = stored
            .iter()
            .position(|r| r.section_number == i16::from(section.number()))
            .map(|idx| stored.swap_remove(idx));
        views.push(SectionView::build(section, row)?);
    }
    Ok(ApiResponse::ok(views))
}

/// GET /api/v1/landing/sections/{n}
pub async fn get_section(
    State(state): State<AppState>,
    Path(n): Path<u8>,
) -> AppResult<ApiResponse<SectionView>> {
    let section = resolve(n)?;
    let stored = LandingSectionRepo::find_by_number(&state.pool, i16::from(n)).await?;
    Ok(ApiResponse::ok(SectionView::build(section, stored)?))
}

/// PUT /api/v1/landing/sections/{n}
///
/// Multipart: an optional `data` JSON part with the changed fields, plus
/// image files named `image` (section image) or `card{idx}` (card image).
/// Each file field may appear once. Files stored by a request that then
/// fails are removed again.
pub async fn update_section(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(n): Path<u8>,
    multipart: Multipart,
) -> AppResult<ApiResponse<SectionView>> {
    let section = resolve(n)?;
    let form = MultipartForm::read(multipart).await?;
    let body = form.json("data")?;
    let existing = LandingSectionRepo::find_by_number(&state.pool, i16::from(n)).await?;
    let existing_content = existing.as_ref().map(|row| &row.content);

    // Dry run with the media keys only so bad or repeated keys are rejected
    // before any file hits the disk.
    let mut keys = MediaFiles::new();
    for file in &form.files {
        if keys.insert(file.field.clone(), String::new()).is_some() {
            return Err(CoreError::invalid_field(
                file.field.as_str(),
                "File field appears more than once",
            )
            .into());
        }
    }
    merge_section(section, &body, &keys, existing_content)?;

    let mut media = MediaFiles::new();
    for file in &form.files {
        match store_image(&state.config.uploads_dir, FOLDER_LANDING, file).await {
            Ok(path) => {
                media.insert(file.field.clone(), path);
            }
            Err(err) => {
                remove_stored(&state.config.uploads_dir, media.values()).await;
                return Err(err);
            }
        }
    }

    let saved = match merge_section(section, &body, &media, existing_content) {
        Ok(merged) => {
            LandingSectionRepo::upsert(&state.pool, i16::from(n), &merged, admin.user_id)
                .await
                .map_err(AppError::from)
        }
        Err(err) => Err(err.into()),
    };
    let row = match saved {
        Ok(row) => row,
        Err(err) => {
            remove_stored(&state.config.uploads_dir, media.values()).await;
            return Err(err);
        }
    };

    tracing::info!(
        section = section.schema().name,
        files = media.len(),
        user_id = admin.user_id,
        "Landing section updated"
    );
    Ok(ApiResponse::ok(SectionView::build(section, Some(row))?).with_message("Section updated"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsaved_section_has_empty_fields() {
        let view = SectionView::build(Section::Hero, None).unwrap();
        assert_eq!(view.section_number, 1);
        assert!(view.updated_at.is_none());
        let fields = view.content.as_object().unwrap();
        assert!(!fields.is_empty());
        assert!(fields.values().all(|v| v == ""));
    }

    #[test]
    fn out_of_range_section_is_rejected() {
        assert!(resolve(0).is_err());
        assert!(resolve(7).is_err());
        assert_eq!(resolve(6).unwrap(), Section::Contact);
    }
}
