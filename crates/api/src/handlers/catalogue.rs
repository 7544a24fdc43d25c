//! Handlers for the configurator catalogues: `/vibes` and `/destinations`.
//!
//! Listing and reading are public. Writes and the management listing (which
//! can include retired entries) require the admin role.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use validator::Validate;
use wedplan_core::error::CoreError;
use wedplan_core::types::DbId;
use wedplan_core::uploads::{FOLDER_DESTINATIONS, FOLDER_VIBES};
use wedplan_core::validation::validate_hex_colour;
use wedplan_db::models::vibe::{
    CreateDestination, CreateVibe, Destination, UpdateDestination, UpdateVibe, Vibe,
};
use wedplan_db::repositories::{DestinationRepo, VibeRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::uploads::{store_image, MultipartForm};

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// Read the single `image` file from an upload form.
async fn read_image(multipart: Multipart) -> AppResult<crate::uploads::UploadedFile> {
    MultipartForm::read(multipart)
        .await?
        .take_file("image")
        .ok_or_else(|| AppError::BadRequest("Missing required 'image' file".into()))
}

fn validate_palette(palette: &[String]) -> Result<(), CoreError> {
    for (idx, colour) in palette.iter().enumerate() {
        validate_hex_colour(colour).map_err(|_| {
            CoreError::invalid_field(
                format!("palette[{idx}]"),
                format!("'{colour}' is not a hex colour"),
            )
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Vibes
// ---------------------------------------------------------------------------

/// GET /api/v1/vibes/get-all
pub async fn list_vibes(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Vibe>>> {
    Ok(ApiResponse::ok(VibeRepo::list(&state.pool, true).await?))
}

/// GET /api/v1/vibes/manage
pub async fn manage_vibes(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<ApiResponse<Vec<Vibe>>> {
    let vibes = VibeRepo::list(&state.pool, !params.include_inactive).await?;
    Ok(ApiResponse::ok(vibes))
}

/// GET /api/v1/vibes/{id}
pub async fn get_vibe(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<Vibe>> {
    let vibe = VibeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Vibe", id))?;
    Ok(ApiResponse::ok(vibe))
}

/// POST /api/v1/vibes/create
pub async fn create_vibe(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateVibe>,
) -> AppResult<ApiResponse<Vibe>> {
    input.validate()?;
    validate_palette(&input.palette)?;
    let vibe = VibeRepo::create(&state.pool, &input).await?;
    tracing::info!(vibe_id = vibe.id, slug = %vibe.slug, "Vibe created");
    Ok(ApiResponse::created(vibe).with_message("Vibe created"))
}

/// PUT /api/v1/vibes/{id}
pub async fn update_vibe(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVibe>,
) -> AppResult<ApiResponse<Vibe>> {
    input.validate()?;
    if let Some(palette) = &input.palette {
        validate_palette(palette)?;
    }
    let vibe = VibeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Vibe", id))?;
    Ok(ApiResponse::ok(vibe).with_message("Vibe updated"))
}

/// POST /api/v1/vibes/{id}/image
pub async fn upload_vibe_image(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<ApiResponse<Vibe>> {
    let file = read_image(multipart).await?;
    VibeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Vibe", id))?;

    let path = store_image(&state.config.uploads_dir, FOLDER_VIBES, &file).await?;
    let vibe = VibeRepo::set_image(&state.pool, id, &path)
        .await?
        .ok_or_else(|| not_found("Vibe", id))?;
    Ok(ApiResponse::ok(vibe).with_message("Image uploaded"))
}

/// DELETE /api/v1/vibes/{id}
pub async fn delete_vibe(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<()>> {
    if !VibeRepo::delete(&state.pool, id).await? {
        return Err(not_found("Vibe", id));
    }
    Ok(ApiResponse::message("Vibe deleted"))
}

// ---------------------------------------------------------------------------
// Destinations
// ---------------------------------------------------------------------------

/// GET /api/v1/destinations/get-all
pub async fn list_destinations(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<Destination>>> {
    Ok(ApiResponse::ok(DestinationRepo::list(&state.pool, true).await?))
}

/// GET /api/v1/destinations/manage
pub async fn manage_destinations(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<ApiResponse<Vec<Destination>>> {
    let destinations = DestinationRepo::list(&state.pool, !params.include_inactive).await?;
    Ok(ApiResponse::ok(destinations))
}

/// GET /api/v1/destinations/{id}
pub async fn get_destination(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<Destination>> {
    let destination = DestinationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Destination", id))?;
    Ok(ApiResponse::ok(destination))
}

/// POST /api/v1/destinations/create
pub async fn create_destination(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDestination>,
) -> AppResult<ApiResponse<Destination>> {
    input.validate()?;
    let destination = DestinationRepo::create(&state.pool, &input).await?;
    tracing::info!(destination_id = destination.id, "Destination created");
    Ok(ApiResponse::created(destination).with_message("Destination created"))
}

/// PUT /api/v1/destinations/{id}
pub async fn update_destination(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDestination>,
) -> AppResult<ApiResponse<Destination>> {
    input.validate()?;
    let destination = DestinationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Destination", id))?;
    Ok(ApiResponse::ok(destination).with_message("Destination updated"))
}

/// POST /api/v1/destinations/{id}/image
pub async fn upload_destination_image(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<ApiResponse<Destination>> {
    let file = read_image(multipart).await?;
    DestinationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Destination", id))?;

    let path = store_image(&state.config.uploads_dir, FOLDER_DESTINATIONS, &file).await?;
    let destination = DestinationRepo::set_image(&state.pool, id, &path)
        .await?
        .ok_or_else(|| not_found("Destination", id))?;
    Ok(ApiResponse::ok(destination).with_message("Image uploaded"))
}

/// DELETE /api/v1/destinations/{id}
pub async fn delete_destination(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<()>> {
    if !DestinationRepo::delete(&state.pool, id).await? {
        return Err(not_found("Destination", id));
    }
    Ok(ApiResponse::message("Destination deleted"))
}
