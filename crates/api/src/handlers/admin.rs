//! Handlers for the `/admin` resource: users, vendors, vendor teams, and
//! team members. All endpoints require the admin role.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;
use wedplan_core::error::CoreError;
use wedplan_core::roles::is_known_role;
use wedplan_core::types::DbId;
use wedplan_core::uploads::FOLDER_VENDORS;
use wedplan_core::validation::validate_budget_range;
use wedplan_core::vendor::{serves_budget, validate_categories};
use wedplan_db::models::team::{
    CreateTeam, CreateTeamMember, Team, TeamMember, UpdateTeam, UpdateTeamMember,
};
use wedplan_db::models::user::{CreateUser, CreateUserRequest, UserResponse};
use wedplan_db::models::vendor::{CreateVendor, UpdateVendor, Vendor};
use wedplan_db::repositories::{
    RoleRepo, SessionRepo, TeamMemberRepo, TeamRepo, UserRepo, VendorRepo,
};
use wedplan_events::bus::EventKind;
use wedplan_events::PlatformEvent;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::uploads::{store_image, MultipartForm};

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(ApiResponse::ok(users.iter().map(UserResponse::from).collect()))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    input.validate()?;
    if !is_known_role(&input.role) {
        return Err(CoreError::invalid_field("role", format!("Unknown role '{}'", input.role)).into());
    }

    let role_id = RoleRepo::id_for_name(&state.pool, &input.role)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Role '{}' is not seeded", input.role)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            full_name: input.full_name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            password_hash,
            role_id,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, admin_id = admin.user_id, "User created");
    Ok(ApiResponse::created(UserResponse::from(&user)).with_message("User created"))
}

/// POST /api/v1/admin/users/{id}/deactivate
///
/// Deactivates the account and revokes its sessions. Admins cannot
/// deactivate themselves.
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<()>> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }
    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(not_found("User", id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, admin_id = admin.user_id, "User deactivated");
    Ok(ApiResponse::message("User deactivated"))
}

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

/// Query parameters for `GET /admin/vendors/get-all`.
#[derive(Debug, Deserialize)]
pub struct VendorListParams {
    pub category: Option<String>,
    /// Only vendors whose budget band covers this amount.
    pub budget: Option<i64>,
}

/// POST /api/v1/admin/vendors/create
pub async fn create_vendor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateVendor>,
) -> AppResult<ApiResponse<Vendor>> {
    input.validate()?;
    validate_categories(&input.service_categories)?;
    validate_budget_range(input.budget_min, input.budget_max)?;

    let vendor = VendorRepo::create(&state.pool, &input).await?;
    tracing::info!(vendor_id = vendor.id, admin_id = admin.user_id, "Vendor created");

    state.event_bus.publish(
        PlatformEvent::new(EventKind::VendorCreated)
            .about("vendor", vendor.id)
            .with_actor(Some(admin.user_id))
            .with_payload(json!({ "business_name": vendor.business_name })),
    );

    Ok(ApiResponse::created(vendor).with_message("Vendor created"))
}

/// GET /api/v1/admin/vendors/get-all
pub async fn list_vendors(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<VendorListParams>,
) -> AppResult<ApiResponse<Vec<Vendor>>> {
    let mut vendors = VendorRepo::list(&state.pool, params.category.as_deref()).await?;
    if let Some(budget) = params.budget {
        vendors.retain(|v| serves_budget(v.budget_min, v.budget_max, budget));
    }
    Ok(ApiResponse::ok(vendors))
}

/// GET /api/v1/admin/vendors/{id}
pub async fn get_vendor(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<Vendor>> {
    let vendor = VendorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Vendor", id))?;
    Ok(ApiResponse::ok(vendor))
}

/// PUT /api/v1/admin/vendors/{id}
pub async fn update_vendor(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVendor>,
) -> AppResult<ApiResponse<Vendor>> {
    input.validate()?;
    if let Some(categories) = &input.service_categories {
        validate_categories(categories)?;
    }
    validate_budget_range(input.budget_min, input.budget_max)?;

    let vendor = VendorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Vendor", id))?;
    Ok(ApiResponse::ok(vendor).with_message("Vendor updated"))
}

/// POST /api/v1/admin/vendors/{id}/logo
///
/// Multipart upload with a single `image` file.
pub async fn upload_vendor_logo(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<ApiResponse<Vendor>> {
    let mut form = MultipartForm::read(multipart).await?;
    let file = form
        .take_file("image")
        .ok_or_else(|| AppError::BadRequest("Missing required 'image' file".into()))?;

    VendorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Vendor", id))?;

    let path = store_image(&state.config.uploads_dir, FOLDER_VENDORS, &file).await?;
    let vendor = VendorRepo::set_logo(&state.pool, id, &path)
        .await?
        .ok_or_else(|| not_found("Vendor", id))?;
    Ok(ApiResponse::ok(vendor).with_message("Logo uploaded"))
}

/// DELETE /api/v1/admin/vendors/{id}
pub async fn delete_vendor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<()>> {
    if !VendorRepo::delete(&state.pool, id).await? {
        return Err(not_found("Vendor", id));
    }
    tracing::info!(vendor_id = id, admin_id = admin.user_id, "Vendor deleted");
    Ok(ApiResponse::message("Vendor deleted"))
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/vendors/{id}/teams
pub async fn list_teams(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(vendor_id): Path<DbId>,
) -> AppResult<ApiResponse<Vec<Team>>> {
    let teams = TeamRepo::list_by_vendor(&state.pool, vendor_id).await?;
    Ok(ApiResponse::ok(teams))
}

/// POST /api/v1/admin/vendors/{id}/teams
pub async fn create_team(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(vendor_id): Path<DbId>,
    Json(input): Json<CreateTeam>,
) -> AppResult<ApiResponse<Team>> {
    input.validate()?;
    VendorRepo::find_by_id(&state.pool, vendor_id)
        .await?
        .ok_or_else(|| not_found("Vendor", vendor_id))?;

    let team = TeamRepo::create(&state.pool, vendor_id, &input).await?;
    Ok(ApiResponse::created(team).with_message("Team created"))
}

/// PUT /api/v1/admin/teams/{id}
pub async fn update_team(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTeam>,
) -> AppResult<ApiResponse<Team>> {
    input.validate()?;
    let team = TeamRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Team", id))?;
    Ok(ApiResponse::ok(team).with_message("Team updated"))
}

/// DELETE /api/v1/admin/teams/{id}
pub async fn delete_team(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<()>> {
    if !TeamRepo::delete(&state.pool, id).await? {
        return Err(not_found("Team", id));
    }
    Ok(ApiResponse::message("Team deleted"))
}

// ---------------------------------------------------------------------------
// Team members
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/teams/{id}/members
pub async fn list_members(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(team_id): Path<DbId>,
) -> AppResult<ApiResponse<Vec<TeamMember>>> {
    let members = TeamMemberRepo::list_by_team(&state.pool, team_id).await?;
    Ok(ApiResponse::ok(members))
}

/// POST /api/v1/admin/teams/{id}/members
pub async fn create_member(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(team_id): Path<DbId>,
    Json(input): Json<CreateTeamMember>,
) -> AppResult<ApiResponse<TeamMember>> {
    input.validate()?;
    TeamRepo::find_by_id(&state.pool, team_id)
        .await?
        .ok_or_else(|| not_found("Team", team_id))?;

    let member = TeamMemberRepo::create(&state.pool, team_id, &input).await?;
    Ok(ApiResponse::created(member).with_message("Team member added"))
}

/// PUT /api/v1/admin/team-members/{id}
pub async fn update_member(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTeamMember>,
) -> AppResult<ApiResponse<TeamMember>> {
    input.validate()?;
    let member = TeamMemberRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("TeamMember", id))?;
    Ok(ApiResponse::ok(member).with_message("Team member updated"))
}

/// DELETE /api/v1/admin/team-members/{id}
pub async fn delete_member(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<()>> {
    if !TeamMemberRepo::delete(&state.pool, id).await? {
        return Err(not_found("TeamMember", id));
    }
    Ok(ApiResponse::message("Team member removed"))
}
