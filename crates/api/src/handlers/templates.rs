//! Handlers for `/proposal-templates` and `/contract-templates`.
//!
//! Staff can read and edit templates; only admins delete them. System
//! templates survive deletion attempts with a 409.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use wedplan_core::contract::{missing_placeholders, placeholders, render_template, validate_body};
use wedplan_core::error::CoreError;
use wedplan_core::proposal::{validate_line_items, LineItem};
use wedplan_core::types::DbId;
use wedplan_db::models::template::{
    ContractTemplate, CreateContractTemplate, CreateProposalTemplate, ProposalTemplate,
    UpdateContractTemplate, UpdateProposalTemplate,
};
use wedplan_db::repositories::{ContractTemplateRepo, ProposalTemplateRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `POST /contract-templates/{id}/render`.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub values: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub rendered: String,
    pub placeholders: Vec<String>,
    pub missing: Vec<String>,
}

fn proposal_template_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ProposalTemplate",
        id,
    })
}

fn contract_template_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ContractTemplate",
        id,
    })
}

/// Default services must decode as valid line items.
fn check_default_services(value: Option<&serde_json::Value>) -> Result<(), CoreError> {
    let Some(value) = value else {
        return Ok(());
    };
    let items: Vec<LineItem> = serde_json::from_value(value.clone()).map_err(|e| {
        CoreError::invalid_field("default_services", format!("Invalid line items: {e}"))
    })?;
    validate_line_items(&items)
}

// ---------------------------------------------------------------------------
// Proposal templates
// ---------------------------------------------------------------------------

/// POST /api/v1/proposal-templates/create
pub async fn create_proposal_template(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateProposalTemplate>,
) -> AppResult<ApiResponse<ProposalTemplate>> {
    input.validate()?;
    check_default_services(input.default_services.as_ref())?;

    let template = ProposalTemplateRepo::create(&state.pool, &input, user.user_id).await?;
    tracing::info!(template_id = template.id, "Proposal template created");
    Ok(ApiResponse::created(template).with_message("Template created"))
}

/// GET /api/v1/proposal-templates/get-all
pub async fn list_proposal_templates(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ProposalTemplate>>> {
    Ok(ApiResponse::ok(ProposalTemplateRepo::list(&state.pool).await?))
}

/// GET /api/v1/proposal-templates/{id}
pub async fn get_proposal_template(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<ProposalTemplate>> {
    let template = ProposalTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| proposal_template_not_found(id))?;
    Ok(ApiResponse::ok(template))
}

/// PUT /api/v1/proposal-templates/{id}
pub async fn update_proposal_template(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProposalTemplate>,
) -> AppResult<ApiResponse<ProposalTemplate>> {
    input.validate()?;
    check_default_services(input.default_services.as_ref())?;

    let template = ProposalTemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| proposal_template_not_found(id))?;
    Ok(ApiResponse::ok(template).with_message("Template updated"))
}

/// DELETE /api/v1/proposal-templates/{id}
pub async fn delete_proposal_template(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<()>> {
    let template = ProposalTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| proposal_template_not_found(id))?;
    if template.is_system || !ProposalTemplateRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "System templates cannot be deleted".into(),
        )));
    }
    Ok(ApiResponse::message("Template deleted"))
}

// ---------------------------------------------------------------------------
// Contract templates
// ---------------------------------------------------------------------------

/// POST /api/v1/contract-templates/create
pub async fn create_contract_template(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateContractTemplate>,
) -> AppResult<ApiResponse<ContractTemplate>> {
    input.validate()?;
    validate_body(&input.body)?;

    let template = ContractTemplateRepo::create(&state.pool, &input, user.user_id).await?;
    tracing::info!(template_id = template.id, "Contract template created");
    Ok(ApiResponse::created(template).with_message("Template created"))
}

/// GET /api/v1/contract-templates/get-all
pub async fn list_contract_templates(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ContractTemplate>>> {
    Ok(ApiResponse::ok(ContractTemplateRepo::list(&state.pool).await?))
}

/// GET /api/v1/contract-templates/{id}
pub async fn get_contract_template(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<ContractTemplate>> {
    let template = ContractTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| contract_template_not_found(id))?;
    Ok(ApiResponse::ok(template))
}

/// PUT /api/v1/contract-templates/{id}
pub async fn update_contract_template(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContractTemplate>,
) -> AppResult<ApiResponse<ContractTemplate>> {
    input.validate()?;
    if let Some(body) = &input.body {
        validate_body(body)?;
    }

    let template = ContractTemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| contract_template_not_found(id))?;
    Ok(ApiResponse::ok(template).with_message("Template updated"))
}

/// DELETE /api/v1/contract-templates/{id}
pub async fn delete_contract_template(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<()>> {
    let template = ContractTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| contract_template_not_found(id))?;
    if template.is_system || !ContractTemplateRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "System templates cannot be deleted".into(),
        )));
    }
    Ok(ApiResponse::message("Template deleted"))
}

/// POST /api/v1/contract-templates/{id}/render
///
/// Preview a contract: known placeholders are substituted, unknown ones are
/// left in place and listed under `missing`.
pub async fn render_contract_template(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RenderRequest>,
) -> AppResult<ApiResponse<RenderResponse>> {
    let template = ContractTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| contract_template_not_found(id))?;
    Ok(ApiResponse::ok(render_preview(&template.body, &input.values)))
}

fn render_preview(body: &str, values: &HashMap<String, String>) -> RenderResponse {
    RenderResponse {
        rendered: render_template(body, values),
        placeholders: placeholders(body),
        missing: missing_placeholders(body, values),
    }
}
