//! Handlers for the public `/configurator` wizard.
//!
//! Couples fill the planner anonymously. Plans are addressed by their random
//! `public_id`; the row id never leaves the server.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;
use wedplan_core::autosave::{content_hash, should_save};
use wedplan_core::configurator::{
    apply_step_answers, validate_guest_count, validate_step_transition, ConfiguratorStep,
};
use wedplan_core::error::CoreError;
use wedplan_db::models::wedding_plan::{CreateWeddingPlan, WeddingPlan};
use wedplan_db::repositories::WeddingPlanRepo;

use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `PUT /configurator/plans/{public_id}/step`.
#[derive(Debug, Deserialize)]
pub struct StepRequest {
    /// Step the answers belong to; becomes the plan's current step.
    pub step: u8,
    #[serde(default = "empty_object")]
    pub data: Value,
}

/// Request body for `PUT /configurator/plans/{public_id}/autosave`.
#[derive(Debug, Deserialize)]
pub struct AutosaveRequest {
    pub content: Value,
}

#[derive(Debug, Serialize)]
pub struct AutosaveResponse {
    pub saved: bool,
    pub content_hash: String,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

fn not_found() -> AppError {
    AppError::Database(sqlx::Error::RowNotFound)
}

async fn load_plan(state: &AppState, public_id: Uuid) -> AppResult<WeddingPlan> {
    WeddingPlanRepo::find_by_public_id(&state.pool, public_id)
        .await?
        .ok_or_else(not_found)
}

/// Field-level checks for the answers of one step.
fn validate_answers(step: ConfiguratorStep, answers: &Value) -> Result<(), CoreError> {
    if step == ConfiguratorStep::Basics {
        if let Some(guests) = answers.get("guest_count") {
            let guests = guests
                .as_i64()
                .and_then(|g| i32::try_from(g).ok())
                .ok_or_else(|| {
                    CoreError::invalid_field("guest_count", "Guest count must be a whole number")
                })?;
            validate_guest_count(guests)?;
        }
    }
    Ok(())
}

/// POST /api/v1/configurator/plans
pub async fn create_plan(
    State(state): State<AppState>,
    Json(input): Json<CreateWeddingPlan>,
) -> AppResult<ApiResponse<WeddingPlan>> {
    input.validate()?;
    let plan = WeddingPlanRepo::create(&state.pool, &input).await?;
    tracing::info!(plan_id = plan.id, public_id = %plan.public_id, "Wedding plan started");
    Ok(ApiResponse::created(plan))
}

/// GET /api/v1/configurator/plans/{public_id}
pub async fn get_plan(
    State(state): State<AppState>,
    Path(public_id): Path<Uuid>,
) -> AppResult<ApiResponse<WeddingPlan>> {
    Ok(ApiResponse::ok(load_plan(&state, public_id).await?))
}

/// PUT /api/v1/configurator/plans/{public_id}/step
///
/// Commit the answers for a step. Forward moves go one step at a time;
/// reaching the review step completes the plan.
pub async fn save_step(
    State(state): State<AppState>,
    Path(public_id): Path<Uuid>,
    Json(input): Json<StepRequest>,
) -> AppResult<ApiResponse<WeddingPlan>> {
    let plan = load_plan(&state, public_id).await?;

    let current = u8::try_from(plan.current_step).unwrap_or(0);
    validate_step_transition(current, input.step)?;
    let step = ConfiguratorStep::from_number(input.step)?;
    validate_answers(step, &input.data)?;

    let step_data = apply_step_answers(&plan.step_data, step, &input.data)?;
    let is_completed = plan.is_completed || step == ConfiguratorStep::Review;

    let updated = WeddingPlanRepo::save_step(
        &state.pool,
        plan.id,
        i16::from(input.step),
        &step_data,
        is_completed,
    )
    .await?
    .ok_or_else(not_found)?;

    tracing::debug!(plan_id = plan.id, step = input.step, "Configurator step saved");
    Ok(ApiResponse::ok(updated))
}

/// PUT /api/v1/configurator/plans/{public_id}/autosave
///
/// Stores the in-progress draft unless it matches the last saved one.
pub async fn autosave(
    State(state): State<AppState>,
    Path(public_id): Path<Uuid>,
    Json(input): Json<AutosaveRequest>,
) -> AppResult<ApiResponse<AutosaveResponse>> {
    let plan = load_plan(&state, public_id).await?;

    let hash = content_hash(&input.content);
    if !should_save(plan.content_hash.as_deref(), &input.content) {
        return Ok(ApiResponse::ok(AutosaveResponse {
            saved: false,
            content_hash: hash,
        }));
    }

    WeddingPlanRepo::save_draft(&state.pool, plan.id, &input.content, &hash)
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::ok(AutosaveResponse {
        saved: true,
        content_hash: hash,
    }))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn basics_checks_guest_count() {
        assert!(validate_answers(ConfiguratorStep::Basics, &json!({ "guest_count": 180 })).is_ok());
        assert_matches!(
            validate_answers(ConfiguratorStep::Basics, &json!({ "guest_count": 0 })),
            Err(CoreError::InvalidField { field, .. }) if field == "guest_count"
        );
        assert_matches!(
            validate_answers(ConfiguratorStep::Basics, &json!({ "guest_count": "lots" })),
            Err(CoreError::InvalidField { .. })
        );
    }

    #[test]
    fn other_steps_pass_through() {
        assert!(validate_answers(ConfiguratorStep::Vibe, &json!({ "guest_count": 0 })).is_ok());
    }

    #[test]
    fn step_request_defaults_to_empty_answers() {
        let req: StepRequest = serde_json::from_value(json!({ "step": 2 })).unwrap();
        assert_eq!(req.data, json!({}));
    }
}
