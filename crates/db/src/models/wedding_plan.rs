//! Wedding plan (configurator session) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;
use wedplan_core::types::{DbId, Timestamp};

/// A row from the `wedding_plans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeddingPlan {
    #[serde(skip_serializing)]
    pub id: DbId,
    /// Random handle the couple uses to reopen the plan.
    pub public_id: Uuid,
    pub lead_id: Option<DbId>,
    pub contact_email: Option<String>,
    pub current_step: i16,
    /// Committed answers keyed by step (`basics`, `budget`, ...).
    pub step_data: serde_json::Value,
    /// Latest autosaved in-progress form state.
    pub draft: serde_json::Value,
    /// SHA-256 of the last autosaved draft.
    #[serde(skip_serializing)]
    pub content_hash: Option<String>,
    pub is_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for starting a new plan.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateWeddingPlan {
    pub lead_id: Option<DbId>,
    #[validate(email(message = "Invalid email address"))]
    pub contact_email: Option<String>,
}
