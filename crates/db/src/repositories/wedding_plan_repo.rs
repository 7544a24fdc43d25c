//! Repository for the `wedding_plans` table.

use sqlx::PgPool;
use uuid::Uuid;
use wedplan_core::types::DbId;

use crate::models::wedding_plan::{CreateWeddingPlan, WeddingPlan};

const COLUMNS: &str = "id, public_id, lead_id, contact_email, current_step, step_data, draft, content_hash, \
                       is_completed, created_at, updated_at";

/// Provides persistence for configurator sessions.
pub struct WeddingPlanRepo;

impl WeddingPlanRepo {
    /// Start a plan at step 1 with empty data and a fresh public handle.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWeddingPlan,
    ) -> Result<WeddingPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO wedding_plans (public_id, lead_id, contact_email)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WeddingPlan>(&query)
            .bind(Uuid::new_v4())
            .bind(input.lead_id)
            .bind(&input.contact_email)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_public_id(
        pool: &PgPool,
        public_id: Uuid,
    ) -> Result<Option<WeddingPlan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wedding_plans WHERE public_id = $1");
        sqlx::query_as::<_, WeddingPlan>(&query)
            .bind(public_id)
            .fetch_optional(pool)
            .await
    }

    /// Commit step answers and move to `current_step`.
    pub async fn save_step(
        pool: &PgPool,
        id: DbId,
        current_step: i16,
        step_data: &serde_json::Value,
        is_completed: bool,
    ) -> Result<Option<WeddingPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE wedding_plans SET
                current_step = $2,
                step_data = $3,
                is_completed = is_completed OR $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WeddingPlan>(&query)
            .bind(id)
            .bind(current_step)
            .bind(step_data)
            .bind(is_completed)
            .fetch_optional(pool)
            .await
    }

    /// Store an autosaved draft along with its content hash.
    pub async fn save_draft(
        pool: &PgPool,
        id: DbId,
        draft: &serde_json::Value,
        content_hash: &str,
    ) -> Result<Option<WeddingPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE wedding_plans SET draft = $2, content_hash = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WeddingPlan>(&query)
            .bind(id)
            .bind(draft)
            .bind(content_hash)
            .fetch_optional(pool)
            .await
    }
}
