//! Repository for the `proposal_templates` table.

use sqlx::PgPool;
use wedplan_core::types::DbId;

use crate::models::template::{CreateProposalTemplate, ProposalTemplate, UpdateProposalTemplate};

const COLUMNS: &str =
    "id, name, body, default_services, is_system, created_by, created_at, updated_at";

/// Provides CRUD operations for proposal templates.
pub struct ProposalTemplateRepo;

impl ProposalTemplateRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateProposalTemplate,
        created_by: DbId,
    ) -> Result<ProposalTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO proposal_templates (name, body, default_services, created_by)
             VALUES ($1, $2, COALESCE($3, '[]'::jsonb), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProposalTemplate>(&query)
            .bind(input.name.trim())
            .bind(&input.body)
            .bind(&input.default_services)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProposalTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposal_templates WHERE id = $1");
        sqlx::query_as::<_, ProposalTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ProposalTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposal_templates ORDER BY name ASC");
        sqlx::query_as::<_, ProposalTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProposalTemplate,
    ) -> Result<Option<ProposalTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE proposal_templates SET
                name = COALESCE($2, name),
                body = COALESCE($3, body),
                default_services = COALESCE($4, default_services)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProposalTemplate>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.body)
            .bind(&input.default_services)
            .fetch_optional(pool)
            .await
    }

    /// Delete a non-system template. System templates are never removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM proposal_templates WHERE id = $1 AND is_system = false")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
