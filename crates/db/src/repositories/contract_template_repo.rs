//! Repository for the `contract_templates` table.

use sqlx::PgPool;
use wedplan_core::types::DbId;

use crate::models::template::{ContractTemplate, CreateContractTemplate, UpdateContractTemplate};

const COLUMNS: &str = "id, name, body, is_system, created_by, created_at, updated_at";

/// Provides CRUD operations for contract templates.
pub struct ContractTemplateRepo;

impl ContractTemplateRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateContractTemplate,
        created_by: DbId,
    ) -> Result<ContractTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO contract_templates (name, body, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContractTemplate>(&query)
            .bind(input.name.trim())
            .bind(&input.body)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContractTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contract_templates WHERE id = $1");
        sqlx::query_as::<_, ContractTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ContractTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contract_templates ORDER BY name ASC");
        sqlx::query_as::<_, ContractTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContractTemplate,
    ) -> Result<Option<ContractTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE contract_templates SET
                name = COALESCE($2, name),
                body = COALESCE($3, body)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContractTemplate>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.body)
            .fetch_optional(pool)
            .await
    }

    /// Delete a non-system template. System templates are never removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM contract_templates WHERE id = $1 AND is_system = false")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
