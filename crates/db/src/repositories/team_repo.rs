//! Repository for the `teams` table.

use sqlx::PgPool;
use wedplan_core::types::DbId;

use crate::models::team::{CreateTeam, Team, UpdateTeam};

const COLUMNS: &str = "id, vendor_id, name, description, created_at, updated_at";

/// Provides CRUD operations for vendor teams.
pub struct TeamRepo;

impl TeamRepo {
    /// Create a team under `vendor_id`.
    pub async fn create(
        pool: &PgPool,
        vendor_id: DbId,
        input: &CreateTeam,
    ) -> Result<Team, sqlx::Error> {
        let query = format!(
            "INSERT INTO teams (vendor_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(vendor_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a vendor's teams by name.
    pub async fn list_by_vendor(pool: &PgPool, vendor_id: DbId) -> Result<Vec<Team>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM teams WHERE vendor_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Team>(&query)
            .bind(vendor_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTeam,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!(
            "UPDATE teams SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
