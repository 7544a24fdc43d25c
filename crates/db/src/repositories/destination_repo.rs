//! Repository for the `destinations` table.

use sqlx::PgPool;
use wedplan_core::types::DbId;

use crate::models::vibe::{CreateDestination, Destination, UpdateDestination};

const COLUMNS: &str = "id, name, country, description, starting_price, image_path, is_active, \
                       created_at, updated_at";

/// Provides CRUD operations for wedding destinations.
pub struct DestinationRepo;

impl DestinationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateDestination,
    ) -> Result<Destination, sqlx::Error> {
        let query = format!(
            "INSERT INTO destinations (name, country, description, starting_price)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Destination>(&query)
            .bind(input.name.trim())
            .bind(input.country.trim())
            .bind(&input.description)
            .bind(input.starting_price)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Destination>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM destinations WHERE id = $1");
        sqlx::query_as::<_, Destination>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List destinations by country then name. `active_only` hides retired entries.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Destination>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM destinations
             WHERE ($1 = false OR is_active = true)
             ORDER BY country ASC, name ASC"
        );
        sqlx::query_as::<_, Destination>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDestination,
    ) -> Result<Option<Destination>, sqlx::Error> {
        let query = format!(
            "UPDATE destinations SET
                name = COALESCE($2, name),
                country = COALESCE($3, country),
                description = COALESCE($4, description),
                starting_price = COALESCE($5, starting_price),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Destination>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.country.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.starting_price)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Set the destination's image. Returns `None` if it does not exist.
    pub async fn set_image(
        pool: &PgPool,
        id: DbId,
        image_path: &str,
    ) -> Result<Option<Destination>, sqlx::Error> {
        let query =
            format!("UPDATE destinations SET image_path = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Destination>(&query)
            .bind(id)
            .bind(image_path)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM destinations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
