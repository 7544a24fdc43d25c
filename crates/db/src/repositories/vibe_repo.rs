//! Repository for the `vibes` table.

use sqlx::PgPool;
use wedplan_core::types::DbId;

use crate::models::vibe::{CreateVibe, UpdateVibe, Vibe};

const COLUMNS: &str =
    "id, slug, name, description, palette, image_path, is_active, created_at, updated_at";

/// Provides CRUD operations for vibe presets.
pub struct VibeRepo;

impl VibeRepo {
    pub async fn create(pool: &PgPool, input: &CreateVibe) -> Result<Vibe, sqlx::Error> {
        let query = format!(
            "INSERT INTO vibes (slug, name, description, palette)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vibe>(&query)
            .bind(&input.slug)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(sqlx::types::Json(&input.palette))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vibe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vibes WHERE id = $1");
        sqlx::query_as::<_, Vibe>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List vibes by name. `active_only` hides retired presets.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Vibe>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vibes WHERE ($1 = false OR is_active = true) ORDER BY name ASC"
        );
        sqlx::query_as::<_, Vibe>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVibe,
    ) -> Result<Option<Vibe>, sqlx::Error> {
        let query = format!(
            "UPDATE vibes SET
                slug = COALESCE($2, slug),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                palette = COALESCE($5, palette),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vibe>(&query)
            .bind(id)
            .bind(&input.slug)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.palette.as_ref().map(sqlx::types::Json))
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Set the preset's cover image. Returns `None` if the vibe does not exist.
    pub async fn set_image(
        pool: &PgPool,
        id: DbId,
        image_path: &str,
    ) -> Result<Option<Vibe>, sqlx::Error> {
        let query = format!("UPDATE vibes SET image_path = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Vibe>(&query)
            .bind(id)
            .bind(image_path)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vibes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
