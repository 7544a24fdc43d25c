//! The seeded `roles` table (`admin`, `team_member`, `vendor`).

use sqlx::PgPool;
use wedplan_core::types::DbId;

use crate::models::role::Role;

pub struct RoleRepo;

impl RoleRepo {
    /// Id of the role called `name`, if seeded.
    pub async fn id_for_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at, updated_at FROM roles ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }
}
