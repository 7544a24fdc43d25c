//! Repository for the `team_members` table.

use sqlx::PgPool;
use wedplan_core::types::DbId;

use crate::models::team::{CreateTeamMember, TeamMember, UpdateTeamMember};

const COLUMNS: &str = "id, team_id, full_name, email, phone, position, created_at, updated_at";

/// Provides CRUD operations for team members.
pub struct TeamMemberRepo;

impl TeamMemberRepo {
    pub async fn create(
        pool: &PgPool,
        team_id: DbId,
        input: &CreateTeamMember,
    ) -> Result<TeamMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_members (team_id, full_name, email, phone, position)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(team_id)
            .bind(input.full_name.trim())
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.position)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_team(
        pool: &PgPool,
        team_id: DbId,
    ) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM team_members WHERE team_id = $1 ORDER BY full_name ASC");
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(team_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTeamMember,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!(
            "UPDATE team_members SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                position = COALESCE($5, position)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .bind(input.full_name.as_deref().map(str::trim))
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.position)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
