//! Repository for the `landing_sections` table.

use sqlx::PgPool;
use wedplan_core::types::DbId;

use crate::models::landing_section::LandingSection;

const COLUMNS: &str = "id, section_number, content, updated_by, created_at, updated_at";

/// Stores one merged content document per landing-page section.
pub struct LandingSectionRepo;

impl LandingSectionRepo {
    /// All stored sections in page order.
    pub async fn list(pool: &PgPool) -> Result<Vec<LandingSection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM landing_sections ORDER BY section_number ASC");
        sqlx::query_as::<_, LandingSection>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_number(
        pool: &PgPool,
        section_number: i16,
    ) -> Result<Option<LandingSection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM landing_sections WHERE section_number = $1");
        sqlx::query_as::<_, LandingSection>(&query)
            .bind(section_number)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the content of a section.
    pub async fn upsert(
        pool: &PgPool,
        section_number: i16,
        content: &serde_json::Value,
        updated_by: DbId,
    ) -> Result<LandingSection, sqlx::Error> {
        let query = format!(
            "INSERT INTO landing_sections (section_number, content, updated_by)
             VALUES ($1, $2, $3)
             ON CONFLICT (section_number) DO UPDATE
                SET content = EXCLUDED.content, updated_by = EXCLUDED.updated_by
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LandingSection>(&query)
            .bind(section_number)
            .bind(content)
            .bind(updated_by)
            .fetch_one(pool)
            .await
    }
}
