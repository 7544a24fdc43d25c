//! Landing-page section model.

use serde::Serialize;
use sqlx::FromRow;
use wedplan_core::types::{DbId, Timestamp};

/// A row from the `landing_sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LandingSection {
    pub id: DbId,
    pub section_number: i16,
    /// Merged section document (see `wedplan_core::landing`).
    pub content: serde_json::Value,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
