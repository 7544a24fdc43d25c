//! Vibe preset and destination models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use wedplan_core::types::{DbId, Timestamp};
use wedplan_core::validation::{validate_not_blank, validate_slug};

/// A row from the `vibes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vibe {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    /// JSON array of hex colour strings.
    pub palette: serde_json::Value,
    pub image_path: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a vibe.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVibe {
    #[validate(length(min = 1, max = 80), custom(function = "validate_slug"))]
    pub slug: String,
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub palette: Vec<String>,
}

/// DTO for updating a vibe.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVibe {
    #[validate(length(min = 1, max = 80), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub palette: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// A row from the `destinations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Destination {
    pub id: DbId,
    pub name: String,
    pub country: String,
    pub description: Option<String>,
    pub starting_price: Option<i64>,
    pub image_path: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a destination.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDestination {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_not_blank")
    )]
    pub country: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub starting_price: Option<i64>,
}

/// DTO for updating a destination.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDestination {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_not_blank")
    )]
    pub country: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub starting_price: Option<i64>,
    pub is_active: Option<bool>,
}
