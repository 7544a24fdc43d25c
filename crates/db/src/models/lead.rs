//! Lead entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use wedplan_core::types::{DbId, Timestamp};
use wedplan_core::validation::{validate_not_blank, validate_phone};

/// A row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub partner_one_name: String,
    pub partner_two_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub guest_count: Option<i32>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub preferred_locations: Vec<String>,
    pub source: String,
    pub status: String,
    pub notes: Option<String>,
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a lead, from the staff form or the public inquiry form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLead {
    #[validate(
        length(min = 1, max = 200),
        custom(function = "validate_not_blank")
    )]
    pub partner_one_name: String,
    #[validate(length(max = 200))]
    pub partner_two_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 5000))]
    pub guest_count: Option<i32>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    /// Defaults to `website` when omitted.
    pub source: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    pub owner_id: Option<DbId>,
}

/// DTO for updating a lead. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLead {
    #[validate(
        length(min = 1, max = 200),
        custom(function = "validate_not_blank")
    )]
    pub partner_one_name: Option<String>,
    #[validate(length(max = 200))]
    pub partner_two_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 5000))]
    pub guest_count: Option<i32>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub preferred_locations: Option<Vec<String>>,
    pub source: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    pub owner_id: Option<DbId>,
}

/// Filters for listing and exporting leads.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub status: Option<String>,
    pub source: Option<String>,
    /// Case-insensitive match on partner names and email.
    pub search: Option<String>,
}
