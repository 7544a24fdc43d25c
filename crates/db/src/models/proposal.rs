//! Proposal entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use wedplan_core::proposal::LineItem;
use wedplan_core::types::{DbId, Timestamp};
use wedplan_core::validation::validate_not_blank;

/// A row from the `proposals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Proposal {
    pub id: DbId,
    pub lead_id: DbId,
    pub template_id: Option<DbId>,
    pub reference_code: String,
    pub title: String,
    pub client_name: String,
    pub client_email: String,
    /// JSON array of line items.
    pub services: serde_json::Value,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub status: String,
    pub sent_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Proposal {
    /// Decode the stored line items. Malformed rows yield an empty list.
    pub fn line_items(&self) -> Vec<LineItem> {
        serde_json::from_value(self.services.clone()).unwrap_or_default()
    }
}

/// Request body for creating a proposal for a lead.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProposalRequest {
    pub lead_id: DbId,
    pub template_id: Option<DbId>,
    #[validate(
        length(min = 1, max = 200),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    #[serde(default)]
    pub services: Vec<LineItem>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

/// Request body for editing a draft proposal.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProposalRequest {
    #[validate(
        length(min = 1, max = 200),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    pub services: Option<Vec<LineItem>>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

/// DTO for inserting a proposal once the reference code and total are known.
#[derive(Debug)]
pub struct CreateProposal {
    pub lead_id: DbId,
    pub template_id: Option<DbId>,
    pub reference_code: String,
    pub title: String,
    pub client_name: String,
    pub client_email: String,
    pub services: serde_json::Value,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for updating a draft proposal. `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct UpdateProposal {
    pub title: Option<String>,
    pub services: Option<serde_json::Value>,
    pub total_amount: Option<i64>,
    pub notes: Option<String>,
}
