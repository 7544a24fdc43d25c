//! Proposal and contract template models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use wedplan_core::types::{DbId, Timestamp};
use wedplan_core::validation::validate_not_blank;

/// A row from the `proposal_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProposalTemplate {
    pub id: DbId,
    pub name: String,
    pub body: String,
    /// JSON array of line items pre-filled into new proposals.
    pub default_services: serde_json::Value,
    pub is_system: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a proposal template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProposalTemplate {
    #[validate(
        length(min = 1, max = 200),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub body: String,
    pub default_services: Option<serde_json::Value>,
}

/// DTO for updating a proposal template.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProposalTemplate {
    #[validate(
        length(min = 1, max = 200),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub body: Option<String>,
    pub default_services: Option<serde_json::Value>,
}

/// A row from the `contract_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractTemplate {
    pub id: DbId,
    pub name: String,
    pub body: String,
    pub is_system: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a contract template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContractTemplate {
    #[validate(
        length(min = 1, max = 200),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    pub body: String,
}

/// DTO for updating a contract template.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContractTemplate {
    #[validate(
        length(min = 1, max = 200),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    pub body: Option<String>,
}
