//! Proposal status rules, reference codes, and line-item pricing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Prefix of every proposal reference code.
pub const REFERENCE_PREFIX: &str = "PRP";

/// Maximum number of line items on one proposal.
pub const MAX_LINE_ITEMS: usize = 100;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle of a proposal.
///
/// Status only moves forward: a draft becomes `sent` once it has been
/// rendered and emailed, and a sent proposal is later accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::invalid_field(
                "status",
                format!(
                    "Invalid proposal status '{s}'. Must be one of: draft, sent, accepted, rejected"
                ),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Whether moving from `self` to `next` keeps the status moving forward.
    ///
    /// `sent -> sent` is allowed so a proposal can be emailed again.
    pub fn can_transition(self, next: ProposalStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Sent)
                | (Self::Sent, Self::Sent)
                | (Self::Sent, Self::Accepted)
                | (Self::Sent, Self::Rejected)
        )
    }

    /// Whether the proposal content may still be edited.
    pub fn is_editable(self) -> bool {
        self == Self::Draft
    }
}

/// Check a transition, returning a conflict error when it would move backward.
pub fn validate_transition(current: ProposalStatus, next: ProposalStatus) -> Result<(), CoreError> {
    if current.can_transition(next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Proposal cannot move from '{}' to '{}'",
            current.as_str(),
            next.as_str()
        )))
    }
}

// ---------------------------------------------------------------------------
// Reference codes
// ---------------------------------------------------------------------------

/// Build a reference code of the form `PRP-YYYYMMDD-NNNN`.
///
/// `sequence` is the number of proposals already created that day; it is
/// rendered one-based and zero-padded to four digits.
pub fn generate_reference_code(date: NaiveDate, sequence: i64) -> String {
    format!(
        "{REFERENCE_PREFIX}-{}-{:04}",
        date.format("%Y%m%d"),
        sequence + 1
    )
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// One priced service on a proposal. Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i64,
    pub unit_price: i64,
}

impl LineItem {
    pub fn amount(&self) -> i64 {
        self.quantity.saturating_mul(self.unit_price)
    }
}

/// Sum of all line-item amounts.
pub fn total(items: &[LineItem]) -> i64 {
    items.iter().map(LineItem::amount).fold(0, i64::saturating_add)
}

/// Validate line items: bounded count, named, positive quantity, non-negative price.
pub fn validate_line_items(items: &[LineItem]) -> Result<(), CoreError> {
    if items.len() > MAX_LINE_ITEMS {
        return Err(CoreError::invalid_field(
            "services",
            format!("At most {MAX_LINE_ITEMS} services are allowed (got {})", items.len()),
        ));
    }
    for (idx, item) in items.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(CoreError::invalid_field(
                format!("services[{idx}].name"),
                "Service name must not be blank",
            ));
        }
        if item.quantity <= 0 {
            return Err(CoreError::invalid_field(
                format!("services[{idx}].quantity"),
                "Quantity must be positive",
            ));
        }
        if item.unit_price < 0 {
            return Err(CoreError::invalid_field(
                format!("services[{idx}].unit_price"),
                "Unit price must not be negative",
            ));
        }
    }
    Ok(())
}
