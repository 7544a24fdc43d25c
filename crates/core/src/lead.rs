//! Lead pipeline statuses, sources, and bulk-operation validation.
//!
//! A lead moves through the inquiry pipeline shown on the kanban board. The
//! board allows dragging a card to any column, so status updates are not
//! restricted to adjacent columns.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum number of leads accepted by a single bulk status update.
pub const MAX_BULK_IDS: usize = 500;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Pipeline position of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    ProposalSent,
    Negotiation,
    Booked,
    Lost,
}

/// Kanban column order, left to right.
pub const KANBAN_COLUMNS: [LeadStatus; 7] = [
    LeadStatus::New,
    LeadStatus::Contacted,
    LeadStatus::Qualified,
    LeadStatus::ProposalSent,
    LeadStatus::Negotiation,
    LeadStatus::Booked,
    LeadStatus::Lost,
];

impl LeadStatus {
    /// Parse a status string from the database or a query parameter.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "qualified" => Ok(Self::Qualified),
            "proposal_sent" => Ok(Self::ProposalSent),
            "negotiation" => Ok(Self::Negotiation),
            "booked" => Ok(Self::Booked),
            "lost" => Ok(Self::Lost),
            _ => Err(CoreError::invalid_field(
                "status",
                format!(
                    "Invalid lead status '{s}'. Must be one of: new, contacted, qualified, \
                     proposal_sent, negotiation, booked, lost"
                ),
            )),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::ProposalSent => "proposal_sent",
            Self::Negotiation => "negotiation",
            Self::Booked => "booked",
            Self::Lost => "lost",
        }
    }

    /// Human-readable column label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::ProposalSent => "Proposal Sent",
            Self::Negotiation => "Negotiation",
            Self::Booked => "Booked",
            Self::Lost => "Lost",
        }
    }

    /// Whether the lead has left the active pipeline.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Booked | Self::Lost)
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Where a lead came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Website,
    Referral,
    Social,
    Vendor,
    WalkIn,
    Other,
}

impl LeadSource {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "website" => Ok(Self::Website),
            "referral" => Ok(Self::Referral),
            "social" => Ok(Self::Social),
            "vendor" => Ok(Self::Vendor),
            "walk_in" => Ok(Self::WalkIn),
            "other" => Ok(Self::Other),
            _ => Err(CoreError::invalid_field(
                "source",
                format!(
                    "Invalid lead source '{s}'. Must be one of: website, referral, social, \
                     vendor, walk_in, other"
                ),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Referral => "referral",
            Self::Social => "social",
            Self::Vendor => "vendor",
            Self::WalkIn => "walk_in",
            Self::Other => "other",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the id list of a bulk status update.
///
/// The list must be non-empty, at most [`MAX_BULK_IDS`] long, and free of
/// duplicates.
pub fn validate_bulk_ids(ids: &[DbId]) -> Result<(), CoreError> {
    if ids.is_empty() {
        return Err(CoreError::invalid_field(
            "ids",
            "At least one lead id is required",
        ));
    }
    if ids.len() > MAX_BULK_IDS {
        return Err(CoreError::invalid_field(
            "ids",
            format!("At most {MAX_BULK_IDS} leads can be updated at once (got {})", ids.len()),
        ));
    }
    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
        return Err(CoreError::invalid_field(
            "ids",
            format!("Duplicate lead id {dup}"),
        ));
    }
    Ok(())
}

/// Validate a list of preferred locations: at most 10 non-blank entries.
pub fn validate_preferred_locations(locations: &[String]) -> Result<(), CoreError> {
    if locations.len() > 10 {
        return Err(CoreError::invalid_field(
            "preferred_locations",
            "At most 10 preferred locations are allowed",
        ));
    }
    if locations.iter().any(|l| l.trim().is_empty()) {
        return Err(CoreError::invalid_field(
            "preferred_locations",
            "Preferred locations must not be blank",
        ));
    }
    Ok(())
}

/// Escape a value for a CSV cell (RFC 4180 quoting).
pub fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn status_round_trips_through_db_strings() {
        for status in KANBAN_COLUMNS {
            assert_eq!(LeadStatus::from_str_db(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_field_error() {
        assert_matches!(
            LeadStatus::from_str_db("archived"),
            Err(CoreError::InvalidField { field, .. }) if field == "status"
        );
    }

    #[test]
    fn closed_statuses() {
        assert!(LeadStatus::Booked.is_closed());
        assert!(LeadStatus::Lost.is_closed());
        assert!(!LeadStatus::Negotiation.is_closed());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&LeadStatus::ProposalSent).unwrap();
        assert_eq!(json, "\"proposal_sent\"");
    }

    #[test]
    fn source_parsing() {
        assert_eq!(LeadSource::from_str_db("walk_in").unwrap(), LeadSource::WalkIn);
        assert!(LeadSource::from_str_db("billboard").is_err());
    }

    #[test]
    fn bulk_ids_rules() {
        assert!(validate_bulk_ids(&[1, 2, 3]).is_ok());
        assert!(validate_bulk_ids(&[]).is_err());
        assert!(validate_bulk_ids(&[4, 5, 4]).is_err());
        let too_many: Vec<DbId> = (0..=MAX_BULK_IDS as DbId).collect();
        assert!(validate_bulk_ids(&too_many).is_err());
    }

    #[test]
    fn preferred_locations_rules() {
        assert!(validate_preferred_locations(&["Goa".into(), "Udaipur".into()]).is_ok());
        assert!(validate_preferred_locations(&[" ".into()]).is_err());
        let many: Vec<String> = (0..11).map(|i| format!("City {i}")).collect();
        assert!(validate_preferred_locations(&many).is_err());
    }

    #[test]
    fn csv_cells_are_quoted_when_needed() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
