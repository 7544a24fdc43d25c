//! Vendor service categories and budget-range matching.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A service a vendor can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Venue,
    Catering,
    Photography,
    Videography,
    Decor,
    Music,
    Makeup,
    Attire,
    Planning,
    Other,
}

impl ServiceCategory {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "venue" => Ok(Self::Venue),
            "catering" => Ok(Self::Catering),
            "photography" => Ok(Self::Photography),
            "videography" => Ok(Self::Videography),
            "decor" => Ok(Self::Decor),
            "music" => Ok(Self::Music),
            "makeup" => Ok(Self::Makeup),
            "attire" => Ok(Self::Attire),
            "planning" => Ok(Self::Planning),
            "other" => Ok(Self::Other),
            _ => Err(CoreError::invalid_field(
                "service_categories",
                format!("Unknown service category '{s}'"),
            )),
        }
    }
}

/// Validate the category list stored on a vendor: non-empty, known, unique.
pub fn validate_categories(categories: &[String]) -> Result<(), CoreError> {
    if categories.is_empty() {
        return Err(CoreError::invalid_field(
            "service_categories",
            "At least one service category is required",
        ));
    }
    for (idx, category) in categories.iter().enumerate() {
        ServiceCategory::from_str_db(category)?;
        if categories[..idx].contains(category) {
            return Err(CoreError::invalid_field(
                "service_categories",
                format!("Duplicate service category '{category}'"),
            ));
        }
    }
    Ok(())
}

/// Whether a vendor serving `[min, max]` can take a client with `budget`.
///
/// Missing bounds are open-ended.
pub fn serves_budget(min: Option<i64>, max: Option<i64>, budget: i64) -> bool {
    min.is_none_or(|min| budget >= min) && max.is_none_or(|max| budget <= max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_must_be_known_and_unique() {
        assert!(validate_categories(&["venue".into(), "decor".into()]).is_ok());
        assert!(validate_categories(&[]).is_err());
        assert!(validate_categories(&["fireworks".into()]).is_err());
        assert!(validate_categories(&["music".into(), "music".into()]).is_err());
    }

    #[test]
    fn budget_matching_is_inclusive_and_open_ended() {
        assert!(serves_budget(Some(100), Some(500), 100));
        assert!(serves_budget(Some(100), Some(500), 500));
        assert!(!serves_budget(Some(100), Some(500), 501));
        assert!(serves_budget(None, Some(500), 0));
        assert!(serves_budget(Some(100), None, 1_000_000));
        assert!(!serves_budget(Some(100), None, 99));
    }
}
