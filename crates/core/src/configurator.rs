//! Wedding configurator wizard steps and validation.
//!
//! The configurator walks a couple through six steps and stores the answers
//! of each step under its own key in the plan's `step_data` document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 6;

/// Allowed guest count range.
pub const MIN_GUESTS: i32 = 1;
pub const MAX_GUESTS: i32 = 5_000;

/// Wizard steps in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfiguratorStep {
    Basics,
    Budget,
    Location,
    Vibe,
    Services,
    Review,
}

impl ConfiguratorStep {
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Basics),
            2 => Ok(Self::Budget),
            3 => Ok(Self::Location),
            4 => Ok(Self::Vibe),
            5 => Ok(Self::Services),
            6 => Ok(Self::Review),
            _ => Err(CoreError::invalid_field(
                "step",
                format!("Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"),
            )),
        }
    }

    /// Key under which this step's answers are stored.
    pub fn data_key(self) -> &'static str {
        match self {
            Self::Basics => "basics",
            Self::Budget => "budget",
            Self::Location => "location",
            Self::Vibe => "vibe",
            Self::Services => "services",
            Self::Review => "review",
        }
    }
}

/// Validate a step transition.
///
/// Moving forward is allowed one step at a time; moving back may jump to any
/// earlier step. Staying on the same step is allowed (re-saving answers).
pub fn validate_step_transition(current: u8, next: u8) -> Result<(), CoreError> {
    ConfiguratorStep::from_number(current)?;
    ConfiguratorStep::from_number(next)?;
    if next > current + 1 {
        return Err(CoreError::invalid_field(
            "step",
            format!("Cannot skip from step {current} to step {next}"),
        ));
    }
    Ok(())
}

/// Validate a guest count.
pub fn validate_guest_count(guests: i32) -> Result<(), CoreError> {
    if !(MIN_GUESTS..=MAX_GUESTS).contains(&guests) {
        return Err(CoreError::invalid_field(
            "guest_count",
            format!("Guest count must be between {MIN_GUESTS} and {MAX_GUESTS}"),
        ));
    }
    Ok(())
}

/// Store `answers` for `step` into the plan's step data.
///
/// Answers must be a JSON object; keys present in `answers` replace the
/// stored ones, other stored keys for the step are kept.
pub fn apply_step_answers(
    step_data: &Value,
    step: ConfiguratorStep,
    answers: &Value,
) -> Result<Value, CoreError> {
    let answers = answers.as_object().ok_or_else(|| {
        CoreError::invalid_field("data", "Step answers must be a JSON object")
    })?;
    let mut data = step_data.as_object().cloned().unwrap_or_default();
    let mut entry: Map<String, Value> = data
        .get(step.data_key())
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for (key, value) in answers {
        entry.insert(key.clone(), value.clone());
    }
    data.insert(step.data_key().to_string(), Value::Object(entry));
    Ok(Value::Object(data))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn step_numbers_map_to_steps() {
        assert_eq!(ConfiguratorStep::from_number(MIN_STEP).unwrap(), ConfiguratorStep::Basics);
        assert_eq!(ConfiguratorStep::from_number(MAX_STEP).unwrap(), ConfiguratorStep::Review);
        assert!(ConfiguratorStep::from_number(0).is_err());
        assert!(ConfiguratorStep::from_number(7).is_err());
    }

    #[test]
    fn transitions() {
        assert!(validate_step_transition(1, 2).is_ok());
        assert!(validate_step_transition(3, 3).is_ok());
        assert!(validate_step_transition(5, 1).is_ok());
        assert!(validate_step_transition(1, 3).is_err());
        assert!(validate_step_transition(6, 7).is_err());
    }

    #[test]
    fn guest_bounds() {
        assert!(validate_guest_count(150).is_ok());
        assert!(validate_guest_count(0).is_err());
        assert!(validate_guest_count(MAX_GUESTS + 1).is_err());
    }

    #[test]
    fn answers_merge_into_step_slot() {
        let data = json!({ "basics": { "date": "2026-12-12", "guests": 200 } });
        let merged =
            apply_step_answers(&data, ConfiguratorStep::Basics, &json!({ "guests": 250 })).unwrap();
        assert_eq!(merged["basics"]["date"], "2026-12-12");
        assert_eq!(merged["basics"]["guests"], 250);

        let merged =
            apply_step_answers(&merged, ConfiguratorStep::Vibe, &json!({ "slug": "boho" })).unwrap();
        assert_eq!(merged["vibe"]["slug"], "boho");
        assert_eq!(merged["basics"]["guests"], 250);
    }

    #[test]
    fn answers_must_be_an_object() {
        assert!(apply_step_answers(&json!({}), ConfiguratorStep::Budget, &json!(5)).is_err());
    }
}
