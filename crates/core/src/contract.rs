//! Contract template placeholder rendering.
//!
//! Templates contain `{{ key }}` placeholders (whitespace inside the braces
//! is optional). Rendering substitutes known keys and leaves unknown
//! placeholders in place so they remain visible in the preview.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::CoreError;

/// Maximum template body length in bytes.
pub const MAX_TEMPLATE_LENGTH: usize = 200_000;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_.]*)\s*\}\}").expect("valid regex")
});

/// Distinct placeholder keys in `body`, sorted.
pub fn placeholders(body: &str) -> Vec<String> {
    PLACEHOLDER_RE
        .captures_iter(body)
        .map(|c| c[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Placeholder keys in `body` with no entry in `values`, sorted.
pub fn missing_placeholders(body: &str, values: &HashMap<String, String>) -> Vec<String> {
    placeholders(body)
        .into_iter()
        .filter(|key| !values.contains_key(key))
        .collect()
}

/// Substitute every known placeholder in `body`.
pub fn render_template(body: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(body, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Validate a template body: non-blank and bounded.
pub fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::invalid_field("body", "Template body must not be blank"));
    }
    if body.len() > MAX_TEMPLATE_LENGTH {
        return Err(CoreError::invalid_field(
            "body",
            format!("Template body exceeds {MAX_TEMPLATE_LENGTH} bytes"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn renders_known_placeholders() {
        let body = "This agreement between {{client_name}} and {{ vendor.name }} on {{date}}.";
        let rendered = render_template(
            body,
            &values(&[("client_name", "Asha Rao"), ("vendor.name", "Bloom Decor")]),
        );
        assert_eq!(
            rendered,
            "This agreement between Asha Rao and Bloom Decor on {{date}}."
        );
    }

    #[test]
    fn lists_and_reports_missing_placeholders() {
        let body = "{{b}} {{a}} {{ b }} {{c}}";
        assert_eq!(placeholders(body), vec!["a", "b", "c"]);
        assert_eq!(missing_placeholders(body, &values(&[("a", "1")])), vec!["b", "c"]);
    }

    #[test]
    fn body_validation() {
        assert!(validate_body("Dear {{client}}").is_ok());
        assert!(validate_body("  ").is_err());
    }
}
