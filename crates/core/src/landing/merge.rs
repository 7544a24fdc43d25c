//! Merge-on-update for landing-page sections.
//!
//! For every declared field the new value wins when it is a non-blank
//! string; otherwise the stored value is kept. Cards merge element-wise by
//! index and the array grows when the update carries more cards than are
//! stored. Uploaded media paths override image fields: `image` targets the
//! section image, `card{idx}` targets the image of card `idx`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::schema::{CardSchema, Section, CARD_MEDIA_PREFIX, MAX_CARDS, SECTION_MEDIA_KEY};
use crate::error::CoreError;

/// Uploaded media for one update, keyed by positional media key.
pub type MediaFiles = BTreeMap<String, String>;

/// Merge a partial section update onto the stored document.
///
/// `body` is the decoded update payload (an object, or `null` for a
/// media-only update). `existing` is the stored document, if any. The result
/// always contains every declared field of the section.
pub fn merge_section(
    section: Section,
    body: &Value,
    media: &MediaFiles,
    existing: Option<&Value>,
) -> Result<Value, CoreError> {
    let schema = section.schema();
    let empty = Map::new();
    let body = match body {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(CoreError::Validation(
                "Section content must be a JSON object".into(),
            ))
        }
    };
    let existing = existing.and_then(Value::as_object).unwrap_or(&empty);

    let card_media = split_media(section, media)?;

    let mut merged = Map::new();
    for &field in schema.scalars {
        let value = pick(body, existing, field, field)?;
        merged.insert(field.to_string(), Value::String(value));
    }

    if let Some(image_field) = schema.image_field {
        let value = match media.get(SECTION_MEDIA_KEY) {
            Some(path) => path.clone(),
            None => pick(body, existing, image_field, image_field)?,
        };
        merged.insert(image_field.to_string(), Value::String(value));
    }

    if let Some(cards) = &schema.cards {
        let merged_cards = merge_cards(cards, body, existing, &card_media)?;
        merged.insert(cards.key.to_string(), Value::Array(merged_cards));
    }

    Ok(Value::Object(merged))
}

/// Extract `card{idx}` media entries, rejecting keys the section cannot hold.
fn split_media(section: Section, media: &MediaFiles) -> Result<BTreeMap<usize, String>, CoreError> {
    let schema = section.schema();
    let mut cards = BTreeMap::new();
    for (key, path) in media {
        if key == SECTION_MEDIA_KEY {
            if schema.image_field.is_none() {
                return Err(CoreError::invalid_field(
                    key.as_str(),
                    format!("Section '{}' has no section image", schema.name),
                ));
            }
            continue;
        }
        let idx = key
            .strip_prefix(CARD_MEDIA_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| {
                CoreError::invalid_field(key.as_str(), "Unrecognised media field")
            })?;
        if schema.cards.is_none() {
            return Err(CoreError::invalid_field(
                key.as_str(),
                format!("Section '{}' has no cards", schema.name),
            ));
        }
        if idx >= MAX_CARDS {
            return Err(CoreError::invalid_field(
                key.as_str(),
                format!("Card index must be below {MAX_CARDS}"),
            ));
        }
        cards.insert(idx, path.clone());
    }
    Ok(cards)
}

fn merge_cards(
    schema: &CardSchema,
    body: &Map<String, Value>,
    existing: &Map<String, Value>,
    card_media: &BTreeMap<usize, String>,
) -> Result<Vec<Value>, CoreError> {
    let incoming: &[Value] = match body.get(schema.key) {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(CoreError::invalid_field(schema.key, "Cards must be an array"));
        }
    };
    if incoming.len() > MAX_CARDS {
        return Err(CoreError::invalid_field(
            schema.key,
            format!("At most {MAX_CARDS} cards are allowed (got {})", incoming.len()),
        ));
    }
    let stored: &[Value] = existing
        .get(schema.key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let media_len = card_media.keys().next_back().map_or(0, |idx| idx + 1);
    let len = incoming.len().max(stored.len()).max(media_len);

    let empty = Map::new();
    let mut out = Vec::with_capacity(len);
    for idx in 0..len {
        let new_card = match incoming.get(idx) {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(CoreError::invalid_field(
                    format!("{}[{idx}]", schema.key),
                    "Each card must be an object",
                ));
            }
        };
        let old_card = stored.get(idx).and_then(Value::as_object).unwrap_or(&empty);

        let mut card = Map::new();
        for &field in schema.fields {
            let path = format!("{}[{idx}].{field}", schema.key);
            let value = pick(new_card, old_card, field, &path)?;
            card.insert(field.to_string(), Value::String(value));
        }
        let image = match card_media.get(&idx) {
            Some(path) => path.clone(),
            None => {
                let path = format!("{}[{idx}].{}", schema.key, schema.image_field);
                pick(new_card, old_card, schema.image_field, &path)?
            }
        };
        card.insert(schema.image_field.to_string(), Value::String(image));
        out.push(Value::Object(card));
    }
    Ok(out)
}

/// Choose the new value when it is a non-blank string, else the stored one.
///
/// `path` names the field in error messages.
fn pick(
    new: &Map<String, Value>,
    old: &Map<String, Value>,
    field: &str,
    path: &str,
) -> Result<String, CoreError> {
    match new.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => return Ok(s.trim().to_string()),
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => return Err(CoreError::invalid_field(path, "Expected a string")),
    }
    Ok(old
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
