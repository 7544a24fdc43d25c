//! Content hashing for autosave deduplication.
//!
//! Autosave requests arrive on every debounced edit. A write is skipped when
//! the serialized content is identical to what was last saved, which is
//! detected by comparing SHA-256 digests of the canonical JSON.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// SHA-256 hex digest of the canonical serialization of `content`.
///
/// `serde_json` keeps object keys sorted (no `preserve_order` feature), so two
/// documents with the same fields in different input order hash the same.
pub fn content_hash(content: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whether `content` differs from the content that produced `previous_hash`.
pub fn should_save(previous_hash: Option<&str>, content: &Value) -> bool {
    previous_hash != Some(content_hash(content).as_str())
}
