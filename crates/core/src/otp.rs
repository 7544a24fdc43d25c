//! One-time passcodes for password resets.
//!
//! Codes are six decimal digits. Only the SHA-256 digest of a code is
//! persisted, next to its expiry time.

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::types::Timestamp;

/// Number of digits in a passcode.
pub const OTP_LENGTH: usize = 6;

/// Maximum wrong guesses before a passcode is burned.
pub const MAX_OTP_ATTEMPTS: i32 = 5;

/// Generate a random zero-padded six-digit passcode.
pub fn generate_otp() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{code:06}")
}

/// SHA-256 hex digest of a passcode.
pub fn hash_otp(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whether a passcode issued with `expires_at` is still usable at `now`.
pub fn is_unexpired(expires_at: Timestamp, now: Timestamp) -> bool {
    now < expires_at
}

/// Whether `code` has the right shape (six ASCII digits).
pub fn is_well_formed(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.chars().all(|c| c.is_ascii_digit())
}
