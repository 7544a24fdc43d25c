//! Password-reset OTP model.

use sqlx::FromRow;
use wedplan_core::types::{DbId, Timestamp};

/// A row from the `password_resets` table. Only the OTP hash is stored.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub id: DbId,
    pub user_id: DbId,
    pub otp_hash: String,
    pub attempts: i32,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
