//! Repository for the `password_resets` table.

use sqlx::PgPool;
use wedplan_core::types::{DbId, Timestamp};

use crate::models::password_reset::PasswordReset;

const COLUMNS: &str = "id, user_id, otp_hash, attempts, expires_at, used_at, created_at";

/// Stores hashed one-time codes for password resets.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Issue a new code for `user_id`, invalidating any previous unused code.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        otp_hash: &str,
        expires_at: Timestamp,
    ) -> Result<PasswordReset, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE password_resets SET used_at = NOW() \
             WHERE user_id = $1 AND used_at IS NULL",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO password_resets (user_id, otp_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let reset = sqlx::query_as::<_, PasswordReset>(&query)
            .bind(user_id)
            .bind(otp_hash)
            .bind(expires_at)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(reset)
    }

    /// The latest unused code for a user, expired or not.
    pub async fn find_active(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM password_resets \
             WHERE user_id = $1 AND used_at IS NULL \
             ORDER BY created_at DESC LIMIT 1"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Count a wrong guess against a code.
    pub async fn increment_attempts(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE password_resets SET attempts = attempts + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Consume a code. Returns `false` if it was already used.
    pub async fn mark_used(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE password_resets SET used_at = NOW() WHERE id = $1 AND used_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
