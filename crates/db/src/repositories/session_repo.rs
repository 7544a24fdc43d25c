//! Refresh-token sessions.

use sqlx::{PgConnection, PgPool};
use wedplan_core::types::DbId;

use crate::models::session::{CreateSession, Session};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                       user_agent, ip_address, created_at, updated_at";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        insert(&mut conn, input).await
    }

    /// The live session for a refresh token digest. Revoked and expired
    /// sessions are never returned.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE refresh_token_hash = $1 AND NOT is_revoked AND expires_at > NOW()"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke session `previous` and store `next` atomically.
    ///
    /// Returns `None` without inserting when `previous` was already revoked,
    /// which is how a second redemption of the same refresh token loses.
    pub async fn rotate(
        pool: &PgPool,
        previous: DbId,
        next: &CreateSession,
    ) -> Result<Option<Session>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let revoked =
            sqlx::query("UPDATE sessions SET is_revoked = true WHERE id = $1 AND NOT is_revoked")
                .bind(previous)
                .execute(&mut *tx)
                .await?;
        if revoked.rows_affected() == 0 {
            return Ok(None);
        }

        let session = insert(&mut tx, next).await?;
        tx.commit().await?;
        Ok(Some(session))
    }

    /// Revoke every live session of a user (logout, password reset,
    /// deactivation). Returns how many were revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET is_revoked = true WHERE user_id = $1 AND NOT is_revoked",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}

async fn insert(conn: &mut PgConnection, input: &CreateSession) -> Result<Session, sqlx::Error> {
    let query = format!(
        "INSERT INTO sessions (user_id, refresh_token_hash, expires_at, user_agent, ip_address)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Session>(&query)
        .bind(input.user_id)
        .bind(&input.refresh_token_hash)
        .bind(input.expires_at)
        .bind(&input.user_agent)
        .bind(&input.ip_address)
        .fetch_one(conn)
        .await
}
