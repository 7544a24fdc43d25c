//! Repository for the `email_jobs` queue table.

use sqlx::PgPool;
use wedplan_core::types::{DbId, Timestamp};

use crate::models::email_job::{EmailJob, STATUS_FAILED, STATUS_QUEUED, STATUS_SENDING, STATUS_SENT};

const COLUMNS: &str =
    "id, payload, status, attempts, last_error, claimed_at, sent_at, created_at";

/// Durable queue of outbound emails.
pub struct EmailJobRepo;

impl EmailJobRepo {
    /// Append a job in the `queued` state, returning its ID.
    pub async fn enqueue(pool: &PgPool, payload: &serde_json::Value) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar("INSERT INTO email_jobs (payload, status) VALUES ($1, $2) RETURNING id")
            .bind(payload)
            .bind(STATUS_QUEUED)
            .fetch_one(pool)
            .await
    }

    /// Atomically claim the oldest queued job.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` so concurrent workers never
    /// claim the same job.
    pub async fn claim_next(pool: &PgPool) -> Result<Option<EmailJob>, sqlx::Error> {
        let query = format!(
            "UPDATE email_jobs \
             SET status = $1, claimed_at = NOW(), attempts = attempts + 1 \
             WHERE id = ( \
                 SELECT id FROM email_jobs \
                 WHERE status = $2 \
                 ORDER BY id ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailJob>(&query)
            .bind(STATUS_SENDING)
            .bind(STATUS_QUEUED)
            .fetch_optional(pool)
            .await
    }

    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE email_jobs SET status = $2, sent_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(STATUS_SENT)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a terminal failure. Failed jobs are not picked up again.
    pub async fn mark_failed(pool: &PgPool, id: DbId, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE email_jobs SET status = $2, last_error = $3 WHERE id = $1")
            .bind(id)
            .bind(STATUS_FAILED)
            .bind(error)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Fail every job still `sending` that was claimed before `cutoff`.
    ///
    /// A worker that died mid-send leaves its job in `sending`, which
    /// `claim_next` never looks at again. Returns the IDs that were failed.
    pub async fn fail_abandoned(
        pool: &PgPool,
        cutoff: Timestamp,
        error: &str,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE email_jobs SET status = $1, last_error = $2 \
             WHERE status = $3 AND claimed_at < $4 \
             RETURNING id",
        )
        .bind(STATUS_FAILED)
        .bind(error)
        .bind(STATUS_SENDING)
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<EmailJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_jobs WHERE id = $1");
        sqlx::query_as::<_, EmailJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
