//! Rate-limited consumer of the `email_jobs` queue.
//!
//! Each iteration claims the oldest queued job, waits for a permit from a
//! direct `governor` limiter, hands the message to the [`Mailer`] and records
//! the outcome. A failed job is marked `failed` with its error and is never
//! retried.
//!
//! Shutdown is only observed between iterations: a claimed job always ends
//! up `sent` or `failed`. Jobs left in `sending` by a worker that was killed
//! outright are failed by the sweep at startup.

use std::sync::Arc;

use chrono::{Duration, Utc};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tokio_util::sync::CancellationToken;
use wedplan_db::models::email_job::EmailJob;
use wedplan_db::repositories::EmailJobRepo;
use wedplan_db::DbPool;
use wedplan_events::queue::decode_job;
use wedplan_events::Mailer;

use crate::config::WorkerConfig;

/// A `sending` job claimed longer ago than this belongs to a dead worker.
const ABANDONED_AFTER_MINS: i64 = 15;

/// Errors that stop a single iteration. Delivery failures are not errors at
/// this level; they are recorded on the job.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of processing one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Sent,
    Failed(String),
}

pub struct EmailWorker {
    pool: DbPool,
    mailer: Arc<dyn Mailer>,
    limiter: DefaultDirectRateLimiter,
    config: WorkerConfig,
}

impl EmailWorker {
    pub fn new(pool: DbPool, mailer: Arc<dyn Mailer>, config: WorkerConfig) -> Self {
        Self {
            pool,
            mailer,
            limiter: RateLimiter::direct(Quota::per_second(config.rate_per_sec)),
            config,
        }
    }

    /// Run until `cancel` fires.
    ///
    /// Drains the queue back to back while jobs are available and sleeps for
    /// the poll interval once it is empty or after a database error.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            rate_per_sec = self.config.rate_per_sec.get(),
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "Email worker started"
        );

        if let Err(e) = self.fail_abandoned().await {
            tracing::error!(error = %e, "Email worker: abandoned job sweep failed");
        }

        while !cancel.is_cancelled() {
            let idle = match self.process_next().await {
                Ok(processed) => !processed,
                Err(e) => {
                    tracing::error!(error = %e, "Email worker: iteration failed");
                    true
                }
            };

            if idle {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.config.poll_interval) => {}
                }
            }
        }

        tracing::info!("Email worker stopping");
    }

    /// Fail jobs stuck in `sending` since before [`ABANDONED_AFTER_MINS`].
    pub async fn fail_abandoned(&self) -> Result<usize, WorkerError> {
        let cutoff = Utc::now() - Duration::minutes(ABANDONED_AFTER_MINS);
        let failed = EmailJobRepo::fail_abandoned(
            &self.pool,
            cutoff,
            "Worker stopped before the email was sent",
        )
        .await?;
        for &job_id in &failed {
            tracing::error!(job_id, "Email job abandoned mid-send, marked failed");
        }
        Ok(failed.len())
    }

    /// Claim and process one job. Returns `false` when the queue is empty.
    pub async fn process_next(&self) -> Result<bool, WorkerError> {
        let Some(job) = EmailJobRepo::claim_next(&self.pool).await? else {
            return Ok(false);
        };

        self.limiter.until_ready().await;

        match deliver(self.mailer.as_ref(), &job).await {
            JobOutcome::Sent => {
                EmailJobRepo::mark_sent(&self.pool, job.id).await?;
                tracing::info!(job_id = job.id, "Email job sent");
            }
            JobOutcome::Failed(error) => {
                EmailJobRepo::mark_failed(&self.pool, job.id, &error).await?;
                tracing::error!(job_id = job.id, %error, "Email job failed");
            }
        }
        Ok(true)
    }
}

/// Decode and send the message stored in `job`.
pub async fn deliver(mailer: &dyn Mailer, job: &EmailJob) -> JobOutcome {
    let email = match decode_job(job) {
        Ok(email) => email,
        Err(e) => return JobOutcome::Failed(format!("Malformed email payload: {e}")),
    };
    match mailer.send(&email).await {
        Ok(()) => JobOutcome::Sent,
        Err(e) => JobOutcome::Failed(e.to_string()),
    }
}
