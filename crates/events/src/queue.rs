//! Durable outbound email queue.
//!
//! Handlers enqueue [`OutgoingEmail`]s as JSON rows in `email_jobs`; the
//! `wedplan-worker` binary drains them at a bounded rate. A queued email is
//! never deduplicated or reordered, and a failed send is not retried.

use wedplan_core::types::DbId;
use wedplan_db::models::email_job::EmailJob;
use wedplan_db::repositories::EmailJobRepo;
use wedplan_db::DbPool;

use crate::delivery::email::OutgoingEmail;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Failed to encode email payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Producer side of the email queue.
#[derive(Clone)]
pub struct EmailQueue {
    pool: DbPool,
}

impl EmailQueue {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append `email` to the queue, returning the job ID.
    pub async fn enqueue(&self, email: &OutgoingEmail) -> Result<DbId, QueueError> {
        let payload = serde_json::to_value(email)?;
        let job_id = EmailJobRepo::enqueue(&self.pool, &payload).await?;
        tracing::info!(job_id, to = %email.to, subject = %email.subject, "Email queued");
        Ok(job_id)
    }
}

/// Decode the message stored in a claimed job.
pub fn decode_job(job: &EmailJob) -> Result<OutgoingEmail, serde_json::Error> {
    serde_json::from_value(job.payload.clone())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::templates::otp_email;

    fn job(payload: serde_json::Value) -> EmailJob {
        EmailJob {
            id: 1,
            payload,
            status: "sending".to_string(),
            attempts: 1,
            last_error: None,
            claimed_at: Some(Utc::now()),
            sent_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn queued_payload_decodes_back() {
        let email = otp_email("a@example.com", "Asha", "123456", 10);
        let decoded = decode_job(&job(serde_json::to_value(&email).unwrap())).unwrap();
        assert_eq!(decoded, email);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(decode_job(&job(serde_json::json!({ "to": 5 }))).is_err());
    }
}
