//! Proposal delivery pipeline.
//!
//! Render the public proposal page to PDF, email it to the client with the
//! PDF attached, and only then record the proposal as sent. Any failure
//! leaves the stored proposal untouched.

use std::future::Future;

use wedplan_db::models::proposal::Proposal;
use wedplan_events::templates::proposal_email;
use wedplan_events::{EmailError, Mailer};

use crate::pdf::{PdfError, PdfRenderer};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("PDF generation failed: {0}")]
    Render(#[from] PdfError),

    #[error("Email delivery failed: {0}")]
    Email(#[from] EmailError),

    #[error("Failed to record proposal as sent: {0}")]
    Persist(#[from] sqlx::Error),
}

/// Run the pipeline for `proposal`.
///
/// `mark_sent` is awaited only after both the render and the send succeed;
/// its output is returned.
pub async fn dispatch_proposal<F, Fut, T>(
    proposal: &Proposal,
    page_url: &str,
    renderer: &dyn PdfRenderer,
    mailer: &dyn Mailer,
    mark_sent: F,
) -> Result<T, DispatchError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let pdf = renderer.render_url(page_url).await?;
    tracing::debug!(
        proposal_id = proposal.id,
        bytes = pdf.len(),
        "Proposal PDF rendered"
    );

    let email = proposal_email(
        &proposal.client_email,
        &proposal.client_name,
        &proposal.reference_code,
        &proposal.title,
        page_url,
        pdf,
    );
    mailer.send(&email).await?;
    tracing::info!(
        proposal_id = proposal.id,
        to = %proposal.client_email,
        "Proposal emailed"
    );

    Ok(mark_sent().await?)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use wedplan_events::OutgoingEmail;

    use super::*;

    struct FakeRenderer {
        fail: bool,
    }

    #[async_trait]
    impl PdfRenderer for FakeRenderer {
        async fn render_url(&self, _url: &str) -> Result<Vec<u8>, PdfError> {
            if self.fail {
                Err(PdfError::EmptyOutput)
            } else {
                Ok(b"%PDF-1.7 fake".to_vec())
            }
        }
    }

    #[derive(Default)]
    struct FakeMailer {
        fail: bool,
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl Mailer for FakeMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
            if self.fail {
                return Err(EmailError::NotConfigured);
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn proposal() -> Proposal {
        Proposal {
            id: 5,
            lead_id: 1,
            template_id: None,
            reference_code: "PRP-20261016-0001".into(),
            title: "Goa beach wedding".into(),
            client_name: "Asha".into(),
            client_email: "asha@example.com".into(),
            services: json!([]),
            total_amount: 0,
            notes: None,
            status: "draft".into(),
            sent_at: None,
            created_by: Some(2),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn marks_sent_after_render_and_send() {
        let mailer = FakeMailer::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result = dispatch_proposal(
            &proposal(),
            "http://app/proposals/PRP-20261016-0001",
            &FakeRenderer { fail: false },
            &mailer,
            || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, sqlx::Error>("sent")
            },
        )
        .await
        .unwrap();

        assert_eq!(result, "sent");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "asha@example.com");
        assert_eq!(sent[0].attachments.len(), 1);
        assert_eq!(sent[0].attachments[0].filename, "PRP-20261016-0001.pdf");
    }

    #[tokio::test]
    async fn render_failure_skips_send_and_status() {
        let mailer = FakeMailer::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let err = dispatch_proposal(
            &proposal(),
            "http://app/p",
            &FakeRenderer { fail: true },
            &mailer,
            || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, sqlx::Error>(())
            },
        )
        .await
        .unwrap_err();

        assert_matches!(err, DispatchError::Render(_));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_failure_leaves_status_unchanged() {
        let mailer = FakeMailer {
            fail: true,
            ..Default::default()
        };
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let err = dispatch_proposal(
            &proposal(),
            "http://app/p",
            &FakeRenderer { fail: false },
            &mailer,
            || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, sqlx::Error>(())
            },
        )
        .await
        .unwrap_err();

        assert_matches!(err, DispatchError::Email(EmailError::NotConfigured));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(err.to_string().starts_with("Email delivery failed"));
    }
}
