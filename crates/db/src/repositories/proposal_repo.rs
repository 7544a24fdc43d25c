//! Repository for the `proposals` table.

use sqlx::PgPool;
use wedplan_core::proposal::ProposalStatus;
use wedplan_core::types::DbId;

use crate::models::proposal::{CreateProposal, Proposal, UpdateProposal};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, lead_id, template_id, reference_code, title, client_name, client_email, \
                       services, total_amount, notes, status, sent_at, created_by, created_at, \
                       updated_at";

/// Provides CRUD and dispatch-state operations for proposals.
pub struct ProposalRepo;

impl ProposalRepo {
    /// Insert a new draft proposal, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProposal) -> Result<Proposal, sqlx::Error> {
        let query = format!(
            "INSERT INTO proposals (lead_id, template_id, reference_code, title, client_name,
                                    client_email, services, total_amount, notes, status, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(input.lead_id)
            .bind(input.template_id)
            .bind(&input.reference_code)
            .bind(&input.title)
            .bind(&input.client_name)
            .bind(&input.client_email)
            .bind(&input.services)
            .bind(input.total_amount)
            .bind(&input.notes)
            .bind(ProposalStatus::Draft.as_str())
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Highest daily sequence already issued under `prefix`, or 0.
    ///
    /// Taken from the numeric suffix rather than a row count, so deleted
    /// proposals never cause a code to be issued twice.
    pub async fn highest_sequence_for_prefix(
        pool: &PgPool,
        prefix: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(MAX(SUBSTRING(reference_code FROM '([0-9]+)$')::bigint), 0)
             FROM proposals
             WHERE reference_code LIKE $1 || '%'",
        )
        .bind(prefix)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals WHERE id = $1");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a proposal by its public reference code.
    pub async fn find_by_reference(
        pool: &PgPool,
        reference_code: &str,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals WHERE reference_code = $1");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(reference_code)
            .fetch_optional(pool)
            .await
    }

    /// List proposals, newest first, optionally for a single lead.
    pub async fn list(pool: &PgPool, lead_id: Option<DbId>) -> Result<Vec<Proposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposals
             WHERE ($1::bigint IS NULL OR lead_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(lead_id)
            .fetch_all(pool)
            .await
    }

    /// Update a draft proposal. Rows in any other status are left untouched.
    ///
    /// Returns `None` if no draft with the given `id` exists.
    pub async fn update_draft(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProposal,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET
                title = COALESCE($2, title),
                services = COALESCE($3, services),
                total_amount = COALESCE($4, total_amount),
                notes = COALESCE($5, notes)
             WHERE id = $1 AND status = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.services)
            .bind(input.total_amount)
            .bind(&input.notes)
            .bind(ProposalStatus::Draft.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Record a successful dispatch: status `sent`, `sent_at = NOW()`.
    ///
    /// Only a draft or an already sent proposal moves. Returns `None` when the
    /// client answered while the proposal was being sent.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET status = $2, sent_at = NOW()
             WHERE id = $1 AND status IN ($3, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(ProposalStatus::Sent.as_str())
            .bind(ProposalStatus::Draft.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Record the client's answer on a sent proposal.
    ///
    /// Returns `None` unless the proposal is currently `sent`.
    pub async fn record_answer(
        pool: &PgPool,
        id: DbId,
        answer: ProposalStatus,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET status = $2 WHERE id = $1 AND status = $3 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(answer.as_str())
            .bind(ProposalStatus::Sent.as_str())
            .fetch_optional(pool)
            .await
    }
}
