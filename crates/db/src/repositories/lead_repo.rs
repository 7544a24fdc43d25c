//! Repository for the `leads` table.

use sqlx::PgPool;
use wedplan_core::lead::{LeadSource, LeadStatus};
use wedplan_core::types::DbId;

use crate::models::lead::{CreateLead, Lead, LeadFilter, UpdateLead};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, partner_one_name, partner_two_name, email, phone, wedding_date, \
                       guest_count, budget_min, budget_max, preferred_locations, source, status, \
                       notes, owner_id, created_at, updated_at";

/// Provides CRUD and pipeline operations for leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a new lead in the `new` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads (partner_one_name, partner_two_name, email, phone, wedding_date,
                                guest_count, budget_min, budget_max, preferred_locations,
                                source, status, notes, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, $11), $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(input.partner_one_name.trim())
            .bind(&input.partner_two_name)
            .bind(input.email.trim())
            .bind(&input.phone)
            .bind(input.wedding_date)
            .bind(input.guest_count)
            .bind(input.budget_min)
            .bind(input.budget_max)
            .bind(&input.preferred_locations)
            .bind(&input.source)
            .bind(LeadSource::Website.as_str())
            .bind(LeadStatus::New.as_str())
            .bind(&input.notes)
            .bind(input.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a lead by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List leads matching `filter`, newest first.
    ///
    /// `limit = None` returns every match (used by the CSV export and kanban board).
    pub async fn list(
        pool: &PgPool,
        filter: &LeadFilter,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let (where_clause, next_idx) = Self::where_clause(filter);
        let paging = match limit {
            Some(_) => format!("LIMIT ${next_idx} OFFSET ${}", next_idx + 1),
            None => String::new(),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM leads {where_clause} ORDER BY created_at DESC, id DESC {paging}"
        );

        let mut q = sqlx::query_as::<_, Lead>(&query);
        if let Some(ref status) = filter.status {
            q = q.bind(status);
        }
        if let Some(ref source) = filter.source {
            q = q.bind(source);
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{search}%"));
        }
        if let Some(limit) = limit {
            q = q.bind(limit).bind(offset);
        }
        q.fetch_all(pool).await
    }

    /// Count leads matching `filter`.
    pub async fn count(pool: &PgPool, filter: &LeadFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = Self::where_clause(filter);
        let query = format!("SELECT COUNT(*) FROM leads {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(ref status) = filter.status {
            q = q.bind(status);
        }
        if let Some(ref source) = filter.source {
            q = q.bind(source);
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{search}%"));
        }
        q.fetch_one(pool).await
    }

    /// Build the dynamic WHERE clause for `filter` and the next free bind index.
    ///
    /// Bind order is status, source, search.
    fn where_clause(filter: &LeadFilter) -> (String, u32) {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if filter.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.source.is_some() {
            conditions.push(format!("source = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.search.is_some() {
            conditions.push(format!(
                "(partner_one_name ILIKE ${bind_idx} OR partner_two_name ILIKE ${bind_idx} \
                 OR email ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        (where_clause, bind_idx)
    }

    /// Update a lead. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLead,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET
                partner_one_name = COALESCE($2, partner_one_name),
                partner_two_name = COALESCE($3, partner_two_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                wedding_date = COALESCE($6, wedding_date),
                guest_count = COALESCE($7, guest_count),
                budget_min = COALESCE($8, budget_min),
                budget_max = COALESCE($9, budget_max),
                preferred_locations = COALESCE($10, preferred_locations),
                source = COALESCE($11, source),
                notes = COALESCE($12, notes),
                owner_id = COALESCE($13, owner_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(input.partner_one_name.as_deref().map(str::trim))
            .bind(&input.partner_two_name)
            .bind(input.email.as_deref().map(str::trim))
            .bind(&input.phone)
            .bind(input.wedding_date)
            .bind(input.guest_count)
            .bind(input.budget_min)
            .bind(input.budget_max)
            .bind(&input.preferred_locations)
            .bind(&input.source)
            .bind(&input.notes)
            .bind(input.owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Move a lead to a pipeline column. Returns `None` if the lead does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: LeadStatus,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("UPDATE leads SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move many leads to one column. Returns the number of rows updated.
    pub async fn bulk_update_status(
        pool: &PgPool,
        ids: &[DbId],
        status: LeadStatus,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE leads SET status = $2 WHERE id = ANY($1)")
            .bind(ids)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Permanently delete a lead. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
