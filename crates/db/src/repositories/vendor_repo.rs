//! Repository for the `vendors` table.

use sqlx::PgPool;
use wedplan_core::types::DbId;

use crate::models::vendor::{CreateVendor, UpdateVendor, Vendor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, business_name, contact_name, email, phone, city, service_categories, \
                       budget_min, budget_max, logo_path, is_active, user_id, created_at, updated_at";

/// Provides CRUD operations for vendors.
pub struct VendorRepo;

impl VendorRepo {
    /// Insert a new vendor, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateVendor) -> Result<Vendor, sqlx::Error> {
        let query = format!(
            "INSERT INTO vendors (business_name, contact_name, email, phone, city,
                                  service_categories, budget_min, budget_max, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(input.business_name.trim())
            .bind(input.contact_name.trim())
            .bind(input.email.trim())
            .bind(&input.phone)
            .bind(&input.city)
            .bind(&input.service_categories)
            .bind(input.budget_min)
            .bind(input.budget_max)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a vendor by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vendors WHERE id = $1");
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List vendors, optionally restricted to one service category.
    pub async fn list(pool: &PgPool, category: Option<&str>) -> Result<Vec<Vendor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vendors
             WHERE ($1::text IS NULL OR $1 = ANY(service_categories))
             ORDER BY business_name ASC"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Update a vendor. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVendor,
    ) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!(
            "UPDATE vendors SET
                business_name = COALESCE($2, business_name),
                contact_name = COALESCE($3, contact_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                city = COALESCE($6, city),
                service_categories = COALESCE($7, service_categories),
                budget_min = COALESCE($8, budget_min),
                budget_max = COALESCE($9, budget_max),
                is_active = COALESCE($10, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .bind(input.business_name.as_deref().map(str::trim))
            .bind(input.contact_name.as_deref().map(str::trim))
            .bind(input.email.as_deref().map(str::trim))
            .bind(&input.phone)
            .bind(&input.city)
            .bind(&input.service_categories)
            .bind(input.budget_min)
            .bind(input.budget_max)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Set the vendor's logo path. Returns `None` if the vendor does not exist.
    pub async fn set_logo(
        pool: &PgPool,
        id: DbId,
        logo_path: &str,
    ) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!("UPDATE vendors SET logo_path = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .bind(logo_path)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a vendor (cascades to its teams). Returns `true` if removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
