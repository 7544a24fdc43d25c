//! Handlers for the `/leads` resource.
//!
//! Staff (admin and team members) manage the pipeline. The public inquiry
//! form posts to `/leads/inquiry` without authentication.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wedplan_core::error::CoreError;
use wedplan_core::lead::{
    csv_escape, validate_bulk_ids, validate_preferred_locations, LeadSource, LeadStatus,
    KANBAN_COLUMNS,
};
use wedplan_core::types::DbId;
use wedplan_core::validation::validate_budget_range;
use wedplan_db::models::lead::{CreateLead, Lead, LeadFilter, UpdateLead};
use wedplan_db::repositories::LeadRepo;
use wedplan_events::bus::EventKind;
use wedplan_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::query::PaginationParams;
use crate::response::{ApiResponse, Page};
use crate::state::AppState;

/// Query parameters for `GET /leads/get-all`, `/kanban`, and `/export`.
#[derive(Debug, Default, Deserialize)]
pub struct LeadListParams {
    pub status: Option<String>,
    pub source: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl LeadListParams {
    fn page(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }

    fn filter(&self) -> AppResult<LeadFilter> {
        if let Some(status) = &self.status {
            LeadStatus::from_str_db(status)?;
        }
        if let Some(source) = &self.source {
            LeadSource::from_str_db(source)?;
        }
        Ok(LeadFilter {
            status: self.status.clone(),
            source: self.source.clone(),
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// Request body for `PATCH /leads/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request body for `PATCH /leads/bulk-status`.
#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<DbId>,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct BulkStatusResponse {
    pub updated: u64,
}

/// One kanban column.
#[derive(Debug, Serialize)]
pub struct KanbanColumn {
    pub status: LeadStatus,
    pub label: &'static str,
    pub leads: Vec<Lead>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_create(input: &CreateLead) -> AppResult<()> {
    use validator::Validate;
    input.validate()?;
    if let Some(source) = &input.source {
        LeadSource::from_str_db(source)?;
    }
    validate_preferred_locations(&input.preferred_locations)?;
    validate_budget_range(input.budget_min, input.budget_max)?;
    Ok(())
}

fn validate_update(input: &UpdateLead) -> AppResult<()> {
    use validator::Validate;
    input.validate()?;
    if let Some(source) = &input.source {
        LeadSource::from_str_db(source)?;
    }
    if let Some(locations) = &input.preferred_locations {
        validate_preferred_locations(locations)?;
    }
    validate_budget_range(input.budget_min, input.budget_max)?;
    Ok(())
}

fn lead_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Lead", id })
}

fn publish_created(state: &AppState, lead: &Lead, actor: Option<DbId>) {
    let name = match &lead.partner_two_name {
        Some(partner) => format!("{} & {partner}", lead.partner_one_name),
        None => lead.partner_one_name.clone(),
    };
    state.event_bus.publish(
        PlatformEvent::new(EventKind::LeadCreated)
            .about("lead", lead.id)
            .with_actor(actor)
            .with_payload(json!({ "name": name, "source": lead.source })),
    );
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/leads/create
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(mut input): Json<CreateLead>,
) -> AppResult<ApiResponse<Lead>> {
    validate_create(&input)?;
    if input.owner_id.is_none() {
        input.owner_id = Some(user.user_id);
    }

    let lead = LeadRepo::create(&state.pool, &input).await?;
    tracing::info!(lead_id = lead.id, user_id = user.user_id, "Lead created");
    publish_created(&state, &lead, Some(user.user_id));

    Ok(ApiResponse::created(lead).with_message("Lead created"))
}

/// POST /api/v1/leads/inquiry
///
/// Public website inquiry. The lead is unowned and sourced from the website
/// unless the form says otherwise.
pub async fn inquiry(
    State(state): State<AppState>,
    Json(mut input): Json<CreateLead>,
) -> AppResult<ApiResponse<Lead>> {
    input.owner_id = None;
    if input.source.is_none() {
        input.source = Some(LeadSource::Website.as_str().to_string());
    }
    validate_create(&input)?;

    let lead = LeadRepo::create(&state.pool, &input).await?;
    tracing::info!(lead_id = lead.id, "Website inquiry received");
    publish_created(&state, &lead, None);

    Ok(ApiResponse::created(lead).with_message("Thank you! We will be in touch soon."))
}

/// GET /api/v1/leads/get-all
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<LeadListParams>,
) -> AppResult<ApiResponse<Page<Lead>>> {
    let filter = params.filter()?;
    let page = params.page();
    let limit = page.limit();
    let offset = page.offset();

    let items = LeadRepo::list(&state.pool, &filter, Some(limit), offset).await?;
    let total = LeadRepo::count(&state.pool, &filter).await?;

    Ok(ApiResponse::ok(Page {
        items,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/leads/kanban
///
/// Every matching lead grouped into the board's columns, in column order.
/// The `status` filter is ignored since the board shows all columns.
pub async fn kanban(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<LeadListParams>,
) -> AppResult<ApiResponse<Vec<KanbanColumn>>> {
    let filter = LeadFilter {
        status: None,
        ..params.filter()?
    };
    let leads = LeadRepo::list(&state.pool, &filter, None, 0).await?;
    Ok(ApiResponse::ok(group_by_column(leads)))
}

/// GET /api/v1/leads/export
///
/// CSV download of every lead matching the filters.
pub async fn export(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<LeadListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.filter()?;
    let leads = LeadRepo::list(&state.pool, &filter, None, 0).await?;
    tracing::info!(user_id = user.user_id, rows = leads.len(), "Leads exported");

    let filename = format!("leads-{}.csv", chrono::Utc::now().format("%Y%m%d"));
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        leads_csv(&leads),
    ))
}

/// GET /api/v1/leads/{id}
pub async fn get_by_id(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<Lead>> {
    let lead = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| lead_not_found(id))?;
    Ok(ApiResponse::ok(lead))
}

/// PUT /api/v1/leads/{id}
pub async fn update(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLead>,
) -> AppResult<ApiResponse<Lead>> {
    validate_update(&input)?;
    let lead = LeadRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| lead_not_found(id))?;
    Ok(ApiResponse::ok(lead).with_message("Lead updated"))
}

/// DELETE /api/v1/leads/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<()>> {
    if !LeadRepo::delete(&state.pool, id).await? {
        return Err(lead_not_found(id));
    }
    tracing::info!(lead_id = id, user_id = user.user_id, "Lead deleted");
    Ok(ApiResponse::message("Lead deleted"))
}

/// PATCH /api/v1/leads/{id}/status
pub async fn update_status(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<Lead>> {
    let status = LeadStatus::from_str_db(&input.status)?;
    let previous = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| lead_not_found(id))?;

    let lead = LeadRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| lead_not_found(id))?;

    if previous.status != lead.status {
        state.event_bus.publish(
            PlatformEvent::new(EventKind::LeadStatusChanged)
                .about("lead", id)
                .with_actor(Some(user.user_id))
                .with_payload(json!({ "from": previous.status, "to": lead.status })),
        );
    }

    Ok(ApiResponse::ok(lead).with_message("Lead status updated"))
}

/// PATCH /api/v1/leads/bulk-status
pub async fn bulk_update_status(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<BulkStatusRequest>,
) -> AppResult<ApiResponse<BulkStatusResponse>> {
    validate_bulk_ids(&input.ids)?;
    let status = LeadStatus::from_str_db(&input.status)?;

    let updated = LeadRepo::bulk_update_status(&state.pool, &input.ids, status).await?;
    tracing::info!(
        user_id = user.user_id,
        requested = input.ids.len(),
        updated,
        status = status.as_str(),
        "Bulk lead status update"
    );

    Ok(ApiResponse::ok(BulkStatusResponse { updated })
        .with_message(format!("{updated} leads updated")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Group leads into kanban columns, preserving column order and the input
/// order within each column. Leads with an unknown status are dropped.
pub fn group_by_column(leads: Vec<Lead>) -> Vec<KanbanColumn> {
    let mut columns: Vec<KanbanColumn> = KANBAN_COLUMNS
        .iter()
        .map(|status| KanbanColumn {
            status: *status,
            label: status.label(),
            leads: Vec::new(),
        })
        .collect();

    for lead in leads {
        match LeadStatus::from_str_db(&lead.status) {
            Ok(status) => {
                if let Some(column) = columns.iter_mut().find(|c| c.status == status) {
                    column.leads.push(lead);
                }
            }
            Err(_) => tracing::warn!(lead_id = lead.id, status = %lead.status, "Unknown lead status"),
        }
    }
    columns
}

const CSV_HEADER: &str = "id,partner_one_name,partner_two_name,email,phone,wedding_date,\
guest_count,budget_min,budget_max,preferred_locations,source,status,created_at";

/// Render leads as CSV with a header row.
pub fn leads_csv(leads: &[Lead]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push_str("\r\n");
    for lead in leads {
        let cells = [
            lead.id.to_string(),
            lead.partner_one_name.clone(),
            lead.partner_two_name.clone().unwrap_or_default(),
            lead.email.clone(),
            lead.phone.clone().unwrap_or_default(),
            lead.wedding_date.map(|d| d.to_string()).unwrap_or_default(),
            lead.guest_count.map(|g| g.to_string()).unwrap_or_default(),
            lead.budget_min.map(|b| b.to_string()).unwrap_or_default(),
            lead.budget_max.map(|b| b.to_string()).unwrap_or_default(),
            lead.preferred_locations.join("; "),
            lead.source.clone(),
            lead.status.clone(),
            lead.created_at.to_rfc3339(),
        ];
        let row: Vec<String> = cells.iter().map(|c| csv_escape(c)).collect();
        out.push_str(&row.join(","));
        out.push_str("\r\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn lead(id: DbId, status: &str) -> Lead {
        Lead {
            id,
            partner_one_name: "Asha".into(),
            partner_two_name: Some("Ravi, Jr.".into()),
            email: "asha@example.com".into(),
            phone: None,
            wedding_date: None,
            guest_count: Some(180),
            budget_min: None,
            budget_max: None,
            preferred_locations: vec!["Goa".into(), "Udaipur".into()],
            source: "website".into(),
            status: status.into(),
            notes: None,
            owner_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn kanban_keeps_column_order() {
        let columns = group_by_column(vec![
            lead(1, "booked"),
            lead(2, "new"),
            lead(3, "new"),
            lead(4, "archived"),
        ]);
        assert_eq!(columns.len(), KANBAN_COLUMNS.len());
        assert_eq!(columns[0].status, LeadStatus::New);
        assert_eq!(
            columns[0].leads.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
        let booked = columns.iter().find(|c| c.status == LeadStatus::Booked).unwrap();
        assert_eq!(booked.leads.len(), 1);
        let total: usize = columns.iter().map(|c| c.leads.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn csv_quotes_cells_with_commas() {
        let csv = leads_csv(&[lead(7, "new")]);
        let mut lines = csv.split("\r\n");
        assert!(lines.next().unwrap().starts_with("id,partner_one_name"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("7,Asha,\"Ravi, Jr.\",asha@example.com,,"));
        assert!(row.contains(",Goa; Udaipur,website,new,"));
    }

    #[test]
    fn list_params_reject_unknown_status() {
        let params = LeadListParams {
            status: Some("archived".into()),
            ..Default::default()
        };
        assert!(params.filter().is_err());

        let params = LeadListParams {
            search: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(params.filter().unwrap().search, None);
    }
}
