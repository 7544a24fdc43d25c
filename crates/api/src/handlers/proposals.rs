//! Handlers for the `/proposals` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
use wedplan_core::error::CoreError;
use wedplan_core::lead::LeadStatus;
use wedplan_core::proposal::{
    generate_reference_code, total, validate_line_items, validate_transition, LineItem,
    ProposalStatus, REFERENCE_PREFIX,
};
use wedplan_core::types::{DbId, Timestamp};
use wedplan_db::models::lead::Lead;
use wedplan_db::models::proposal::{
    CreateProposal, CreateProposalRequest, Proposal, UpdateProposal, UpdateProposalRequest,
};
use wedplan_db::repositories::{LeadRepo, ProposalRepo, ProposalTemplateRepo};
use wedplan_events::bus::EventKind;
use wedplan_events::PlatformEvent;

use crate::dispatch::dispatch_proposal;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Attempts at inserting with a fresh reference code before giving up.
const REFERENCE_CODE_ATTEMPTS: usize = 3;

/// Lead statuses that move to `proposal_sent` when a proposal goes out.
const PRE_PROPOSAL_STATUSES: [LeadStatus; 3] =
    [LeadStatus::New, LeadStatus::Contacted, LeadStatus::Qualified];

#[derive(Debug, Deserialize)]
pub struct ProposalListParams {
    pub lead_id: Option<DbId>,
}

/// Request body for `PATCH /proposals/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ProposalStatusRequest {
    pub status: String,
}

/// What the public proposal page shows. Omits internal fields.
#[derive(Debug, Serialize)]
pub struct PublicProposal {
    pub reference_code: String,
    pub title: String,
    pub client_name: String,
    pub services: Vec<LineItem>,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
}

impl From<Proposal> for PublicProposal {
    fn from(p: Proposal) -> Self {
        Self {
            services: p.line_items(),
            reference_code: p.reference_code,
            title: p.title,
            client_name: p.client_name,
            total_amount: p.total_amount,
            notes: p.notes,
            status: p.status,
            created_at: p.created_at,
        }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Proposal",
        id,
    })
}

fn client_name(lead: &Lead) -> String {
    match &lead.partner_two_name {
        Some(partner) => format!("{} & {partner}", lead.partner_one_name),
        None => lead.partner_one_name.clone(),
    }
}

/// Reference code prefix for proposals created on `date`.
fn reference_prefix(date: NaiveDate) -> String {
    format!("{REFERENCE_PREFIX}-{}-", date.format("%Y%m%d"))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/proposals/create
///
/// Creates a draft for a lead. The client name and email come from the lead;
/// services default to the template's when none are given.
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateProposalRequest>,
) -> AppResult<ApiResponse<Proposal>> {
    input.validate()?;

    let lead = LeadRepo::find_by_id(&state.pool, input.lead_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lead",
            id: input.lead_id,
        }))?;

    let mut services = input.services.clone();
    if let Some(template_id) = input.template_id {
        let template = ProposalTemplateRepo::find_by_id(&state.pool, template_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "ProposalTemplate",
                id: template_id,
            }))?;
        if services.is_empty() {
            services = serde_json::from_value(template.default_services).map_err(|e| {
                AppError::InternalError(format!("Template {template_id} has invalid services: {e}"))
            })?;
        }
    }
    validate_line_items(&services)?;

    let services_json = serde_json::to_value(&services)
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let today = Utc::now().date_naive();

    let mut attempt = 0;
    let proposal = loop {
        attempt += 1;
        let sequence =
            ProposalRepo::highest_sequence_for_prefix(&state.pool, &reference_prefix(today))
                .await?;
        let record = CreateProposal {
            lead_id: lead.id,
            template_id: input.template_id,
            reference_code: generate_reference_code(today, sequence),
            title: input.title.trim().to_string(),
            client_name: client_name(&lead),
            client_email: lead.email.clone(),
            services: services_json.clone(),
            total_amount: total(&services),
            notes: input.notes.clone(),
            created_by: Some(user.user_id),
        };
        match ProposalRepo::create(&state.pool, &record).await {
            Ok(proposal) => break proposal,
            // Another proposal took the code concurrently; look again and retry.
            Err(e) if is_unique_violation(&e) && attempt < REFERENCE_CODE_ATTEMPTS => continue,
            Err(e) => return Err(e.into()),
        }
    };

    tracing::info!(
        proposal_id = proposal.id,
        reference_code = %proposal.reference_code,
        lead_id = lead.id,
        "Proposal created"
    );
    Ok(ApiResponse::created(proposal).with_message("Proposal created"))
}

/// GET /api/v1/proposals/get-all
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<ProposalListParams>,
) -> AppResult<ApiResponse<Vec<Proposal>>> {
    let proposals = ProposalRepo::list(&state.pool, params.lead_id).await?;
    Ok(ApiResponse::ok(proposals))
}

/// GET /api/v1/proposals/{id}
pub async fn get_by_id(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<Proposal>> {
    let proposal = ProposalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::ok(proposal))
}

/// GET /api/v1/proposals/public/{reference}
///
/// Unauthenticated. Backs the page the PDF renderer prints.
pub async fn get_public(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<ApiResponse<PublicProposal>> {
    let proposal = ProposalRepo::find_by_reference(&state.pool, &reference)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(ApiResponse::ok(PublicProposal::from(proposal)))
}

/// PUT /api/v1/proposals/{id}
///
/// Only drafts can be edited; editing a sent proposal is a 409.
pub async fn update(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProposalRequest>,
) -> AppResult<ApiResponse<Proposal>> {
    input.validate()?;

    let existing = ProposalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if !ProposalStatus::from_str_db(&existing.status)?.is_editable() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Proposal {} has already been sent and can no longer be edited",
            existing.reference_code
        ))));
    }

    let mut changes = UpdateProposal {
        title: input.title.as_deref().map(str::trim).map(str::to_string),
        notes: input.notes.clone(),
        ..Default::default()
    };
    if let Some(services) = &input.services {
        validate_line_items(services)?;
        changes.services = Some(
            serde_json::to_value(services).map_err(|e| AppError::InternalError(e.to_string()))?,
        );
        changes.total_amount = Some(total(services));
    }

    // Re-checked in SQL so a concurrent send wins.
    let proposal = ProposalRepo::update_draft(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Proposal is no longer a draft".into(),
            ))
        })?;
    Ok(ApiResponse::ok(proposal).with_message("Proposal updated"))
}

/// POST /api/v1/proposals/{id}/send
///
/// Render the public page to PDF, email it to the client, then mark the
/// proposal sent. Any failure answers 500 with the underlying message and
/// leaves the proposal as it was.
pub async fn send(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<Proposal>> {
    let proposal = ProposalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    validate_transition(
        ProposalStatus::from_str_db(&proposal.status)?,
        ProposalStatus::Sent,
    )?;

    let page_url = state.config.proposal_page_url(&proposal.reference_code);
    let pool = state.pool.clone();
    let sent = dispatch_proposal(
        &proposal,
        &page_url,
        state.pdf_renderer.as_ref(),
        state.mailer.as_ref(),
        || async move { ProposalRepo::mark_sent(&pool, id).await },
    )
    .await
    .map_err(|e| {
        tracing::error!(proposal_id = id, error = %e, "Proposal dispatch failed");
        AppError::InternalError(e.to_string())
    })?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Proposal was answered by the client while it was being sent".into(),
        ))
    })?;

    advance_lead(&state, sent.lead_id).await;
    state.event_bus.publish(
        PlatformEvent::new(EventKind::ProposalSent)
            .about("proposal", sent.id)
            .with_actor(Some(user.user_id))
            .with_payload(json!({
                "reference_code": sent.reference_code,
                "client_email": sent.client_email,
            })),
    );

    Ok(ApiResponse::ok(sent).with_message("Proposal sent"))
}

/// PATCH /api/v1/proposals/{id}/status
///
/// Record the client's answer (`accepted` / `rejected`). `sent` is reserved
/// for the send pipeline.
pub async fn update_status(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ProposalStatusRequest>,
) -> AppResult<ApiResponse<Proposal>> {
    let next = ProposalStatus::from_str_db(&input.status)?;
    if next == ProposalStatus::Sent {
        return Err(AppError::BadRequest(
            "Use the send endpoint to send a proposal".into(),
        ));
    }

    let proposal = ProposalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    validate_transition(ProposalStatus::from_str_db(&proposal.status)?, next)?;

    // Re-checked in SQL so a concurrent answer or send cannot be overwritten.
    let updated = ProposalRepo::record_answer(&state.pool, id, next)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Proposal status changed, reload and try again".into(),
            ))
        })?;
    Ok(ApiResponse::ok(updated).with_message("Proposal status updated"))
}

/// Move the lead to `proposal_sent` if it has not got that far yet.
///
/// Best effort: the proposal is already sent, so a failure here is logged.
async fn advance_lead(state: &AppState, lead_id: DbId) {
    let result = async {
        let Some(lead) = LeadRepo::find_by_id(&state.pool, lead_id).await? else {
            return Ok::<_, sqlx::Error>(());
        };
        let advance = LeadStatus::from_str_db(&lead.status)
            .map(|s| PRE_PROPOSAL_STATUSES.contains(&s))
            .unwrap_or(false);
        if advance {
            LeadRepo::update_status(&state.pool, lead_id, LeadStatus::ProposalSent).await?;
        }
        Ok(())
    }
    .await;

    if let Err(e) = result {
        tracing::warn!(lead_id, error = %e, "Failed to advance lead after proposal send");
    }
}
