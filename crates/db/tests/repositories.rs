//! Repository integration tests against a real database.
//!
//! `DATABASE_URL` must point at a Postgres server the test user may create
//! databases on.

use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::PgPool;
use wedplan_core::lead::LeadStatus;
use wedplan_core::notification::NotificationTarget;
use wedplan_core::proposal::ProposalStatus;
use wedplan_core::roles::{ROLE_ADMIN, ROLE_TEAM_MEMBER};
use wedplan_db::models::email_job::{STATUS_FAILED, STATUS_SENDING};
use wedplan_db::models::lead::{CreateLead, LeadFilter};
use wedplan_db::models::proposal::{CreateProposal, UpdateProposal};
use wedplan_db::models::user::CreateUser;
use wedplan_db::repositories::{
    EmailJobRepo, LandingSectionRepo, LeadRepo, NotificationRepo, ProposalRepo, RoleRepo,
    UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_lead(name: &str, email: &str) -> CreateLead {
    CreateLead {
        partner_one_name: name.to_string(),
        partner_two_name: None,
        email: email.to_string(),
        phone: None,
        wedding_date: None,
        guest_count: Some(120),
        budget_min: None,
        budget_max: None,
        preferred_locations: vec!["Goa".to_string()],
        source: None,
        notes: None,
        owner_id: None,
    }
}

fn draft(lead_id: i64, reference_code: &str) -> CreateProposal {
    CreateProposal {
        lead_id,
        template_id: None,
        reference_code: reference_code.to_string(),
        title: "Beach wedding".to_string(),
        client_name: "Asha".to_string(),
        client_email: "asha@example.com".to_string(),
        services: json!([]),
        total_amount: 0,
        notes: None,
        created_by: None,
    }
}

async fn new_user(pool: &PgPool, email: &str, role: &str) -> i64 {
    let role_id = RoleRepo::id_for_name(pool, role).await.unwrap().unwrap();
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role_id,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bootstrap_seeds_roles(pool: PgPool) {
    wedplan_db::health_check(&pool).await.unwrap();
    let names: Vec<String> = RoleRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["admin", "team_member", "vendor"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_rows_carry_role_name(pool: PgPool) {
    let id = new_user(&pool, "planner@example.com", ROLE_TEAM_MEMBER).await;
    let user = UserRepo::find_by_email(&pool, "PLANNER@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.role, ROLE_TEAM_MEMBER);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn leads_filter_and_bulk_status(pool: PgPool) {
    let a = LeadRepo::create(&pool, &new_lead("Asha", "asha@example.com")).await.unwrap();
    let b = LeadRepo::create(&pool, &new_lead("Rohan", "rohan@example.com")).await.unwrap();
    assert_eq!(a.status, "new");
    assert_eq!(a.source, "website");

    let moved = LeadRepo::bulk_update_status(&pool, &[a.id, b.id], LeadStatus::Contacted)
        .await
        .unwrap();
    assert_eq!(moved, 2);

    let filter = LeadFilter {
        status: Some("contacted".to_string()),
        search: Some("ash".to_string()),
        ..Default::default()
    };
    let found = LeadRepo::list(&pool, &filter, Some(10), 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, a.id);
    assert_eq!(LeadRepo::count(&pool, &filter).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn notifications_visible_by_user_or_role(pool: PgPool) {
    let admin = new_user(&pool, "admin@example.com", ROLE_ADMIN).await;
    let staff = new_user(&pool, "staff@example.com", ROLE_TEAM_MEMBER).await;

    NotificationRepo::create(
        &pool,
        &NotificationTarget::Role(ROLE_ADMIN.to_string()),
        "lead",
        "New inquiry",
        None,
    )
    .await
    .unwrap();
    NotificationRepo::create(&pool, &NotificationTarget::User(staff), "system", "Hi", None)
        .await
        .unwrap();

    let for_admin = NotificationRepo::list_visible(&pool, admin, ROLE_ADMIN, false, 50, 0)
        .await
        .unwrap();
    assert_eq!(for_admin.len(), 1);
    assert_eq!(for_admin[0].message, "New inquiry");

    let for_staff = NotificationRepo::list_visible(&pool, staff, ROLE_TEAM_MEMBER, false, 50, 0)
        .await
        .unwrap();
    assert_eq!(for_staff.len(), 1);
    assert_eq!(for_staff[0].recipient_id, Some(staff));

    assert_eq!(
        NotificationRepo::mark_all_read(&pool, admin, ROLE_ADMIN).await.unwrap(),
        1
    );
    assert_eq!(
        NotificationRepo::unread_count(&pool, admin, ROLE_ADMIN).await.unwrap(),
        0
    );
    assert_eq!(
        NotificationRepo::unread_count(&pool, staff, ROLE_TEAM_MEMBER).await.unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn proposal_edits_only_while_draft(pool: PgPool) {
    let lead = LeadRepo::create(&pool, &new_lead("Asha", "asha@example.com")).await.unwrap();
    let proposal = ProposalRepo::create(&pool, &draft(lead.id, "PRP-20261016-0001"))
        .await
        .unwrap();
    assert_eq!(proposal.status, ProposalStatus::Draft.as_str());

    let edit = UpdateProposal {
        title: Some("Sunset beach wedding".to_string()),
        ..Default::default()
    };
    assert!(ProposalRepo::update_draft(&pool, proposal.id, &edit)
        .await
        .unwrap()
        .is_some());

    let sent = ProposalRepo::mark_sent(&pool, proposal.id).await.unwrap().unwrap();
    assert_eq!(sent.status, "sent");
    assert!(sent.sent_at.is_some());

    assert!(ProposalRepo::update_draft(&pool, proposal.id, &edit)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        ProposalRepo::highest_sequence_for_prefix(&pool, "PRP-20261016-")
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_answer_is_never_overwritten_by_a_send(pool: PgPool) {
    let lead = LeadRepo::create(&pool, &new_lead("Asha", "asha@example.com")).await.unwrap();
    let proposal = ProposalRepo::create(&pool, &draft(lead.id, "PRP-20261016-0001"))
        .await
        .unwrap();

    // No answer before the proposal goes out.
    assert!(ProposalRepo::record_answer(&pool, proposal.id, ProposalStatus::Accepted)
        .await
        .unwrap()
        .is_none());

    ProposalRepo::mark_sent(&pool, proposal.id).await.unwrap().unwrap();
    let accepted = ProposalRepo::record_answer(&pool, proposal.id, ProposalStatus::Accepted)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accepted.status, "accepted");

    // A send that started before the answer finishes late.
    assert!(ProposalRepo::mark_sent(&pool, proposal.id).await.unwrap().is_none());
    assert!(ProposalRepo::record_answer(&pool, proposal.id, ProposalStatus::Rejected)
        .await
        .unwrap()
        .is_none());

    let stored = ProposalRepo::find_by_id(&pool, proposal.id).await.unwrap().unwrap();
    assert_eq!(stored.status, "accepted");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn daily_sequence_survives_deleted_proposals(pool: PgPool) {
    let first = LeadRepo::create(&pool, &new_lead("Asha", "asha@example.com")).await.unwrap();
    let second = LeadRepo::create(&pool, &new_lead("Meera", "meera@example.com")).await.unwrap();
    ProposalRepo::create(&pool, &draft(first.id, "PRP-20261016-0001")).await.unwrap();
    ProposalRepo::create(&pool, &draft(second.id, "PRP-20261016-0002")).await.unwrap();
    ProposalRepo::create(&pool, &draft(second.id, "PRP-20261015-0007")).await.unwrap();

    assert!(LeadRepo::delete(&pool, first.id).await.unwrap());

    assert_eq!(
        ProposalRepo::highest_sequence_for_prefix(&pool, "PRP-20261016-")
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        ProposalRepo::highest_sequence_for_prefix(&pool, "PRP-20261017-")
            .await
            .unwrap(),
        0
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn landing_section_upsert_replaces_content(pool: PgPool) {
    let admin = new_user(&pool, "admin@example.com", ROLE_ADMIN).await;
    LandingSectionRepo::upsert(&pool, 1, &json!({ "title": "One" }), admin)
        .await
        .unwrap();
    let row = LandingSectionRepo::upsert(&pool, 1, &json!({ "title": "Two" }), admin)
        .await
        .unwrap();
    assert_eq!(row.content["title"], "Two");
    assert_eq!(LandingSectionRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn email_jobs_are_claimed_once_and_fail_terminally(pool: PgPool) {
    let id = EmailJobRepo::enqueue(&pool, &json!({ "to": "a@example.com" }))
        .await
        .unwrap();

    let job = EmailJobRepo::claim_next(&pool).await.unwrap().unwrap();
    assert_eq!(job.id, id);
    assert_eq!(job.status, STATUS_SENDING);
    assert_eq!(job.attempts, 1);
    assert!(EmailJobRepo::claim_next(&pool).await.unwrap().is_none());

    EmailJobRepo::mark_failed(&pool, id, "smtp down").await.unwrap();
    let job = EmailJobRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(job.status, STATUS_FAILED);
    assert_eq!(job.last_error.as_deref(), Some("smtp down"));
    assert!(EmailJobRepo::claim_next(&pool).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn abandoned_sending_jobs_are_failed(pool: PgPool) {
    let claimed = EmailJobRepo::enqueue(&pool, &json!({ "to": "a@example.com" }))
        .await
        .unwrap();
    EmailJobRepo::claim_next(&pool).await.unwrap().unwrap();
    let queued = EmailJobRepo::enqueue(&pool, &json!({ "to": "b@example.com" }))
        .await
        .unwrap();

    let an_hour_ago = Utc::now() - Duration::hours(1);
    assert!(EmailJobRepo::fail_abandoned(&pool, an_hour_ago, "interrupted")
        .await
        .unwrap()
        .is_empty());

    let in_a_minute = Utc::now() + Duration::minutes(1);
    let failed = EmailJobRepo::fail_abandoned(&pool, in_a_minute, "interrupted")
        .await
        .unwrap();
    assert_eq!(failed, vec![claimed]);

    let job = EmailJobRepo::find_by_id(&pool, claimed).await.unwrap().unwrap();
    assert_eq!(job.status, STATUS_FAILED);
    assert_eq!(job.last_error.as_deref(), Some("interrupted"));
    let job = EmailJobRepo::find_by_id(&pool, queued).await.unwrap().unwrap();
    assert_eq!(job.status, "queued");
}
