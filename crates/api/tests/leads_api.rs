//! HTTP-level integration tests for the `/leads` pipeline.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use common::{
    body_json, body_text, create_user, delete_auth, get_auth, patch_json_auth, post_json,
    post_json_auth, put_json_auth, RecordingMailer, StubRenderer, ROLE_ID_ADMIN,
    ROLE_ID_TEAM_MEMBER,
};
use serde_json::json;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use wedplan_api::notifications::NotificationRouter;
use wedplan_db::repositories::NotificationRepo;

fn lead_body(name: &str) -> serde_json::Value {
    json!({
        "partner_one_name": name,
        "partner_two_name": "Ravi",
        "email": format!("{}@example.com", name.to_lowercase()),
        "guest_count": 180,
        "budget_min": 1500000,
        "budget_max": 2500000,
        "preferred_locations": ["Goa", "Udaipur"],
        "source": "referral"
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_create_defaults_owner(pool: PgPool) {
    let planner = create_user(&pool, "planner@wedplan.test", ROLE_ID_TEAM_MEMBER).await;
    let token = common::token_for(&planner);
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/leads/create", &token, lead_body("Asha")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 201);
    assert_eq!(json["data"]["owner_id"], planner.id);
    assert_eq!(json["data"]["status"], "new");
    assert_eq!(json["data"]["source"], "referral");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inverted_budget_is_rejected(pool: PgPool) {
    let planner = create_user(&pool, "planner@wedplan.test", ROLE_ID_TEAM_MEMBER).await;
    let token = common::token_for(&planner);
    let app = common::build_test_app(pool);

    let mut body = lead_body("Asha");
    body["budget_min"] = json!(9000000);
    let response = post_json_auth(app, "/api/v1/leads/create", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["data"]["errors"]["budget_max"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inquiry_notifies_admins(pool: PgPool) {
    let admin = create_user(&pool, "admin@wedplan.test", ROLE_ID_ADMIN).await;
    let test_app = common::build_test_app_with(
        pool.clone(),
        RecordingMailer::default(),
        StubRenderer::default(),
    );

    let cancel = CancellationToken::new();
    let router = NotificationRouter::new(pool.clone(), Arc::clone(&test_app.ws_manager));
    let handle = tokio::spawn(router.run(test_app.event_bus.subscribe(), cancel.clone()));

    let response = post_json(
        test_app.router.clone(),
        "/api/v1/leads/inquiry",
        json!({ "partner_one_name": "Meera", "email": "meera@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let lead = body_json(response).await;
    assert_eq!(lead["data"]["source"], "website");
    assert!(lead["data"]["owner_id"].is_null());

    let mut found = Vec::new();
    for _ in 0..50 {
        found = NotificationRepo::list_visible(&pool, admin.id, "admin", true, 10, 0)
            .await
            .unwrap();
        if !found.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].recipient_role.as_deref(), Some("admin"));
    assert!(found[0].message.contains("Meera"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_and_paginates(pool: PgPool) {
    let planner = create_user(&pool, "planner@wedplan.test", ROLE_ID_TEAM_MEMBER).await;
    let token = common::token_for(&planner);
    let app = common::build_test_app(pool);

    for name in ["Asha", "Meera", "Kavya"] {
        let response =
            post_json_auth(app.clone(), "/api/v1/leads/create", &token, lead_body(name)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get_auth(app.clone(), "/api/v1/leads/get-all?limit=2", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["limit"], 2);

    let response = get_auth(app.clone(), "/api/v1/leads/get-all?search=meera", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["partner_one_name"], "Meera");

    let response = get_auth(app, "/api/v1/leads/get-all?status=dreaming", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_changes_show_on_kanban(pool: PgPool) {
    let planner = create_user(&pool, "planner@wedplan.test", ROLE_ID_TEAM_MEMBER).await;
    let token = common::token_for(&planner);
    let app = common::build_test_app(pool);

    let mut ids = Vec::new();
    for name in ["Asha", "Meera", "Kavya"] {
        let response =
            post_json_auth(app.clone(), "/api/v1/leads/create", &token, lead_body(name)).await;
        ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{}/status", ids[0]),
        &token,
        json!({ "status": "booked" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = patch_json_auth(
        app.clone(),
        "/api/v1/leads/bulk-status",
        &token,
        json!({ "ids": [ids[1], ids[2], 99999], "status": "contacted" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["updated"], 2);

    let response = get_auth(app, "/api/v1/leads/kanban", &token).await;
    let columns = body_json(response).await["data"].clone();
    let columns = columns.as_array().unwrap();
    assert_eq!(columns.len(), 7);
    assert_eq!(columns[0]["status"], "new");

    let count = |status: &str| {
        columns
            .iter()
            .find(|c| c["status"] == status)
            .map(|c| c["leads"].as_array().unwrap().len())
            .unwrap()
    };
    assert_eq!(count("new"), 0);
    assert_eq!(count("contacted"), 2);
    assert_eq!(count("booked"), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_is_csv(pool: PgPool) {
    let planner = create_user(&pool, "planner@wedplan.test", ROLE_ID_TEAM_MEMBER).await;
    let token = common::token_for(&planner);
    let app = common::build_test_app(pool);

    post_json_auth(app.clone(), "/api/v1/leads/create", &token, lead_body("Asha")).await;

    let response = get_auth(app, "/api/v1/leads/export", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("id,partner_one_name"));
    assert!(lines[1].contains("asha@example.com"));
    assert!(lines[1].contains("Goa; Udaipur"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_delete(pool: PgPool) {
    let planner = create_user(&pool, "planner@wedplan.test", ROLE_ID_TEAM_MEMBER).await;
    let token = common::token_for(&planner);
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app.clone(), "/api/v1/leads/create", &token, lead_body("Asha")).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/leads/{id}");

    let response = put_json_auth(app.clone(), &uri, &token, json!({ "guest_count": 220 })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["guest_count"], 220);
    assert_eq!(json["data"]["partner_one_name"], "Asha");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
