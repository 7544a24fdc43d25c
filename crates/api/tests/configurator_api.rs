//! HTTP-level integration tests for the public `/configurator` wizard.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

async fn start_plan(app: axum::Router) -> String {
    let response = post_json(
        app,
        "/api/v1/configurator/plans",
        json!({ "contact_email": "asha@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_step"], 1);
    assert_eq!(json["data"]["is_completed"], false);
    assert!(json["data"].get("id").is_none());
    json["data"]["public_id"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn steps_accumulate_answers(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = start_plan(app.clone()).await;
    let uri = format!("/api/v1/configurator/plans/{id}/step");

    let response = put_json(
        app.clone(),
        &uri,
        json!({ "step": 1, "data": { "guest_count": 250, "wedding_date": "2027-02-14" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        app.clone(),
        &uri,
        json!({ "step": 2, "data": { "budget_max": 3000000 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Revisiting a step merges into its earlier answers.
    let response = put_json(
        app.clone(),
        &uri,
        json!({ "step": 1, "data": { "guest_count": 300 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, &format!("/api/v1/configurator/plans/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_step"], 1);
    assert_eq!(json["data"]["step_data"]["basics"]["guest_count"], 300);
    assert_eq!(json["data"]["step_data"]["basics"]["wedding_date"], "2027-02-14");
    assert_eq!(json["data"]["step_data"]["budget"]["budget_max"], 3000000);
    assert!(json["data"].get("content_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn skipping_ahead_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = start_plan(app.clone()).await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/configurator/plans/{id}/step"),
        json!({ "step": 3, "data": {} }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["data"]["errors"]["step"].is_array());

    let response = put_json(
        app,
        &format!("/api/v1/configurator/plans/{id}/step"),
        json!({ "step": 1, "data": { "guest_count": 0 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_step_completes_the_plan(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = start_plan(app.clone()).await;
    let uri = format!("/api/v1/configurator/plans/{id}/step");

    let mut last = serde_json::Value::Null;
    for step in 1..=6 {
        let response = put_json(app.clone(), &uri, json!({ "step": step })).await;
        assert_eq!(response.status(), StatusCode::OK);
        last = body_json(response).await;
    }
    assert_eq!(last["data"]["current_step"], 6);
    assert_eq!(last["data"]["is_completed"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn autosave_skips_unchanged_content(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = start_plan(app.clone()).await;
    let uri = format!("/api/v1/configurator/plans/{id}/autosave");
    let content = json!({ "step": 2, "form": { "budget_max": 2500000 } });

    let response = put_json(app.clone(), &uri, json!({ "content": content })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["data"]["saved"], true);

    let response = put_json(app.clone(), &uri, json!({ "content": content })).await;
    let second = body_json(response).await;
    assert_eq!(second["data"]["saved"], false);
    assert_eq!(second["data"]["content_hash"], first["data"]["content_hash"]);

    let response = put_json(
        app.clone(),
        &uri,
        json!({ "content": { "step": 2, "form": { "budget_max": 2600000 } } }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["saved"], true);

    let response = get(app, &format!("/api/v1/configurator/plans/{id}")).await;
    assert_eq!(
        body_json(response).await["data"]["draft"]["form"]["budget_max"],
        2600000
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_plan_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/configurator/plans/{}", Uuid::new_v4());
    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plans_are_not_reachable_by_row_id(pool: PgPool) {
    let app = common::build_test_app(pool);
    let public_id = start_plan(app.clone()).await;
    assert!(Uuid::parse_str(&public_id).is_ok());
    let other = start_plan(app.clone()).await;
    assert_ne!(public_id, other);

    let response = get(app.clone(), "/api/v1/configurator/plans/1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        app,
        "/api/v1/configurator/plans/1/autosave",
        json!({ "content": { "step": 1 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
