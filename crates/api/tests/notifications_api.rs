//! HTTP-level integration tests for `/notifications`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, get_auth, post_auth, post_json_auth, ROLE_ID_ADMIN,
    ROLE_ID_TEAM_MEMBER,
};
use serde_json::json;
use sqlx::PgPool;

struct Users {
    admin: String,
    planner: String,
    planner_id: i64,
    other_planner: String,
}

async fn users(pool: &PgPool) -> Users {
    let admin = create_user(pool, "admin@wedplan.test", ROLE_ID_ADMIN).await;
    let planner = create_user(pool, "planner@wedplan.test", ROLE_ID_TEAM_MEMBER).await;
    let other = create_user(pool, "other@wedplan.test", ROLE_ID_TEAM_MEMBER).await;
    Users {
        admin: common::token_for(&admin),
        planner: common::token_for(&planner),
        planner_id: planner.id,
        other_planner: common::token_for(&other),
    }
}

async fn create(app: axum::Router, admin: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app, "/api/v1/notifications/create", admin, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_notifications_reach_every_member(pool: PgPool) {
    let u = users(&pool).await;
    let app = common::build_test_app(pool);

    let created = create(
        app.clone(),
        &u.admin,
        json!({ "type": "system", "message": "Team meeting at 10", "recipient_role": "team_member" }),
    )
    .await;
    assert_eq!(created["type"], "system");
    assert_eq!(created["is_read"], false);

    for token in [&u.planner, &u.other_planner] {
        let response = get_auth(app.clone(), "/api/v1/notifications", token).await;
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["message"], "Team meeting at 10");
    }

    // Not addressed to admins.
    let response = get_auth(app, "/api/v1/notifications", &u.admin).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn personal_notifications_are_private(pool: PgPool) {
    let u = users(&pool).await;
    let app = common::build_test_app(pool);

    let created = create(
        app.clone(),
        &u.admin,
        json!({ "type": "lead", "message": "Lead assigned to you", "recipient_id": u.planner_id }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = get_auth(app.clone(), "/api/v1/notifications/unread-count", &u.other_planner).await;
    assert_eq!(body_json(response).await["data"]["count"], 0);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/notifications/{id}/read"),
        &u.other_planner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["message"],
        "You cannot modify this notification"
    );

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/notifications/{id}/read"),
        &u.planner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_read"], true);
    assert!(json["data"]["read_at"].is_string());

    let response = post_auth(app, "/api/v1/notifications/999999/read", &u.planner).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn read_all_clears_the_unread_list(pool: PgPool) {
    let u = users(&pool).await;
    let app = common::build_test_app(pool);

    create(
        app.clone(),
        &u.admin,
        json!({ "type": "lead", "message": "First", "recipient_id": u.planner_id }),
    )
    .await;
    create(
        app.clone(),
        &u.admin,
        json!({ "type": "system", "message": "Second", "recipient_role": "team_member" }),
    )
    .await;

    let response = get_auth(app.clone(), "/api/v1/notifications/unread-count", &u.planner).await;
    assert_eq!(body_json(response).await["data"]["count"], 2);

    let response = post_auth(app.clone(), "/api/v1/notifications/read-all", &u.planner).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["updated"], 2);

    let response = get_auth(app.clone(), "/api/v1/notifications", &u.planner).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());

    // Read ones are still there when asked for.
    let response = get_auth(
        app,
        "/api/v1/notifications?unread_only=false",
        &u.planner,
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_needs_exactly_one_recipient(pool: PgPool) {
    let u = users(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/notifications/create",
        &u.admin,
        json!({ "type": "system", "message": "Nobody" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/notifications/create",
        &u.admin,
        json!({ "type": "system", "message": "Both", "recipient_id": u.planner_id, "recipient_role": "admin" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/notifications/create",
        &u.planner,
        json!({ "type": "system", "message": "Not allowed", "recipient_role": "admin" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
