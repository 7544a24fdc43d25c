//! Authentication and role checks at the HTTP boundary.
//!
//! Every request here is rejected before a query runs, so the app is built
//! on a pool that never connects.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, get, get_auth, lazy_pool, post_json, post_json_auth, token_for_role};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tower::ServiceExt;
use wedplan_api::auth::jwt::Claims;

fn app() -> axum::Router {
    common::build_test_app(lazy_pool())
}

fn expired_token() -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: 1,
        role: "admin".into(),
        exp: now - 3600,
        iat: now - 7200,
        jti: "expired".into(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::test_jwt_config().secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn missing_token_is_401() {
    let response = get(app(), "/api/v1/leads/get-all").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["statusCode"], 401);
    assert_eq!(json["message"], "Authentication token missing");
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let response = get_auth(app(), "/api/v1/leads/get-all", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid token");
}

#[tokio::test]
async fn token_signed_with_other_secret_is_invalid() {
    let other = wedplan_api::auth::jwt::JwtConfig {
        secret: "some-other-secret".into(),
        ..common::test_jwt_config()
    };
    let token = wedplan_api::auth::jwt::generate_access_token(1, "admin", &other).unwrap();

    let response = get_auth(app(), "/api/v1/leads/get-all", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid token");
}

#[tokio::test]
async fn expired_token_says_so() {
    let response = get_auth(app(), "/api/v1/leads/get-all", &expired_token()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Token has expired");
}

#[tokio::test]
async fn vendor_cannot_reach_staff_routes() {
    let token = token_for_role(9, "vendor");
    let response = get_auth(app(), "/api/v1/leads/kanban", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["message"],
        "Admin or Team Member role required"
    );
}

#[tokio::test]
async fn team_member_cannot_reach_admin_routes() {
    let token = token_for_role(4, "team_member");
    let response = get_auth(app(), "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "Admin role required");
}

#[tokio::test]
async fn cookie_token_is_accepted() {
    // A vendor token in the cookie gets past authentication and fails the
    // role check, which proves the cookie was read.
    let token = token_for_role(9, "vendor");
    let request = Request::builder()
        .uri("/api/v1/admin/users")
        .header("Cookie", format!("theme=dark; access_token={token}"))
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_inquiry_reports_field_errors() {
    let response = post_json(
        app(),
        "/api/v1/leads/inquiry",
        json!({ "partner_one_name": "Asha", "email": "not-an-email" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(json["data"]["errors"]["email"][0], "Invalid email address");
}

#[tokio::test]
async fn notification_create_checks_content_before_saving() {
    let token = token_for_role(1, "admin");
    let response = post_json_auth(
        app(),
        "/api/v1/notifications/create",
        &token,
        json!({ "type": "gossip", "message": "hello", "recipient_role": "admin" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["data"]["errors"]["type"].is_array());
}

#[tokio::test]
async fn configurator_rejects_bad_contact_email() {
    let response = post_json(
        app(),
        "/api/v1/configurator/plans",
        json!({ "contact_email": "nope" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
