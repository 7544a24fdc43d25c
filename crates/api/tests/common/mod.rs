#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use wedplan_api::auth::jwt::{generate_access_token, JwtConfig};
use wedplan_api::auth::password::hash_password;
use wedplan_api::config::ServerConfig;
use wedplan_api::pdf::{PdfError, PdfRenderer};
use wedplan_api::router::build_app_router;
use wedplan_api::state::AppState;
use wedplan_api::ws::WsManager;
use wedplan_db::models::user::{CreateUser, User};
use wedplan_db::repositories::UserRepo;
use wedplan_events::{EmailError, EmailQueue, EventBus, Mailer, OutgoingEmail};

pub const ROLE_ID_ADMIN: i64 = 1;
pub const ROLE_ID_TEAM_MEMBER: i64 = 2;
pub const ROLE_ID_VENDOR: i64 = 3;

pub const TEST_PASSWORD: &str = "Blossom#2026";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Mailer that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    pub fail: bool,
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::NotConfigured);
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Renderer returning a fixed document, or failing.
#[derive(Default)]
pub struct StubRenderer {
    pub fail: bool,
    pub urls: Mutex<Vec<String>>,
}

#[async_trait]
impl PdfRenderer for StubRenderer {
    async fn render_url(&self, url: &str) -> Result<Vec<u8>, PdfError> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.fail {
            return Err(PdfError::EmptyOutput);
        }
        Ok(b"%PDF-1.7\n%stub".to_vec())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-for-integration-tests".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        uploads_dir: std::env::temp_dir().join(format!("wedplan-test-{}", uuid::Uuid::new_v4())),
        public_app_url: "http://localhost:3001".to_string(),
        pdf_settle_ms: 0,
        chromium_bin: "chromium".to_string(),
        otp_expiry_mins: 10,
        email_worker_enabled: false,
        jwt: test_jwt_config(),
    }
}

/// Handles to the fakes wired into a test app.
pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
    pub renderer: Arc<StubRenderer>,
    pub event_bus: Arc<EventBus>,
    pub ws_manager: Arc<WsManager>,
    pub uploads_dir: PathBuf,
}

/// Build the production router around `pool` with recording fakes.
pub fn build_test_app_with(
    pool: PgPool,
    mailer: RecordingMailer,
    renderer: StubRenderer,
) -> TestApp {
    let renderer = Arc::new(renderer);
    let mut app = build_test_app_with_renderer(pool, mailer, renderer.clone());
    app.renderer = renderer;
    app
}

/// Like [`build_test_app_with`] but with any renderer. `TestApp::renderer`
/// is then an unused default stub.
pub fn build_test_app_with_renderer(
    pool: PgPool,
    mailer: RecordingMailer,
    pdf_renderer: Arc<dyn PdfRenderer>,
) -> TestApp {
    let config = test_config();
    let mailer = Arc::new(mailer);
    let event_bus = Arc::new(EventBus::default());
    let ws_manager = Arc::new(WsManager::new());
    let uploads_dir = config.uploads_dir.clone();

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
        mailer: mailer.clone(),
        pdf_renderer,
        email_queue: EmailQueue::new(pool),
    };

    TestApp {
        router: build_app_router(state, &config),
        mailer,
        renderer: Arc::new(StubRenderer::default()),
        event_bus,
        ws_manager,
        uploads_dir,
    }
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, RecordingMailer::default(), StubRenderer::default()).router
}

/// A pool that never connects. For tests rejected before any query runs.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/wedplan_test")
        .expect("lazy pool")
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, role_id: i64) -> User {
    let input = CreateUser {
        full_name: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role_id,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_jwt_config()).expect("token")
}

pub fn token_for_role(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_jwt_config()).expect("token")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, None, Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "wedplan-test-boundary";

/// One part of a hand-built multipart body. Parts with a file name are files.
pub struct FormPart<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub data: &'a [u8],
}

pub fn text_part<'a>(name: &'a str, value: &'a str) -> FormPart<'a> {
    FormPart {
        name,
        file_name: None,
        data: value.as_bytes(),
    }
}

pub fn file_part<'a>(name: &'a str, file_name: &'a str, data: &'a [u8]) -> FormPart<'a> {
    FormPart {
        name,
        file_name: Some(file_name),
        data,
    }
}

fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                part.name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn multipart_auth(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    parts: &[FormPart<'_>],
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// File names stored under `<uploads_dir>/<folder>`, empty when the folder
/// was never created.
pub fn stored_files(uploads_dir: &std::path::Path, folder: &str) -> Vec<String> {
    match std::fs::read_dir(uploads_dir.join(folder)) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}
