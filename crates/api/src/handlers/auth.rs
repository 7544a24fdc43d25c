//! Handlers for the `/auth` resource (login, refresh, logout, password reset).

use axum::extract::State;
use axum::http::header::{SET_COOKIE, USER_AGENT};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;
use wedplan_core::error::CoreError;
use wedplan_core::otp::{self, MAX_OTP_ATTEMPTS};
use wedplan_core::validation::validate_password;
use wedplan_db::models::session::CreateSession;
use wedplan_db::models::user::{User, UserResponse};
use wedplan_db::repositories::{PasswordResetRepo, SessionRepo, UserRepo};
use wedplan_events::templates::otp_email;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, ACCESS_TOKEN_COOKIE};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

const MSG_BAD_CREDENTIALS: &str = "Invalid email or password";
const MSG_BAD_RESET_CODE: &str = "Invalid or expired reset code";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(equal = 6, message = "Reset code must be 6 digits"))]
    pub otp: String,
    #[validate(custom(function = "validate_password"))]
    pub new_password: String,
}

/// Successful authentication payload returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens and
/// sets the access token cookie.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(MSG_BAD_CREDENTIALS.into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failures = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
        }
        return Err(AppError::Core(CoreError::Unauthorized(
            MSG_BAD_CREDENTIALS.into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let issued = issue_tokens(&state, &user, user_agent)?;
    SessionRepo::create(&state.pool, &issued.session).await?;
    let response = issued.response;
    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    let cookie = access_cookie(&response.access_token, response.expires_in);
    Ok((
        [(SET_COOKIE, cookie)],
        ApiResponse::ok(response).with_message("Login successful"),
    ))
}

/// POST /api/v1/auth/refresh
///
/// Trade a live refresh token for a new token pair. The presented session is
/// revoked in the same transaction that stores its replacement, so a token
/// can be redeemed once.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let issued = issue_tokens(&state, &user, session.user_agent.clone())?;
    SessionRepo::rotate(&state.pool, session.id, &issued.session)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;
    let response = issued.response;
    let cookie = access_cookie(&response.access_token, response.expires_in);
    Ok(([(SET_COOKIE, cookie)], ApiResponse::ok(response)))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok((
        [(SET_COOKIE, access_cookie("", 0))],
        ApiResponse::message("Logged out"),
    ))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;
    Ok(ApiResponse::ok(UserResponse::from(&user)))
}

/// POST /api/v1/auth/forgot-password
///
/// Queue a one-time reset code for the account. Always answers 200 so the
/// endpoint cannot be used to discover which emails are registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    input.validate()?;

    match UserRepo::find_by_email(&state.pool, &input.email).await? {
        Some(user) if user.is_active => {
            let code = otp::generate_otp();
            let expires_at = Utc::now() + chrono::Duration::minutes(state.config.otp_expiry_mins);
            PasswordResetRepo::create(&state.pool, user.id, &otp::hash_otp(&code), expires_at)
                .await?;

            let email = otp_email(
                &user.email,
                &user.full_name,
                &code,
                state.config.otp_expiry_mins,
            );
            match state.email_queue.enqueue(&email).await {
                Ok(job_id) => tracing::info!(user_id = user.id, job_id, "Password reset code queued"),
                Err(e) => tracing::error!(user_id = user.id, error = %e, "Failed to queue reset email"),
            }
        }
        _ => tracing::debug!("Password reset requested for unknown or inactive account"),
    }

    Ok(ApiResponse::message(
        "If the account exists, a reset code has been sent",
    ))
}

/// POST /api/v1/auth/reset-password
///
/// Consume a reset code and set a new password. Every wrong guess counts
/// against the code; after [`MAX_OTP_ATTEMPTS`] it is burned. All sessions
/// are revoked on success.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    input.validate()?;
    if !otp::is_well_formed(&input.otp) {
        return Err(CoreError::invalid_field("otp", "Reset code must be 6 digits").into());
    }

    let bad_code = || AppError::BadRequest(MSG_BAD_RESET_CODE.into());

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(bad_code)?;
    let reset = PasswordResetRepo::find_active(&state.pool, user.id)
        .await?
        .ok_or_else(bad_code)?;

    if reset.attempts >= MAX_OTP_ATTEMPTS {
        return Err(AppError::BadRequest(
            "Too many attempts. Request a new reset code.".into(),
        ));
    }
    if !otp::is_unexpired(reset.expires_at, Utc::now()) {
        return Err(bad_code());
    }
    if otp::hash_otp(&input.otp) != reset.otp_hash {
        PasswordResetRepo::increment_attempts(&state.pool, reset.id).await?;
        return Err(bad_code());
    }

    if !PasswordResetRepo::mark_used(&state.pool, reset.id).await? {
        return Err(bad_code());
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;
    SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "Password reset");
    Ok(ApiResponse::message("Password has been reset"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A fresh token pair and the session row that backs the refresh token.
struct IssuedTokens {
    response: AuthResponse,
    session: CreateSession,
}

fn issue_tokens(
    state: &AppState,
    user: &User,
    user_agent: Option<String>,
) -> AppResult<IssuedTokens> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let (refresh_token, refresh_token_hash) = generate_refresh_token();

    Ok(IssuedTokens {
        response: AuthResponse {
            access_token,
            refresh_token,
            expires_in: state.config.jwt.access_ttl().num_seconds(),
            user: UserResponse::from(user),
        },
        session: CreateSession {
            user_id: user.id,
            refresh_token_hash,
            expires_at: Utc::now() + state.config.jwt.refresh_ttl(),
            user_agent,
            ip_address: None,
        },
    })
}

/// `Set-Cookie` value carrying the access token. `max_age` 0 clears it.
fn access_cookie(token: &str, max_age: i64) -> String {
    format!("{ACCESS_TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}")
}
