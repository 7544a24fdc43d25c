use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use wedplan_core::error::CoreError;

use crate::response::Envelope;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the standard envelope with
/// `success: false`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `wedplan_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request body failed derive-based validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Resolved pieces of an error envelope.
struct ErrorParts {
    status: StatusCode,
    message: String,
    detail: String,
    data: Value,
}

impl ErrorParts {
    fn new(status: StatusCode, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: detail.into(),
            data: Value::Null,
        }
    }

    fn internal(detail: String) -> Self {
        tracing::error!(error = %detail, "Internal error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            detail,
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => ErrorParts::new(
                    StatusCode::NOT_FOUND,
                    "Not found",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    ErrorParts::new(StatusCode::BAD_REQUEST, "Validation failed", msg)
                }
                CoreError::InvalidField { field, message } => ErrorParts {
                    data: json!({ "errors": { field: [message.clone()] } }),
                    ..ErrorParts::new(StatusCode::BAD_REQUEST, "Validation failed", message)
                },
                CoreError::Conflict(msg) => ErrorParts::new(StatusCode::CONFLICT, "Conflict", msg),
                CoreError::Unauthorized(msg) => {
                    ErrorParts::new(StatusCode::UNAUTHORIZED, msg.clone(), msg)
                }
                CoreError::Forbidden(msg) => ErrorParts::new(StatusCode::FORBIDDEN, msg.clone(), msg),
                CoreError::Internal(msg) => ErrorParts::internal(msg),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(&err),

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => {
                let fields = field_errors(&errors);
                let detail = fields
                    .iter()
                    .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
                    .collect::<Vec<_>>()
                    .join("; ");
                ErrorParts {
                    data: json!({ "errors": fields }),
                    ..ErrorParts::new(StatusCode::BAD_REQUEST, "Validation failed", detail)
                }
            }
            AppError::BadRequest(msg) => ErrorParts::new(StatusCode::BAD_REQUEST, "Bad request", msg),
            AppError::InternalError(msg) => ErrorParts::internal(msg),
        };

        let body = Envelope {
            status_code: parts.status.as_u16(),
            data: parts.data,
            message: parts.message,
            success: false,
            error_message: Some(parts.detail),
        };

        (parts.status, axum::Json(body)).into_response()
    }
}

/// Flatten validator errors into `field -> [messages]`.
///
/// Falls back to the validator code when a rule carries no message.
fn field_errors(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Classify a sqlx error into the parts of an error envelope.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations map to 400.
/// - Everything else maps to 500 with the database message exposed.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorParts::new(StatusCode::NOT_FOUND, "Not found", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    if constraint.starts_with("uq_") {
                        return ErrorParts::new(
                            StatusCode::CONFLICT,
                            "Conflict",
                            format!("Duplicate value violates unique constraint: {constraint}"),
                        );
                    }
                }
                // PostgreSQL foreign key violation
                Some("23503") => {
                    return ErrorParts::new(
                        StatusCode::BAD_REQUEST,
                        "Bad request",
                        "Referenced record does not exist",
                    );
                }
                _ => {}
            }
            ErrorParts::internal(db_err.to_string())
        }
        other => ErrorParts::internal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use validator::Validate;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_field_carries_field_detail() {
        let (status, body) =
            body_json(CoreError::invalid_field("guest_count", "Too many guests").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"]["errors"]["guest_count"][0], "Too many guests");
        assert_eq!(body["errorMessage"], "Too many guests");
    }

    #[tokio::test]
    async fn validator_errors_are_grouped_by_field() {
        #[derive(Validate)]
        struct Input {
            #[validate(email(message = "Invalid email"))]
            email: String,
        }
        let errors = Input {
            email: "nope".into(),
        }
        .validate()
        .unwrap_err();

        let (status, body) = body_json(errors.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["errors"]["email"][0], "Invalid email");
    }

    #[tokio::test]
    async fn internal_errors_expose_the_message() {
        let (status, body) = body_json(AppError::InternalError("smtp down".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errorMessage"], "smtp down");
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn row_not_found_is_404() {
        let (status, body) = body_json(sqlx::Error::RowNotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
