//! Shared response envelope for API handlers.
//!
//! Every response, success or failure, uses the
//! `{ statusCode, data, message, success, errorMessage }` envelope. Errors
//! build theirs in [`crate::error`]; handlers return [`ApiResponse`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Wire shape of the envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Successful handler response.
///
/// ```ignore
/// Ok(ApiResponse::ok(lead).with_message("Lead updated"))
/// ```
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    data: T,
    message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with the default message.
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
            message: "Success".to_string(),
        }
    }

    /// 201 for newly created resources.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
            message: "Created".to_string(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl ApiResponse<()> {
    /// 200 with no payload, only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok(()).with_message(message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            status_code: self.status.as_u16(),
            data: self.data,
            message: self.message,
            success: true,
            error_message: None,
        };
        (self.status, Json(body)).into_response()
    }
}

/// A page of results with the total row count.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
