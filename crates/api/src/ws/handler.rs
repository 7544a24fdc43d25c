use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use wedplan_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::middleware::auth::{extract_token, AuthUser, MSG_TOKEN_MISSING};
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query string of the upgrade request. Browsers cannot set headers on a
/// WebSocket handshake, so the token may travel as `?token=`.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// HTTP handler that authenticates and upgrades the connection.
///
/// The token comes from `?token=`, the `Authorization` header, or the
/// `access_token` cookie. Rejected before the upgrade with 401.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    headers: axum::http::HeaderMap,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let token = query
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| extract_token(&headers))
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(MSG_TOKEN_MISSING.into())))?;

    let claims = validate_token(token, &state.config.jwt)
        .map_err(|e| AppError::Core(CoreError::Unauthorized(e.to_string())))?;
    let user = AuthUser {
        user_id: claims.sub,
        role: claims.role,
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager, user)))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Registers the connection in its user and role rooms, forwards queued
/// pushes to the sink from a spawned task, and drains inbound frames until
/// the client disconnects.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user: AuthUser) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = user.user_id, role = %user.role, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone(), user.user_id, &user.role).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Clients only listen; inbound frames other than Close are ignored.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
