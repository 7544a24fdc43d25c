use std::sync::Arc;

use wedplan_events::{EmailQueue, EventBus, Mailer};

use crate::config::ServerConfig;
use crate::pdf::PdfRenderer;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: wedplan_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Realtime connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<EventBus>,
    /// Direct mail delivery, used where the caller must know the outcome.
    pub mailer: Arc<dyn Mailer>,
    /// Renders public pages to PDF.
    pub pdf_renderer: Arc<dyn PdfRenderer>,
    /// Durable queue drained by the email worker.
    pub email_queue: EmailQueue,
}
