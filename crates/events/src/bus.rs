//! In-process domain events over a `tokio::sync::broadcast` channel.
//!
//! Handlers publish a [`PlatformEvent`] after a write commits; the
//! notification router is the main subscriber. Delivery is best effort: with
//! no subscribers an event is dropped, and a slow subscriber sees
//! `RecvError::Lagged` once the buffer wraps.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use wedplan_core::types::DbId;

/// Buffered events per subscriber before the oldest are overwritten.
const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    /// Staff form or public website inquiry.
    #[serde(rename = "lead.created")]
    LeadCreated,
    /// Payload carries `from` and `to`.
    #[serde(rename = "lead.status_changed")]
    LeadStatusChanged,
    /// Payload carries `reference_code` and `client_email`.
    #[serde(rename = "proposal.sent")]
    ProposalSent,
    /// Payload carries `business_name`.
    #[serde(rename = "vendor.created")]
    VendorCreated,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeadCreated => "lead.created",
            Self::LeadStatusChanged => "lead.status_changed",
            Self::ProposalSent => "proposal.sent",
            Self::VendorCreated => "vendor.created",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub entity: &'static str,
    pub id: DbId,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformEvent {
    pub kind: EventKind,
    pub subject: Option<Subject>,
    /// `None` for anonymous submissions such as website inquiries.
    pub actor_user_id: Option<DbId>,
    pub payload: Value,
    pub occurred_at: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            subject: None,
            actor_user_id: None,
            payload: Value::Object(Default::default()),
            occurred_at: Utc::now(),
        }
    }

    pub fn about(mut self, entity: &'static str, id: DbId) -> Self {
        self.subject = Some(Subject { entity, id });
        self
    }

    pub fn with_actor(mut self, user_id: Option<DbId>) -> Self {
        self.actor_user_id = user_id;
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn subject_id(&self) -> Option<DbId> {
        self.subject.map(|s| s.id)
    }

    /// String field of the payload, if present.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

/// Fan-out hub shared as `Arc<EventBus>`.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: PlatformEvent) {
        let kind = event.kind;
        match self.sender.send(event) {
            Ok(receivers) => tracing::debug!(%kind, receivers, "Event published"),
            Err(_) => tracing::debug!(%kind, "Event dropped, no subscribers"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
