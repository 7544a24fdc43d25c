//! Event-to-notification routing.
//!
//! [`NotificationRouter`] subscribes to the platform event bus and creates a
//! notification for each event that has an audience.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use wedplan_core::notification::{NotificationTarget, TYPE_LEAD, TYPE_PROPOSAL, TYPE_VENDOR};
use wedplan_core::roles::ROLE_ADMIN;
use wedplan_db::DbPool;
use wedplan_events::bus::EventKind;
use wedplan_events::PlatformEvent;

use super::service::notify;
use crate::ws::WsManager;

/// A notification derived from an event, not yet stored.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingNotification {
    pub target: NotificationTarget,
    pub notification_type: &'static str,
    pub message: String,
    pub link: Option<String>,
}

/// Decide who hears about `event`, if anyone.
///
/// New leads and vendors go to the admin role; a sent proposal goes to the
/// user who sent it. Lead status changes are not announced.
pub fn notification_for(event: &PlatformEvent) -> Option<PendingNotification> {
    let link = |prefix: &str| event.subject_id().map(|id| format!("{prefix}/{id}"));

    match event.kind {
        EventKind::LeadCreated => Some(PendingNotification {
            target: NotificationTarget::Role(ROLE_ADMIN.to_string()),
            notification_type: TYPE_LEAD,
            message: format!(
                "New lead: {}",
                event.payload_str("name").unwrap_or("unnamed couple")
            ),
            link: link("/leads"),
        }),
        EventKind::ProposalSent => {
            let actor = event.actor_user_id?;
            Some(PendingNotification {
                target: NotificationTarget::User(actor),
                notification_type: TYPE_PROPOSAL,
                message: format!(
                    "Proposal {} was sent to {}",
                    event.payload_str("reference_code").unwrap_or("-"),
                    event.payload_str("client_email").unwrap_or("the client"),
                ),
                link: link("/proposals"),
            })
        }
        EventKind::VendorCreated => Some(PendingNotification {
            target: NotificationTarget::Role(ROLE_ADMIN.to_string()),
            notification_type: TYPE_VENDOR,
            message: format!(
                "New vendor onboarded: {}",
                event.payload_str("business_name").unwrap_or("unknown")
            ),
            link: link("/admin/vendors"),
        }),
        EventKind::LeadStatusChanged => None,
    }
}

/// Routes platform events to notifications.
pub struct NotificationRouter {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
}

impl NotificationRouter {
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>) -> Self {
        Self { pool, ws_manager }
    }

    /// Run the routing loop until the bus closes or `cancel` fires.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<PlatformEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => break,
                received = receiver.recv() => received,
            };
            match received {
                Ok(event) => self.route_event(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    async fn route_event(&self, event: &PlatformEvent) {
        let Some(pending) = notification_for(event) else {
            tracing::trace!(kind = %event.kind, "No audience for event");
            return;
        };
        if let Err(e) = notify(
            &self.pool,
            &self.ws_manager,
            &pending.target,
            pending.notification_type,
            &pending.message,
            pending.link.as_deref(),
        )
        .await
        {
            tracing::error!(
                error = %e,
                kind = %event.kind,
                "Failed to route event"
            );
        }
    }
}
