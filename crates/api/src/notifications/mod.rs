//! Notification creation and event routing.
//!
//! - [`service`]: persist a notification and push it to its realtime room.
//! - [`NotificationRouter`]: turns platform events into notifications.

pub mod router;
pub mod service;

pub use router::NotificationRouter;
pub use service::notify;
