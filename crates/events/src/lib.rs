//! Wedplan event bus and outbound email infrastructure.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the canonical domain event envelope.
//! - [`delivery`]: the [`Mailer`] seam and its SMTP implementation.
//! - [`templates`]: the transactional emails the platform sends.
//! - [`EmailQueue`]: durable queue consumed by the email worker.

pub mod bus;
pub mod delivery;
pub mod queue;
pub mod templates;

pub use bus::{EventBus, EventKind, PlatformEvent};
pub use delivery::email::{
    Attachment, DisabledMailer, EmailConfig, EmailError, Mailer, OutgoingEmail, SmtpMailer,
};
pub use queue::{EmailQueue, QueueError};
