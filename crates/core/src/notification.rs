//! Notification targeting and visibility rules.
//!
//! A notification is addressed either to one user or to every holder of a
//! role. The same rule decides who can list it and who can mark it read.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::is_known_role;
use crate::types::DbId;

/// Realtime event name pushed when a notification is created.
pub const EVENT_NEW_NOTIFICATION: &str = "new_notification";

/// Notification type values.
pub const TYPE_LEAD: &str = "lead";
pub const TYPE_PROPOSAL: &str = "proposal";
pub const TYPE_VENDOR: &str = "vendor";
pub const TYPE_SYSTEM: &str = "system";

const VALID_TYPES: &[&str] = &[TYPE_LEAD, TYPE_PROPOSAL, TYPE_VENDOR, TYPE_SYSTEM];

/// Maximum length of a notification message.
pub const MAX_MESSAGE_LENGTH: usize = 1_000;

/// Who a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationTarget {
    User(DbId),
    Role(String),
}

impl NotificationTarget {
    /// Build a target from the nullable recipient columns.
    ///
    /// Exactly one of the two must be set.
    pub fn from_parts(
        recipient_id: Option<DbId>,
        recipient_role: Option<&str>,
    ) -> Result<Self, CoreError> {
        match (recipient_id, recipient_role) {
            (Some(id), None) => Ok(Self::User(id)),
            (None, Some(role)) => {
                if !is_known_role(role) {
                    return Err(CoreError::invalid_field(
                        "recipient_role",
                        format!("Unknown role '{role}'"),
                    ));
                }
                Ok(Self::Role(role.to_string()))
            }
            (Some(_), Some(_)) => Err(CoreError::Validation(
                "Specify either recipient_id or recipient_role, not both".into(),
            )),
            (None, None) => Err(CoreError::Validation(
                "A notification needs a recipient_id or a recipient_role".into(),
            )),
        }
    }

    /// Realtime room this target is pushed to.
    pub fn room(&self) -> String {
        match self {
            Self::User(id) => user_room(*id),
            Self::Role(role) => role_room(role),
        }
    }

    pub fn recipient_id(&self) -> Option<DbId> {
        match self {
            Self::User(id) => Some(*id),
            Self::Role(_) => None,
        }
    }

    pub fn recipient_role(&self) -> Option<&str> {
        match self {
            Self::User(_) => None,
            Self::Role(role) => Some(role),
        }
    }
}

/// The authenticated user looking at notifications.
#[derive(Debug, Clone)]
pub struct Viewer<'a> {
    pub user_id: DbId,
    pub role: &'a str,
}

/// Whether a notification with the given recipient columns is visible to `viewer`.
///
/// Visible when it targets the viewer's id or the viewer's role.
pub fn is_visible_to(
    recipient_id: Option<DbId>,
    recipient_role: Option<&str>,
    viewer: &Viewer<'_>,
) -> bool {
    recipient_id == Some(viewer.user_id) || recipient_role == Some(viewer.role)
}

/// Room name for a single user's realtime channel.
pub fn user_room(user_id: DbId) -> String {
    format!("user:{user_id}")
}

/// Room name for a role-wide realtime channel.
pub fn role_room(role: &str) -> String {
    format!("role:{role}")
}

/// Validate the type and message of a new notification.
pub fn validate_content(notification_type: &str, message: &str) -> Result<(), CoreError> {
    if !VALID_TYPES.contains(&notification_type) {
        return Err(CoreError::invalid_field(
            "type",
            format!(
                "Invalid notification type '{notification_type}'. Must be one of: {}",
                VALID_TYPES.join(", ")
            ),
        ));
    }
    if message.trim().is_empty() {
        return Err(CoreError::invalid_field("message", "Message must not be blank"));
    }
    if message.len() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::invalid_field(
            "message",
            format!("Message exceeds {MAX_MESSAGE_LENGTH} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_VENDOR};

    fn viewer(user_id: DbId, role: &str) -> Viewer<'_> {
        Viewer { user_id, role }
    }

    #[test]
    fn visible_when_addressed_to_user() {
        assert!(is_visible_to(Some(7), None, &viewer(7, ROLE_VENDOR)));
        assert!(!is_visible_to(Some(8), None, &viewer(7, ROLE_VENDOR)));
    }

    #[test]
    fn visible_when_addressed_to_role() {
        assert!(is_visible_to(None, Some(ROLE_ADMIN), &viewer(1, ROLE_ADMIN)));
        assert!(!is_visible_to(None, Some(ROLE_ADMIN), &viewer(1, ROLE_VENDOR)));
    }

    #[test]
    fn not_visible_without_recipient() {
        assert!(!is_visible_to(None, None, &viewer(1, ROLE_ADMIN)));
    }

    #[test]
    fn target_requires_exactly_one_recipient() {
        assert_eq!(
            NotificationTarget::from_parts(Some(3), None).unwrap(),
            NotificationTarget::User(3)
        );
        assert_eq!(
            NotificationTarget::from_parts(None, Some(ROLE_ADMIN)).unwrap(),
            NotificationTarget::Role(ROLE_ADMIN.to_string())
        );
        assert_matches!(
            NotificationTarget::from_parts(Some(3), Some(ROLE_ADMIN)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            NotificationTarget::from_parts(None, None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            NotificationTarget::from_parts(None, Some("florist")),
            Err(CoreError::InvalidField { .. })
        );
    }

    #[test]
    fn rooms_are_namespaced() {
        assert_eq!(NotificationTarget::User(12).room(), "user:12");
        assert_eq!(NotificationTarget::Role("admin".into()).room(), "role:admin");
    }

    #[test]
    fn content_validation() {
        assert!(validate_content(TYPE_LEAD, "New inquiry from Asha & Rohan").is_ok());
        assert!(validate_content("spam", "hello").is_err());
        assert!(validate_content(TYPE_SYSTEM, "   ").is_err());
        assert!(validate_content(TYPE_SYSTEM, &"x".repeat(MAX_MESSAGE_LENGTH + 1)).is_err());
    }
}
