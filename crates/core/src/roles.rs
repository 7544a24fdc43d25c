//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000001_create_roles_and_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TEAM_MEMBER: &str = "team_member";
pub const ROLE_VENDOR: &str = "vendor";

/// Every role a notification may be addressed to.
pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_TEAM_MEMBER, ROLE_VENDOR];

/// Whether `role` is one of the known role names.
pub fn is_known_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}
