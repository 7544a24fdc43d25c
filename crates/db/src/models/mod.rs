//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts (validated with `validator`)
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod email_job;
pub mod landing_section;
pub mod lead;
pub mod notification;
pub mod password_reset;
pub mod proposal;
pub mod role;
pub mod session;
pub mod team;
pub mod template;
pub mod user;
pub mod vendor;
pub mod vibe;
pub mod wedding_plan;
