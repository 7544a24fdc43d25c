//! Domain logic for the wedding-planning marketplace.
//!
//! Everything in this crate is pure (no I/O) so it can be shared by the API
//! server, the email worker, and the repository layer, and unit tested in
//! isolation.

pub mod autosave;
pub mod configurator;
pub mod contract;
pub mod error;
pub mod landing;
pub mod lead;
pub mod notification;
pub mod otp;
pub mod proposal;
pub mod roles;
pub mod types;
pub mod uploads;
pub mod validation;
pub mod vendor;
