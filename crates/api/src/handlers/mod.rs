pub mod admin;
pub mod auth;
pub mod catalogue;
pub mod configurator;
pub mod landing;
pub mod leads;
pub mod notifications;
pub mod proposals;
pub mod templates;
