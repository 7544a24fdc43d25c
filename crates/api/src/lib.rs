//! Wedplan API server library.
//!
//! Exposes the building blocks (config, state, error envelope, routes,
//! realtime infrastructure, PDF rendering) so integration tests and the
//! binary entrypoint share them.

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod pdf;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod uploads;
pub mod ws;
