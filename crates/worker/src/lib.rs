//! Background email worker.
//!
//! Drains the `email_jobs` queue at a bounded rate. Runs either as the
//! standalone `wedplan-worker` binary or embedded in the API server.

pub mod config;
pub mod email_worker;

pub use config::WorkerConfig;
pub use email_worker::{EmailWorker, WorkerError};
