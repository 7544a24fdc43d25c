use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Root directory for uploaded files, served under `/uploads`.
    pub uploads_dir: PathBuf,
    /// Base URL of the frontend; public proposal pages live under it.
    pub public_app_url: String,
    /// Time the PDF renderer lets the page settle before printing.
    pub pdf_settle_ms: u64,
    /// Chromium executable used for PDF rendering.
    pub chromium_bin: String,
    /// Lifetime of a password reset code in minutes (default: `10`).
    pub otp_expiry_mins: i64,
    /// Run the email worker inside the server process (default: `true`).
    pub email_worker_enabled: bool,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3001`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `UPLOADS_DIR`          | `uploads`                  |
    /// | `PUBLIC_APP_URL`       | `http://localhost:3001`    |
    /// | `PDF_SETTLE_MS`        | `1500`                     |
    /// | `CHROMIUM_BIN`         | `chromium`                 |
    /// | `OTP_EXPIRY_MINS`      | `10`                       |
    /// | `EMAIL_WORKER_ENABLED` | `true`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let uploads_dir =
            PathBuf::from(std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".into()));

        let public_app_url = std::env::var("PUBLIC_APP_URL")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .trim_end_matches('/')
            .to_string();

        let pdf_settle_ms: u64 = std::env::var("PDF_SETTLE_MS")
            .unwrap_or_else(|_| "1500".into())
            .parse()
            .expect("PDF_SETTLE_MS must be a valid u64");

        let chromium_bin = std::env::var("CHROMIUM_BIN").unwrap_or_else(|_| "chromium".into());

        let otp_expiry_mins: i64 = std::env::var("OTP_EXPIRY_MINS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("OTP_EXPIRY_MINS must be a valid i64");

        let email_worker_enabled = std::env::var("EMAIL_WORKER_ENABLED")
            .map(|v| !matches!(v.trim(), "false" | "0" | "no"))
            .unwrap_or(true);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            uploads_dir,
            public_app_url,
            pdf_settle_ms,
            chromium_bin,
            otp_expiry_mins,
            email_worker_enabled,
            jwt,
        }
    }

    /// URL of the public page for the proposal with `reference_code`.
    pub fn proposal_page_url(&self, reference_code: &str) -> String {
        format!("{}/proposals/{reference_code}", self.public_app_url)
    }
}
