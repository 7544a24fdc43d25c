use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wedplan_events::{EmailConfig, SmtpMailer};
use wedplan_worker::{EmailWorker, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wedplan_worker=debug,wedplan_events=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = wedplan_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    wedplan_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    let email_config = EmailConfig::from_env().expect("SMTP_HOST must be set for the email worker");
    let mailer = SmtpMailer::new(&email_config).expect("Invalid SMTP configuration");

    let cancel = CancellationToken::new();
    let worker = EmailWorker::new(pool, Arc::new(mailer), config);
    let handle = tokio::spawn(worker.run(cancel.clone()));

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");

    cancel.cancel();
    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Email worker task panicked");
    }
}
