//! Mudra API Server
//!
//! Main entry point for the Mudra backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mudra_api::{AppState, create_router};
use mudra_shared::{AdvisorClient, AppConfig, EmailService, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mudra=debug,mudra_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = mudra_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = Arc::new(JwtService::new(&config.jwt));

    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    let advisor = AdvisorClient::new(&config.advisor).context("Failed to build advisor client")?;
    info!(
        base_url = %config.advisor.base_url,
        timeout_secs = config.advisor.timeout_secs,
        "Advisor client configured"
    );

    let otp_ttl = chrono::Duration::try_seconds(i64::try_from(config.otp.ttl_secs)?)
        .context("OTP lifetime out of range")?;

    let state = AppState::new(
        mudra_db::stores(&db),
        Arc::new(email_service),
        Arc::new(advisor),
        jwt_service,
        otp_ttl,
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
