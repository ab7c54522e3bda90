// src/main.rs
use axum::{extract::Extension, Router};
use chrono::Duration as ChronoDuration;
use dotenv::dotenv;
use std::time::Duration;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod admin;
mod common;
mod ledger;
mod services;
mod verification;

use common::{AppState, BotConfig};
use services::{LoggingRoleGateway, OwnershipVerifier, RoleGateway, StubOwnershipVerifier};
use verification::flow::VerificationService;
use verification::registry::VerificationRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // CONFIGURATION
    // ========================================================================

    let config = BotConfig::from_env();
    info!(
        ttl_minutes = config.verification_ttl_minutes,
        payout_rate = config.payout_rate,
        max_attempts = config.max_attempts,
        "Loaded bot configuration"
    );

    // ========================================================================
    // STORE AND SERVICE INITIALIZATION
    // ========================================================================

    let store = ledger::store::connect(&config).await?;

    let registry = VerificationRegistry::new();
    info!("VerificationRegistry initialized");

    let verifier: Arc<dyn OwnershipVerifier> = Arc::new(StubOwnershipVerifier::default());
    let gateway: Arc<dyn RoleGateway> = Arc::new(LoggingRoleGateway);

    let verification_service = Arc::new(VerificationService::new(
        registry.clone(),
        store.clone(),
        verifier,
        gateway.clone(),
        ChronoDuration::minutes(config.verification_ttl_minutes),
        config.max_attempts,
    ));
    info!("VerificationService initialized");

    // ========================================================================
    // BACKGROUND TASKS
    // ========================================================================

    services::scheduler::start_sweep_task(
        registry,
        Duration::from_secs(config.sweep_interval_minutes * 60),
    );
    services::scheduler::start_analytics_task(
        store.clone(),
        Duration::from_secs(config.analytics_interval_hours * 3600),
    );
    info!("Housekeeping tasks started");

    // ========================================================================
    // APPLICATION STATE AND ROUTER
    // ========================================================================

    let app_state = AppState {
        store,
        verification: verification_service,
        gateway,
        config: config.clone(),
    };

    let shared = Arc::new(RwLock::new(app_state));

    let app = Router::new()
        .merge(verification::verification_routes())
        .merge(ledger::ledger_routes())
        .merge(admin::admin_routes())
        .layer(Extension(shared))
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
