//! # wakeshiftd: wakeshift daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services and the outcome worker, injecting
//!   repositories via port traits
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use wakeshift_adapter_http_axum::state::AppState;
use wakeshift_app::adjustment_engine::AdjustmentEngine;
use wakeshift_app::effectiveness_tracker::{EffectivenessTracker, OutcomeQueue};
use wakeshift_app::services::rule_service::RuleService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let engine = config.engine()?;

    // Database
    let db = wakeshift_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("opening database")?;

    // Repositories
    let rules = db.rule_repository();
    let outcomes = db.outcome_store();

    // Effectiveness writer
    let tracker = EffectivenessTracker::new(
        rules.clone(),
        outcomes.clone(),
        engine.learning_factor,
        engine.review_policy,
    );
    let (outcome_queue, worker) = OutcomeQueue::spawn(tracker, engine.outcome_queue_capacity);

    // HTTP
    let state = AppState::new(
        RuleService::new(rules.clone()),
        AdjustmentEngine::new(rules, engine.ceiling),
        outcome_queue,
        outcomes,
        engine.review_policy,
    );
    let app = wakeshift_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(
        addr = %bind_addr,
        ceiling_minutes = engine.ceiling.minutes(),
        "wakeshiftd listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last queue handle; wait for pending outcomes.
    worker.await?;
    tracing::info!("wakeshiftd stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
