//! # opsdeckd: opsdeck daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise `tracing` from the configured filter
//! - Load the demo automations when seeding is enabled
//! - Pick the id generator and build the in-memory store
//! - Build the axum router around the automation service
//! - Bind to a TCP port and serve until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use opsdeck_adapter_http_axum::router;
use opsdeck_adapter_http_axum::state::AppState;
use opsdeck_adapter_seed::demo_automations;
use opsdeck_app::id_generator::{SequentialIdGenerator, UuidIdGenerator};
use opsdeck_app::ports::IdGenerator;
use opsdeck_app::services::automation_service::AutomationService;
use opsdeck_app::services::automation_store::AutomationStore;
use opsdeck_domain::time;

use crate::config::{Config, IdStrategy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter `{}`", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Store
    let seed = if config.store.seed_demo_data {
        demo_automations(time::now()).context("failed to build demo automations")?
    } else {
        Vec::new()
    };
    let ids: Box<dyn IdGenerator + Send> = match config.store.id_strategy {
        IdStrategy::Sequential => Box::new(SequentialIdGenerator::resuming(&seed)),
        IdStrategy::Uuid => Box::new(UuidIdGenerator),
    };
    let store = AutomationStore::with_automations(seed, ids).context("invalid seed data")?;
    tracing::info!(
        automations = store.len(),
        id_strategy = ?config.store.id_strategy,
        "automation store ready"
    );

    // HTTP
    let state = AppState::new(AutomationService::new(store));
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "opsdeckd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("opsdeckd stopped");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolve once `signal` fires. A handler that cannot be installed never
/// resolves, so the server keeps running instead of stopping at once.
async fn wait_for_signal(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(err) = signal.await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Duration;

    #[tokio::test]
    async fn should_resolve_when_signal_fires() {
        let result =
            tokio::time::timeout(Duration::from_millis(50), wait_for_signal(async { Ok(()) }))
                .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_keep_waiting_when_signal_handler_fails() {
        let failing = async { Err(io::Error::other("signal handling unsupported")) };
        let result =
            tokio::time::timeout(Duration::from_millis(50), wait_for_signal(failing)).await;
        assert!(result.is_err());
    }
}
