//! # Drone Coordination Core — Standalone Binary
//!
//! Boots the coordinator against an empty catalog and a [`NullComms`] link.
//! This binary exists as a smoke-run target and a place to point
//! environment configuration at; real deployments wire in a hardware comms
//! bridge and a catalog loaded from disk instead of building one in code.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drone_catalog::CatalogBuilder;
use drone_coordinator::{Coordinator, CoordinatorConfig, NullComms};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = CoordinatorConfig::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        tick_interval_ms = config.tick_interval_ms,
        role_reassignment_interval_ticks = config.role_reassignment_interval_ticks,
        "starting drone coordination core"
    );

    let catalog = CatalogBuilder::new().validate()?;
    let mut coordinator = Coordinator::new(NullComms::new(), catalog, config.clone());

    coordinator.start(&[]).await;

    tokio::select! {
        () = tick_loop(&mut coordinator, config.tick_interval_ms) => {}
        () = shutdown_signal() => {
            tracing::info!("received shutdown signal");
        }
    }

    coordinator.stop().await;
    tracing::info!("coordination core shut down gracefully");
    Ok(())
}

async fn tick_loop(coordinator: &mut Coordinator<NullComms>, tick_interval_ms: u64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_millis(tick_interval_ms));
    loop {
        interval.tick().await;
        let assignments = coordinator.tick().await;
        if !assignments.is_empty() {
            tracing::debug!(count = assignments.len(), "applied assignments this tick");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
