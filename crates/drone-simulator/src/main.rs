//! # Swarm Coordination Core — Simulator Binary
//!
//! Lays out a demo swarm, builds the in-code demo catalog, and runs a real
//! [`Coordinator`] against [`SimComms`] instead of hardware — a believable
//! end-to-end run for exercising the core without a radio link.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use drone_catalog::CatalogIndex;
use drone_coordinator::{Coordinator, CoordinatorConfig};
use drone_domain::{HardwareTarget, PhysicalTraits};
use drone_simulator::scenario::generate;
use drone_simulator::{demo_catalog, ScenarioSpec, SimComms};

#[derive(Parser, Debug)]
#[command(name = "drone-simulator")]
#[command(about = "Run the coordination core against an in-process drone swarm simulation")]
struct Args {
    /// Number of drones in the demo swarm.
    #[arg(short, long, default_value = "6")]
    drones: usize,

    /// Grid spacing between adjacent drones, meters.
    #[arg(long, default_value = "3.0")]
    spacing_m: f64,

    /// Starting battery fraction for every drone.
    #[arg(long, default_value = "0.9")]
    initial_battery_pct: f32,

    /// Coordinator tick period, milliseconds.
    #[arg(long, default_value = "100")]
    tick_ms: u64,

    /// Total number of ticks to run before shutting down.
    #[arg(long, default_value = "300")]
    duration_ticks: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("drone_simulator=info".parse()?))
        .init();

    let args = Args::parse();

    let scenario = ScenarioSpec {
        drone_count: args.drones,
        spacing_m: args.spacing_m,
        initial_battery_pct: args.initial_battery_pct,
        ..ScenarioSpec::default()
    };
    let specs = generate(&scenario);

    tracing::info!(count = specs.len(), "laid out demo swarm");

    let catalog: CatalogIndex = demo_catalog()?;
    let grounded_id = "grounded-autonomous-reserve-bare.sim-simple".to_string();

    let mut config = CoordinatorConfig::default();
    config.tick_interval_ms = args.tick_ms;

    let comms = SimComms::new(&specs, args.tick_ms);
    let mut coordinator = Coordinator::new(comms, catalog, config);

    let drone_ids: Vec<_> = specs.iter().map(|spec| spec.id.clone()).collect();
    for spec in &specs {
        coordinator
            .register_drone(
                spec.id.clone(),
                HardwareTarget::SimSimple,
                PhysicalTraits::Bare,
                grounded_id.clone(),
                drone_domain::SensorState {
                    position: spec.initial_position,
                    battery: drone_domain::BatteryState {
                        percentage: spec.initial_battery_pct,
                        ..Default::default()
                    },
                    position_quality: 1.0,
                    ..drone_domain::SensorState::default()
                },
            )
            .await;
    }

    coordinator.start(&drone_ids).await;

    let mut interval = tokio::time::interval(Duration::from_millis(args.tick_ms));
    for tick in 0..args.duration_ticks {
        interval.tick().await;
        let assignments = coordinator.tick().await;
        if !assignments.is_empty() {
            tracing::info!(tick, count = assignments.len(), "applied assignments this tick");
        }
    }

    coordinator.stop().await;
    tracing::info!("simulation run complete");
    Ok(())
}
