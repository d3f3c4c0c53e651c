//! # Swarm Coordination Core — Simulator
//!
//! An in-process telemetry simulator: a demo catalog built in code, a grid
//! layout for a swarm's starting positions, a per-drone physics model, and
//! [`SimComms`] — the `CommsInterface` implementation that drives them
//! against a real `drone_coordinator::Coordinator` instead of hardware.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod catalog;
pub mod comms;
pub mod motion;
pub mod scenario;

pub use catalog::demo_catalog;
pub use comms::SimComms;
pub use motion::DroneMotionModel;
pub use scenario::{DroneSpec, ScenarioSpec};
