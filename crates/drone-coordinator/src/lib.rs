//! # Swarm Coordination Core — Coordinator
//!
//! Composes the catalog and world-model crates into the tick-driven loop:
//! blast-radius computation, the constraint-based pattern solver, role
//! (χ) reassignment, the wire codec exchanged with drone firmware, and the
//! [`CommsInterface`] abstraction that keeps the core ignorant of whatever
//! radio or simulator sits underneath it.

pub mod blast_radius;
pub mod comms;
pub mod config;
pub mod constraint;
pub mod coordinator;
pub mod error;
pub mod role;
pub mod wire;

pub use blast_radius::BlastRadiusEngine;
pub use comms::{ChannelComms, CommsInterface, NullComms, TelemetryEvent};
pub use config::CoordinatorConfig;
pub use constraint::{ConstraintEngine, ObjectiveType, SwarmObjective};
pub use coordinator::{Coordinator, PatternIdTable};
pub use error::{CoordinatorError, Result};
pub use role::{CoverageSpec, FormationSpec, RoleAssignment, RoleConfig};
pub use wire::{CommandFlags, DroneCommand, StatusFlags, TelemetryPacket};
