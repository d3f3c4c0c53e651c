//! The world model's per-drone record and the constraint engine's output.

use std::time::Instant;

use crate::coordinate::CorePattern;
use crate::ids::{DroneId, PatternId};
use crate::neighbor::NeighborGraph;
use crate::sensor::{SensorState, Vec3};

/// Authoritative per-drone state held by the world model.
#[derive(Debug, Clone)]
pub struct DroneState {
    pub id: DroneId,
    pub core: CorePattern,
    pub current_pattern: PatternId,
    pub telemetry: SensorState,
    pub neighbors: NeighborGraph,
    pub last_update: Instant,
    pub stale: bool,
}

impl DroneState {
    #[must_use]
    pub fn new(id: DroneId, core: CorePattern, current_pattern: PatternId, telemetry: SensorState) -> Self {
        Self {
            id,
            core,
            current_pattern,
            telemetry,
            neighbors: NeighborGraph::default(),
            last_update: Instant::now(),
            stale: false,
        }
    }
}

/// One drone's assigned pattern for the current tick, as produced by the
/// constraint engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub drone_id: DroneId,
    pub pattern_id: PatternId,
    pub target_pos: Option<Vec3>,
    pub target_vel: Option<Vec3>,
}

impl Assignment {
    #[must_use]
    pub fn new(drone_id: DroneId, pattern_id: PatternId) -> Self {
        Self {
            drone_id,
            pattern_id,
            target_pos: None,
            target_vel: None,
        }
    }
}
