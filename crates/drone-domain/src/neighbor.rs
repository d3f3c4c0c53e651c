//! ε — the neighbor graph. Derived on every telemetry update from spatial
//! proximity and the formation roles of other drones; never stored
//! independently of the world model that computed it.

use serde::{Deserialize, Serialize};

use crate::ids::DroneId;

/// A drone's view of its neighborhood as of the last telemetry update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NeighborGraph {
    /// Every drone within comm range, regardless of role.
    pub neighbors: Vec<DroneId>,
    /// This drone's leader, if it is a follower and one is in range.
    pub leader: Option<DroneId>,
    /// This drone's followers, if it is a leader.
    pub followers: Vec<DroneId>,
    /// The relay this drone forwards through, if it is a relay.
    pub relay_target: Option<DroneId>,
    /// The relay that forwards through this drone, if any neighbor is a relay.
    pub relay_source: Option<DroneId>,
    /// Docking target, populated by external systems. Always empty within
    /// the core itself.
    pub dock_target: Option<DroneId>,
    /// Visible base stations, populated by external systems.
    pub base_stations: Vec<DroneId>,
}

impl NeighborGraph {
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.neighbors.is_empty()
    }
}
