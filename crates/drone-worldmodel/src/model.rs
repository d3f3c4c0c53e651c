//! The world model: the single mutable, authoritative store of swarm state.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use drone_domain::{CorePattern, DroneId, DroneState, FormationRole, NeighborGraph, PatternId, SensorState};

use crate::config::WorldModelConfig;
use crate::delta::DeltaResult;

/// Authoritative per-drone state, with derived neighbor graphs and
/// staleness tracking. This is the only mutable shared resource in the
/// coordination core; the catalog is read-only once loaded and every other
/// component only reads from here.
#[derive(Debug)]
pub struct WorldModel {
    config: WorldModelConfig,
    drones: HashMap<DroneId, DroneState>,
    /// Registration order, used to give the "first neighbor found" rules a
    /// deterministic, documented tie-break.
    order: Vec<DroneId>,
}

impl WorldModel {
    #[must_use]
    pub fn new(config: WorldModelConfig) -> Self {
        Self {
            config,
            drones: HashMap::new(),
            order: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> WorldModelConfig {
        self.config
    }

    /// Register a drone with the default initial core (σ=grounded,
    /// κ=autonomous, χ=reserve, λ=shared-corridor) and compute its initial
    /// neighbor graph.
    pub fn add_drone(
        &mut self,
        id: DroneId,
        hardware: drone_domain::HardwareTarget,
        traits: drone_domain::PhysicalTraits,
        initial_pattern: PatternId,
        telemetry: SensorState,
    ) {
        use drone_domain::{AutonomyLevel, BehavioralMode};

        let core = CorePattern::with_default_ownership(
            BehavioralMode::Grounded,
            AutonomyLevel::Autonomous,
            FormationRole::Reserve,
            traits,
            hardware,
        );
        let state = DroneState::new(id.clone(), core, initial_pattern, telemetry);
        if !self.drones.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.drones.insert(id.clone(), state);
        self.recompute_neighbors(&id);
    }

    pub fn remove_drone(&mut self, id: &str) -> bool {
        let removed = self.drones.remove(id).is_some();
        if removed {
            self.order.retain(|existing| existing != id);
        }
        removed
    }

    /// Absorb a telemetry snapshot. No-op for unregistered drones. Clears
    /// staleness and recomputes this drone's neighbor graph; neighbors'
    /// own graphs are updated only when they next receive telemetry.
    pub fn update_telemetry(&mut self, id: &str, telemetry: SensorState) {
        if let Some(state) = self.drones.get_mut(id) {
            state.telemetry = telemetry;
            state.last_update = Instant::now();
            state.stale = false;
        } else {
            tracing::debug!(drone_id = id, "telemetry for unregistered drone ignored");
            return;
        }
        self.recompute_neighbors(id);
    }

    /// Update a drone's pattern and core, returning the structural delta.
    /// No-op (returning `None`) for unregistered drones.
    pub fn update_pattern(&mut self, id: &str, pattern_id: PatternId, new_core: CorePattern) -> Option<DeltaResult> {
        let state = self.drones.get_mut(id)?;
        let delta = DeltaResult::classify(&state.core, &new_core);
        state.core = new_core;
        state.current_pattern = pattern_id;
        Some(delta)
    }

    /// Mark drones stale whose last telemetry predates the configured
    /// threshold, returning the IDs newly marked this call.
    pub fn mark_stale_drones(&mut self) -> Vec<DroneId> {
        let threshold = Duration::from_millis(self.config.stale_threshold_ms);
        let now = Instant::now();
        let mut newly_stale = Vec::new();
        for id in &self.order {
            if let Some(state) = self.drones.get_mut(id) {
                if !state.stale && now.duration_since(state.last_update) > threshold {
                    state.stale = true;
                    newly_stale.push(id.clone());
                }
            }
        }
        if !newly_stale.is_empty() {
            tracing::debug!(count = newly_stale.len(), "marked drones stale");
        }
        newly_stale
    }

    /// Every registered drone id in registration order, stale or not. Used
    /// by callers that need a deterministic order over an arbitrary id set
    /// (e.g. the coordinator ordering an affected set before solving).
    #[must_use]
    pub fn all_drone_ids(&self) -> &[DroneId] {
        &self.order
    }

    #[must_use]
    pub fn get_active_drone_ids(&self) -> Vec<DroneId> {
        self.order
            .iter()
            .filter(|id| self.drones.get(*id).is_some_and(|s| !s.stale))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn get_neighbor_graph(&self, id: &str) -> Option<&NeighborGraph> {
        self.drones.get(id).map(|s| &s.neighbors)
    }

    #[must_use]
    pub fn get_drone(&self, id: &str) -> Option<&DroneState> {
        self.drones.get(id)
    }

    #[must_use]
    pub fn drone_count(&self) -> usize {
        self.drones.len()
    }

    /// Recompute ε for a single drone from the current positions and roles
    /// of every other drone (no staleness filter at this level — see
    /// the module-level note on invariant 4's eventual consistency).
    fn recompute_neighbors(&mut self, id: &str) {
        let Some(position) = self.drones.get(id).map(|s| s.telemetry.position) else {
            return;
        };
        let my_role = self.drones.get(id).map(|s| s.core.role);
        let Some(my_role) = my_role else { return };

        let mut neighbors = Vec::new();
        for other_id in &self.order {
            if other_id == id {
                continue;
            }
            let Some(other) = self.drones.get(other_id) else {
                continue;
            };
            if position.distance_to(&other.telemetry.position) <= self.config.comm_range_m {
                neighbors.push(other_id.clone());
            }
        }

        let mut leader = None;
        let mut followers = Vec::new();
        let mut relay_target = None;
        let mut relay_source = None;

        if my_role == FormationRole::Follower {
            leader = neighbors
                .iter()
                .find(|n| self.drones.get(*n).is_some_and(|s| s.core.role == FormationRole::Leader))
                .cloned();
        }
        if my_role == FormationRole::Leader {
            followers = neighbors
                .iter()
                .filter(|n| self.drones.get(*n).is_some_and(|s| s.core.role == FormationRole::Follower))
                .cloned()
                .collect();
        }
        if my_role == FormationRole::Relay {
            relay_target = neighbors.first().cloned();
        }
        relay_source = relay_source.or_else(|| {
            neighbors
                .iter()
                .find(|n| self.drones.get(*n).is_some_and(|s| s.core.role == FormationRole::Relay))
                .cloned()
        });

        if let Some(state) = self.drones.get_mut(id) {
            state.neighbors = NeighborGraph {
                neighbors,
                leader,
                followers,
                relay_target,
                relay_source,
                dock_target: state.neighbors.dock_target.clone(),
                base_stations: state.neighbors.base_stations.clone(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drone_domain::{HardwareTarget, PhysicalTraits, Vec3};

    fn telemetry_at(x: f64, y: f64, z: f64) -> SensorState {
        SensorState {
            position: Vec3::new(x, y, z),
            ..SensorState::default()
        }
    }

    #[test]
    fn isolated_drone_has_no_neighbors() {
        let mut model = WorldModel::new(WorldModelConfig::default());
        model.add_drone(
            "d0".to_string(),
            HardwareTarget::SimSimple,
            PhysicalTraits::Bare,
            "grounded-autonomous-reserve-bare.sim-simple".to_string(),
            telemetry_at(0.0, 0.0, 1.0),
        );
        let graph = model.get_neighbor_graph("d0").unwrap();
        assert!(graph.is_isolated());
    }

    #[test]
    fn two_drones_within_range_are_mutual_neighbors() {
        let mut model = WorldModel::new(WorldModelConfig {
            comm_range_m: 3.0,
            stale_threshold_ms: 500,
        });
        model.add_drone(
            "d0".to_string(),
            HardwareTarget::SimSimple,
            PhysicalTraits::Bare,
            "p".to_string(),
            telemetry_at(0.0, 0.0, 1.0),
        );
        model.add_drone(
            "d1".to_string(),
            HardwareTarget::SimSimple,
            PhysicalTraits::Bare,
            "p".to_string(),
            telemetry_at(2.0, 0.0, 1.0),
        );
        // add_drone only computes the newly-added drone's own neighbors;
        // refresh d0 via a telemetry touch to see d1 too.
        model.update_telemetry("d0", telemetry_at(0.0, 0.0, 1.0));

        assert_eq!(model.get_neighbor_graph("d0").unwrap().neighbors, vec!["d1".to_string()]);
        assert_eq!(model.get_neighbor_graph("d1").unwrap().neighbors, vec!["d0".to_string()]);
    }

    #[test]
    fn mark_stale_drones_excludes_fresh_telemetry() {
        let mut model = WorldModel::new(WorldModelConfig {
            comm_range_m: 5.0,
            stale_threshold_ms: 500,
        });
        model.add_drone(
            "d0".to_string(),
            HardwareTarget::SimSimple,
            PhysicalTraits::Bare,
            "p".to_string(),
            telemetry_at(0.0, 0.0, 1.0),
        );
        assert!(model.mark_stale_drones().is_empty());
        assert_eq!(model.get_active_drone_ids(), vec!["d0".to_string()]);
    }

    #[test]
    fn remove_drone_clears_state_and_order() {
        let mut model = WorldModel::new(WorldModelConfig::default());
        model.add_drone(
            "d0".to_string(),
            HardwareTarget::SimSimple,
            PhysicalTraits::Bare,
            "p".to_string(),
            telemetry_at(0.0, 0.0, 1.0),
        );
        assert!(model.remove_drone("d0"));
        assert!(model.get_drone("d0").is_none());
        assert!(model.get_active_drone_ids().is_empty());
    }
}
