//! The constraint engine: per-drone pattern selection under hardware,
//! precondition, transition, and neighbor-compatibility constraints.

use std::collections::HashMap;

use drone_catalog::{CatalogIndex, PartialCoreKey};
use drone_domain::{Assignment, BehavioralMode, DroneId, PatternId};
use drone_worldmodel::WorldModel;

/// The kind of swarm-wide objective currently active. Maps to the σ a
/// candidate pattern must exhibit to score the objective bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveType {
    Formation,
    Orbit,
    Translate,
    Hover,
    LandAll,
}

impl ObjectiveType {
    #[must_use]
    fn matching_mode(self) -> BehavioralMode {
        match self {
            Self::Formation => BehavioralMode::FormationHold,
            Self::Orbit => BehavioralMode::Orbit,
            Self::Translate => BehavioralMode::Translate,
            Self::Hover => BehavioralMode::Hover,
            Self::LandAll => BehavioralMode::Land,
        }
    }
}

/// One active swarm objective. `shape_params` carries generator-specific
/// tuning (radius, spacing, ...) that the constraint engine itself does not
/// interpret.
#[derive(Debug, Clone, Default)]
pub struct SwarmObjective {
    pub objective_type: Option<ObjectiveType>,
    pub target_pos: Option<drone_domain::Vec3>,
    pub shape_params: HashMap<String, f64>,
}

impl SwarmObjective {
    #[must_use]
    pub fn new(objective_type: ObjectiveType) -> Self {
        Self {
            objective_type: Some(objective_type),
            target_pos: None,
            shape_params: HashMap::new(),
        }
    }
}

/// Stateless solver over a world-model + catalog snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstraintEngine;

impl ConstraintEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Produce one assignment per affected drone present in the world
    /// model, in the order `affected_drones` is given (documented as
    /// insertion order by callers). Drones absent from the world model are
    /// silently skipped; the engine never errors.
    #[must_use]
    pub fn solve(
        &self,
        world: &WorldModel,
        catalog: &CatalogIndex,
        affected_drones: &[DroneId],
        objectives: &[SwarmObjective],
    ) -> Vec<Assignment> {
        let mut assigned_now: HashMap<DroneId, PatternId> = HashMap::new();
        let mut assignments = Vec::new();

        for id in affected_drones {
            let Some(drone) = world.get_drone(id) else {
                continue;
            };

            if let Some(pattern_id) = self.forced_exit_target(catalog, drone) {
                assigned_now.insert(id.clone(), pattern_id.clone());
                assignments.push(Assignment::new(id.clone(), pattern_id));
                continue;
            }

            let hardware_candidates =
                catalog.filter_by_core(PartialCoreKey::hardware_traits(drone.core.hardware, drone.core.traits));

            let battery_pct = drone.telemetry.battery.percentage;
            let position_quality = drone.telemetry.position_quality;
            let reference_count = drone.neighbors.neighbors.len() + drone.neighbors.base_stations.len();

            let precondition_survivors: Vec<_> = hardware_candidates
                .into_iter()
                .filter(|p| {
                    p.preconditions.battery_floor <= battery_pct
                        && p.preconditions.position_quality_floor <= position_quality
                        && u32::try_from(reference_count).unwrap_or(u32::MAX) >= p.preconditions.min_references
                })
                .collect();

            let transition_survivors: Vec<_> = precondition_survivors
                .into_iter()
                .filter(|p| {
                    drone.current_pattern.is_empty()
                        || p.id == drone.current_pattern
                        || catalog.is_transition_valid(&drone.current_pattern, &p.id)
                })
                .collect();

            let neighbor_ids = drone.neighbors.neighbors.clone();
            let compatible_survivors: Vec<_> = transition_survivors
                .into_iter()
                .filter(|p| {
                    neighbor_ids.iter().all(|neighbor_id| {
                        let Some(neighbor) = world.get_drone(neighbor_id) else {
                            return true;
                        };
                        let neighbor_pattern = assigned_now
                            .get(neighbor_id)
                            .cloned()
                            .unwrap_or_else(|| neighbor.current_pattern.clone());
                        let separation = drone.telemetry.position.distance_to(&neighbor.telemetry.position);
                        catalog.is_compatible(&p.id, &neighbor_pattern, separation)
                    })
                })
                .collect();

            let chosen = self.select_best(&compatible_survivors, drone, objectives).map(|p| p.id.clone());

            let chosen = chosen.or_else(|| self.hover_fallback(catalog, drone)).or_else(|| {
                self.emergency_fallback(catalog, drone)
            });

            let pattern_id = chosen.unwrap_or_else(|| drone.current_pattern.clone());

            assigned_now.insert(id.clone(), pattern_id.clone());
            assignments.push(Assignment::new(id.clone(), pattern_id));
        }

        assignments
    }

    fn forced_exit_target(&self, catalog: &CatalogIndex, drone: &drone_domain::DroneState) -> Option<PatternId> {
        let current = catalog.lookup(&drone.current_pattern)?;
        let battery_pct = drone.telemetry.battery.percentage;
        let position_quality = drone.telemetry.position_quality;
        current
            .postconditions
            .forced_exits
            .iter()
            .find(|fe| fe.condition.evaluate(battery_pct, position_quality))
            .filter(|fe| catalog.lookup(&fe.target_pattern).is_some())
            .map(|fe| fe.target_pattern.clone())
    }

    fn select_best<'a>(
        &self,
        candidates: &[&'a drone_domain::BehavioralPattern],
        drone: &drone_domain::DroneState,
        objectives: &[SwarmObjective],
    ) -> Option<&'a drone_domain::BehavioralPattern> {
        let mut scored: Vec<(&'a drone_domain::BehavioralPattern, f64)> = candidates
            .iter()
            .map(|p| (*p, self.score(p, drone, objectives)))
            .collect();
        // ties broken by ascending id: stable, documented, independent of catalog iteration order.
        scored.sort_by(|(pa, sa), (pb, sb)| {
            sb.partial_cmp(sa).unwrap_or(std::cmp::Ordering::Equal).then_with(|| pa.id.cmp(&pb.id))
        });
        scored.into_iter().next().map(|(p, _)| p)
    }

    fn score(&self, pattern: &drone_domain::BehavioralPattern, drone: &drone_domain::DroneState, objectives: &[SwarmObjective]) -> f64 {
        let mut score = 0.0;
        if pattern.id == drone.current_pattern {
            score += 10.0;
        }
        for objective in objectives {
            if let Some(objective_type) = objective.objective_type {
                if objective_type.matching_mode() == pattern.core.mode {
                    score += 5.0;
                }
            }
        }
        if pattern.core.role == drone.core.role {
            score += 2.0;
        }
        let battery_pct = drone.telemetry.battery.percentage;
        if pattern.preconditions.battery_floor > 0.3 && battery_pct < 0.5 {
            score -= 5.0;
        }
        score
    }

    fn hover_fallback(&self, catalog: &CatalogIndex, drone: &drone_domain::DroneState) -> Option<PatternId> {
        let candidates = catalog.filter_by_core(PartialCoreKey {
            mode: Some(BehavioralMode::Hover),
            hardware: Some(drone.core.hardware),
            traits: Some(drone.core.traits),
            ..PartialCoreKey::default()
        });
        candidates
            .into_iter()
            .min_by(|a, b| {
                a.preconditions
                    .battery_floor
                    .partial_cmp(&b.preconditions.battery_floor)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.id.clone())
    }

    fn emergency_fallback(&self, catalog: &CatalogIndex, drone: &drone_domain::DroneState) -> Option<PatternId> {
        let candidates = catalog.filter_by_core(PartialCoreKey::hardware_traits(drone.core.hardware, drone.core.traits));
        let zero_battery: Vec<_> = candidates
            .into_iter()
            .filter(|p| p.preconditions.battery_floor == 0.0)
            .collect();
        zero_battery
            .iter()
            .find(|p| matches!(p.core.mode, BehavioralMode::Land | BehavioralMode::Grounded))
            .or_else(|| zero_battery.first())
            .map(|p| p.id.clone())
    }
}
