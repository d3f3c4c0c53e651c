//! Role (χ) reassignment: safety, charging lifecycle, and mission-coverage
//! rules applied in strict priority order over a mutable effective-role map.

use std::collections::HashMap;

use drone_domain::{BehavioralMode, DroneId, FormationRole, Vec3};
use drone_worldmodel::WorldModel;

/// What the formation needs this cycle.
#[derive(Debug, Clone, Copy)]
pub struct FormationSpec {
    pub min_performers: usize,
    pub needs_leader: bool,
    pub center: Vec3,
}

impl Default for FormationSpec {
    fn default() -> Self {
        Self {
            min_performers: 0,
            needs_leader: false,
            center: Vec3::new(0.0, 0.0, 0.0),
        }
    }
}

/// What coverage this cycle requires.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageSpec {
    pub coverage_radius_m: f64,
    pub needs_relay: bool,
}

/// Thresholds driving the charging lifecycle and hysteresis gate.
#[derive(Debug, Clone, Copy)]
pub struct RoleConfig {
    pub battery_charge_threshold: f32,
    pub battery_return_threshold: f32,
    pub role_hysteresis_ticks: u32,
}

/// Stateless role-assignment solver. Tick-count bookkeeping (how long a
/// role has been held) is owned by the coordinator loop, not here.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoleAssignment;

impl RoleAssignment {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns only drones whose new role differs from their stored χ.
    #[must_use]
    pub fn assign(
        &self,
        world: &WorldModel,
        active_drones: &[DroneId],
        formation: &FormationSpec,
        coverage: &CoverageSpec,
        config: &RoleConfig,
        tick_counts: Option<&HashMap<DroneId, u32>>,
    ) -> HashMap<DroneId, FormationRole> {
        let mut effective: HashMap<DroneId, FormationRole> = HashMap::new();
        for id in active_drones {
            if let Some(drone) = world.get_drone(id) {
                effective.insert(id.clone(), drone.core.role);
            }
        }

        // rule 1: safety override
        for id in active_drones {
            let Some(drone) = world.get_drone(id) else { continue };
            let role = effective[id];
            if drone.telemetry.battery.percentage < config.battery_charge_threshold && !role.in_charging_lifecycle() {
                effective.insert(id.clone(), FormationRole::ChargerInbound);
            }
        }

        // rule 2: charging complete
        for id in active_drones {
            let Some(drone) = world.get_drone(id) else { continue };
            if effective[id] == FormationRole::Charging && drone.telemetry.battery.percentage >= config.battery_return_threshold {
                effective.insert(id.clone(), FormationRole::ChargerOutbound);
            }
        }

        // rule 3: charger-outbound returning airborne
        for id in active_drones {
            let Some(drone) = world.get_drone(id) else { continue };
            if effective[id] == FormationRole::ChargerOutbound && !matches!(drone.core.mode, BehavioralMode::Grounded | BehavioralMode::Docked) {
                let performer_count = effective.values().filter(|r| **r == FormationRole::Performer).count();
                let new_role = if performer_count < formation.min_performers {
                    FormationRole::Performer
                } else {
                    FormationRole::Reserve
                };
                effective.insert(id.clone(), new_role);
            }
        }

        // rule 4: relay assignment
        if coverage.needs_relay && !effective.values().any(|r| *r == FormationRole::Relay) {
            let best = active_drones
                .iter()
                .filter(|id| {
                    let Some(role) = effective.get(*id) else { return false };
                    matches!(role, FormationRole::Performer | FormationRole::Reserve)
                        && world.get_drone(id).is_some_and(|d| d.telemetry.battery.percentage >= config.battery_charge_threshold)
                })
                .filter_map(|id| {
                    let drone = world.get_drone(id)?;
                    let radial = drone.telemetry.position.distance_to(&Vec3::new(0.0, 0.0, drone.telemetry.position.z));
                    let deviation = (radial - coverage.coverage_radius_m).abs();
                    let score = deviation - f64::from(drone.telemetry.battery.percentage) * 0.01;
                    Some((id.clone(), score))
                })
                .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            if let Some((id, _)) = best {
                effective.insert(id, FormationRole::Relay);
            }
        }

        // rule 5: leader assignment
        if formation.needs_leader && !effective.values().any(|r| *r == FormationRole::Leader) {
            let best = active_drones
                .iter()
                .filter(|id| {
                    let Some(role) = effective.get(*id) else { return false };
                    matches!(role, FormationRole::Performer | FormationRole::Reserve)
                        && world.get_drone(id).is_some_and(|d| d.telemetry.battery.percentage >= config.battery_charge_threshold)
                })
                .filter_map(|id| {
                    let drone = world.get_drone(id)?;
                    Some((id.clone(), drone.telemetry.battery.percentage, drone.telemetry.position_quality))
                })
                .max_by(|(_, ba, qa), (_, bb, qb)| {
                    if (ba - bb).abs() <= 0.001 {
                        qa.partial_cmp(qb).unwrap_or(std::cmp::Ordering::Equal)
                    } else {
                        ba.partial_cmp(bb).unwrap_or(std::cmp::Ordering::Equal)
                    }
                });
            if let Some((id, _, _)) = best {
                effective.insert(id, FormationRole::Leader);
            }
        }

        // rule 6: performer filling
        loop {
            let performer_count = effective.values().filter(|r| **r == FormationRole::Performer).count();
            if performer_count >= formation.min_performers {
                break;
            }
            let candidate = active_drones
                .iter()
                .filter(|id| effective.get(*id) == Some(&FormationRole::Reserve))
                .filter_map(|id| world.get_drone(id).map(|d| (id.clone(), d.telemetry.battery.percentage)))
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let Some((id, _)) = candidate else { break };
            effective.insert(id, FormationRole::Performer);
        }

        // rule 7: excess performer demotion (fairness)
        let performer_count = effective.values().filter(|r| **r == FormationRole::Performer).count();
        if performer_count > formation.min_performers {
            let mut excess = active_drones
                .iter()
                .filter(|id| effective.get(*id) == Some(&FormationRole::Performer))
                .filter_map(|id| world.get_drone(id).map(|d| (id.clone(), d.telemetry.battery.percentage)))
                .filter(|(_, battery)| *battery < 0.50)
                .collect::<Vec<_>>();
            excess.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let to_demote = performer_count - formation.min_performers;
            for (id, _) in excess.into_iter().take(to_demote) {
                effective.insert(id, FormationRole::Reserve);
            }
        }

        // rule 8: hysteresis
        let mut output = HashMap::new();
        for id in active_drones {
            let Some(drone) = world.get_drone(id) else { continue };
            let Some(new_role) = effective.get(id).copied() else { continue };
            if new_role == drone.core.role {
                continue;
            }
            if new_role != FormationRole::ChargerInbound {
                if let Some(counts) = tick_counts {
                    let held_ticks = counts.get(id).copied().unwrap_or(0);
                    if held_ticks < config.role_hysteresis_ticks {
                        continue;
                    }
                }
            }
            output.insert(id.clone(), new_role);
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drone_domain::{AutonomyLevel, BatteryState, CorePattern, HardwareTarget, PhysicalTraits, ResourceOwnership, SensorState};
    use drone_worldmodel::WorldModelConfig;

    fn drone_with(role: FormationRole, battery_pct: f32, position_quality: f32) -> (drone_domain::CorePattern, SensorState) {
        let core = CorePattern::new(
            BehavioralMode::Hover,
            AutonomyLevel::Autonomous,
            role,
            ResourceOwnership::SharedCorridor,
            PhysicalTraits::Bare,
            HardwareTarget::SimSimple,
        );
        let telemetry = SensorState {
            battery: BatteryState {
                percentage: battery_pct,
                ..Default::default()
            },
            position_quality,
            ..SensorState::default()
        };
        (core, telemetry)
    }

    #[test]
    fn low_battery_drone_is_sent_to_charge_regardless_of_hysteresis() {
        let mut world = WorldModel::new(WorldModelConfig::default());
        let (core, telemetry) = drone_with(FormationRole::Performer, 0.10, 1.0);
        world.add_drone("d0".to_string(), core.hardware, core.traits, "p".to_string(), telemetry);
        world.update_pattern("d0", "p".to_string(), core);

        let engine = RoleAssignment::new();
        let config = RoleConfig {
            battery_charge_threshold: 0.15,
            battery_return_threshold: 0.90,
            role_hysteresis_ticks: 10,
        };
        let mut counts = HashMap::new();
        counts.insert("d0".to_string(), 0_u32);
        let result = engine.assign(
            &world,
            &["d0".to_string()],
            &FormationSpec::default(),
            &CoverageSpec::default(),
            &config,
            Some(&counts),
        );
        assert_eq!(result.get("d0"), Some(&FormationRole::ChargerInbound));
    }

    #[test]
    fn role_engine_output_excludes_unchanged_roles() {
        let mut world = WorldModel::new(WorldModelConfig::default());
        let (core, telemetry) = drone_with(FormationRole::Reserve, 0.8, 1.0);
        world.add_drone("d0".to_string(), core.hardware, core.traits, "p".to_string(), telemetry);
        world.update_pattern("d0", "p".to_string(), core);

        let engine = RoleAssignment::new();
        let config = RoleConfig {
            battery_charge_threshold: 0.15,
            battery_return_threshold: 0.90,
            role_hysteresis_ticks: 10,
        };
        let result = engine.assign(
            &world,
            &["d0".to_string()],
            &FormationSpec::default(),
            &CoverageSpec::default(),
            &config,
            None,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn all_drones_stale_yields_empty_role_assignment() {
        let world = WorldModel::new(WorldModelConfig::default());
        let engine = RoleAssignment::new();
        let config = RoleConfig {
            battery_charge_threshold: 0.15,
            battery_return_threshold: 0.90,
            role_hysteresis_ticks: 10,
        };
        let result = engine.assign(&world, &[], &FormationSpec::default(), &CoverageSpec::default(), &config, None);
        assert!(result.is_empty());
    }
}
