//! Lays out a demo swarm: a grid of drones around a center point, spaced so
//! that the constraint engine's neighbor graph forms a believable mesh
//! instead of either a single clique or a field of isolated singletons.

use drone_domain::{DroneId, Vec3};

/// One drone's starting placement.
#[derive(Debug, Clone)]
pub struct DroneSpec {
    pub id: DroneId,
    pub initial_position: Vec3,
    pub initial_battery_pct: f32,
}

/// Parameters for a demo scenario.
#[derive(Debug, Clone)]
pub struct ScenarioSpec {
    pub drone_count: usize,
    pub spacing_m: f64,
    pub center: Vec3,
    pub initial_battery_pct: f32,
}

impl Default for ScenarioSpec {
    fn default() -> Self {
        Self {
            drone_count: 6,
            spacing_m: 3.0,
            center: Vec3::new(0.0, 0.0, 0.0),
            initial_battery_pct: 0.9,
        }
    }
}

/// Lay drones out on a square grid centered on `spec.center`, at ground
/// level (z=0) — each one starts grounded and takes off under its own
/// assigned pattern.
#[must_use]
pub fn generate(spec: &ScenarioSpec) -> Vec<DroneSpec> {
    let side = (spec.drone_count as f64).sqrt().ceil() as usize;
    let mut drones = Vec::with_capacity(spec.drone_count);

    for i in 0..spec.drone_count {
        let row = i / side.max(1);
        let col = i % side.max(1);
        let offset = Vec3::new(
            (col as f64 - (side as f64 - 1.0) / 2.0) * spec.spacing_m,
            (row as f64 - (side as f64 - 1.0) / 2.0) * spec.spacing_m,
            0.0,
        );
        drones.push(DroneSpec {
            id: format!("drone-{i:02}"),
            initial_position: Vec3::new(
                spec.center.x + offset.x,
                spec.center.y + offset.y,
                spec.center.z,
            ),
            initial_battery_pct: spec.initial_battery_pct,
        });
    }

    drones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_the_requested_count() {
        let spec = ScenarioSpec { drone_count: 9, ..ScenarioSpec::default() };
        let drones = generate(&spec);
        assert_eq!(drones.len(), 9);
    }

    #[test]
    fn adjacent_drones_are_spaced_by_the_configured_amount() {
        let spec = ScenarioSpec { drone_count: 4, spacing_m: 2.5, ..ScenarioSpec::default() };
        let drones = generate(&spec);
        let d0 = drones[0].initial_position;
        let d1 = drones[1].initial_position;
        assert!((d0.distance_to(&d1) - 2.5).abs() < 1e-9);
    }
}
