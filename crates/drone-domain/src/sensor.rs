//! δ — sensor/telemetry state. Non-structural: changes here never trigger a
//! blast-radius cycle by themselves.

use serde::{Deserialize, Serialize};

/// 3D vector in meters or meters/second, depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Roll/pitch/yaw in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Orientation {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Battery telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryState {
    pub voltage_v: f32,
    /// Fraction remaining, in [0, 1].
    pub percentage: f32,
    pub discharge_rate_w: f32,
    pub estimated_remaining_s: f32,
}

impl Default for BatteryState {
    fn default() -> Self {
        Self {
            voltage_v: 4.2,
            percentage: 1.0,
            discharge_rate_w: 0.0,
            estimated_remaining_s: f32::MAX,
        }
    }
}

/// Full sensor snapshot (δ).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SensorState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Orientation,
    pub angular_velocity: Vec3,
    pub battery: BatteryState,
    /// Position quality/confidence, in [0, 1].
    pub position_quality: f32,
    pub wind_estimate: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    }
}
