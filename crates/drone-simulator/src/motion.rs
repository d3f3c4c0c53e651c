//! Per-drone physics model: a simple proportional controller toward whatever
//! target position/velocity the coordinator last commanded, integrated each
//! tick into a [`SensorState`] with sensor noise layered on top.

use rand::rngs::ThreadRng;
use rand_distr::{Distribution, Normal};

use drone_domain::{BatteryState, Orientation, SensorState, Vec3};

/// Battery drained per second of flight at cruise speed, as a fraction of
/// full capacity.
const CRUISE_DISCHARGE_PER_S: f32 = 1.0 / 1800.0;
/// Battery drained per second while grounded (avionics draw only).
const IDLE_DISCHARGE_PER_S: f32 = 1.0 / 14_400.0;
/// Battery gained per second while charging.
const CHARGE_GAIN_PER_S: f32 = 1.0 / 90.0;
/// Proportional gain steering velocity toward a commanded target position.
const POSITION_GAIN: f64 = 0.8;
const MAX_SPEED_MS: f64 = 4.0;

/// A single simulated drone's physical state, advanced one tick at a time.
pub struct DroneMotionModel {
    position: Vec3,
    velocity: Vec3,
    battery_pct: f32,
    target_pos: Option<Vec3>,
    target_vel: Option<Vec3>,
    charging: bool,
    rng: ThreadRng,
    position_noise: Normal<f64>,
    quality_noise: Normal<f32>,
}

impl DroneMotionModel {
    #[must_use]
    pub fn new(initial_position: Vec3, initial_battery_pct: f32) -> Self {
        Self {
            position: initial_position,
            velocity: Vec3::default(),
            battery_pct: initial_battery_pct,
            target_pos: None,
            target_vel: None,
            charging: false,
            rng: rand::thread_rng(),
            position_noise: Normal::new(0.0, 0.01).unwrap(),
            quality_noise: Normal::new(0.97, 0.02).unwrap(),
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Record the most recent commanded target, as sent by the coordinator.
    /// `None` clears a dimension so the drone holds station on it.
    pub fn set_target(&mut self, target_pos: (f64, f64, f64), target_vel: (f64, f64, f64)) {
        self.target_pos = Some(Vec3::new(target_pos.0, target_pos.1, target_pos.2));
        self.target_vel = Some(Vec3::new(target_vel.0, target_vel.1, target_vel.2));
    }

    /// Mark the drone as sitting on the charging pad, where battery rises
    /// instead of draining.
    pub fn set_charging(&mut self, charging: bool) {
        self.charging = charging;
        if charging {
            self.velocity = Vec3::default();
        }
    }

    /// Advance the model by `dt_s` seconds and return the resulting sensor
    /// snapshot.
    pub fn step(&mut self, dt_s: f64) -> SensorState {
        if self.charging {
            self.battery_pct = (self.battery_pct + CHARGE_GAIN_PER_S * dt_s as f32).min(1.0);
        } else {
            self.integrate_motion(dt_s);
            let speed = (self.velocity.x.powi(2) + self.velocity.y.powi(2) + self.velocity.z.powi(2)).sqrt();
            let discharge = if speed > 0.05 { CRUISE_DISCHARGE_PER_S } else { IDLE_DISCHARGE_PER_S };
            self.battery_pct = (self.battery_pct - discharge * dt_s as f32).max(0.0);
        }

        let position_quality = self.quality_noise.sample(&mut self.rng).clamp(0.0, 1.0);
        let wind_estimate = Vec3::new(
            self.position_noise.sample(&mut self.rng) * 3.0,
            self.position_noise.sample(&mut self.rng) * 3.0,
            0.0,
        );

        SensorState {
            position: self.position,
            velocity: self.velocity,
            orientation: Orientation::default(),
            angular_velocity: Vec3::default(),
            battery: BatteryState {
                voltage_v: 3.2 + 1.0 * self.battery_pct,
                percentage: self.battery_pct,
                discharge_rate_w: if self.charging { 0.0 } else { 8.0 },
                estimated_remaining_s: if self.charging {
                    f32::MAX
                } else {
                    self.battery_pct / CRUISE_DISCHARGE_PER_S
                },
            },
            position_quality,
            wind_estimate,
        }
    }

    fn integrate_motion(&mut self, dt_s: f64) {
        if let Some(target) = self.target_pos {
            let to_target = Vec3::new(
                target.x - self.position.x,
                target.y - self.position.y,
                target.z - self.position.z,
            );
            let desired = Vec3::new(
                (to_target.x * POSITION_GAIN).clamp(-MAX_SPEED_MS, MAX_SPEED_MS),
                (to_target.y * POSITION_GAIN).clamp(-MAX_SPEED_MS, MAX_SPEED_MS),
                (to_target.z * POSITION_GAIN).clamp(-MAX_SPEED_MS, MAX_SPEED_MS),
            );
            self.velocity = desired;
        } else if let Some(target_vel) = self.target_vel {
            self.velocity = target_vel;
        } else {
            self.velocity = Vec3::default();
        }

        self.position.x += self.velocity.x * dt_s + self.position_noise.sample(&mut self.rng);
        self.position.y += self.velocity.y * dt_s + self.position_noise.sample(&mut self.rng);
        self.position.z += self.velocity.z * dt_s;
    }
}
