//! # Coordinator Configuration
//!
//! Environment-based configuration for the coordination core's tick loop,
//! world model, and role-assignment thresholds.

use std::env;

/// Coordinator tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorConfig {
    /// Tick period in milliseconds (default 10ms, 100Hz).
    pub tick_interval_ms: u64,
    /// How many ticks between role-reassignment passes.
    pub role_reassignment_interval_ticks: u64,
    /// Neighbor comm range, meters.
    pub comm_range_m: f64,
    /// How long a drone may go without telemetry before it is stale.
    pub stale_threshold_ms: u64,
    /// Battery fraction below which a drone is sent to charge.
    pub battery_charge_threshold: f32,
    /// Battery fraction at or above which a charging drone is released.
    pub battery_return_threshold: f32,
    /// Minimum ticks a role must be held before it may be changed again
    /// (except the safety override).
    pub role_hysteresis_ticks: u32,
}

impl CoordinatorConfig {
    /// Load configuration from environment variables, falling back to the
    /// documented defaults below.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            tick_interval_ms: env::var("TICK_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            role_reassignment_interval_ticks: env::var("ROLE_REASSIGNMENT_INTERVAL_TICKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            comm_range_m: env::var("COMM_RANGE_M")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5.0),
            stale_threshold_ms: env::var("STALE_THRESHOLD_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            battery_charge_threshold: env::var("BATTERY_CHARGE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.15),
            battery_return_threshold: env::var("BATTERY_RETURN_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.90),
            role_hysteresis_ticks: env::var("ROLE_HYSTERESIS_TICKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    #[must_use]
    pub fn world_model_config(&self) -> drone_worldmodel::WorldModelConfig {
        drone_worldmodel::WorldModelConfig {
            comm_range_m: self.comm_range_m,
            stale_threshold_ms: self.stale_threshold_ms,
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            role_reassignment_interval_ticks: 100,
            comm_range_m: 5.0,
            stale_threshold_ms: 500,
            battery_charge_threshold: 0.15,
            battery_return_threshold: 0.90,
            role_hysteresis_ticks: 10,
        }
    }
}
