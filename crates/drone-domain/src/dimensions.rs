//! The six structural dimensions of a drone's core pattern (σ κ χ λ τ ρ)
//! plus the generator taxonomy. Each is a closed, finite set — never a
//! free-form string — so membership and exhaustiveness are checked at
//! compile time instead of at every tick.

use serde::{Deserialize, Serialize};

/// σ — behavioral mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BehavioralMode {
    Hover,
    Translate,
    Orbit,
    Avoid,
    Climb,
    Descend,
    Land,
    Takeoff,
    Dock,
    Undock,
    Grounded,
    Docked,
    FormationHold,
    FormationTransition,
    RelayHold,
}

impl BehavioralMode {
    pub const ALL: [Self; 15] = [
        Self::Hover,
        Self::Translate,
        Self::Orbit,
        Self::Avoid,
        Self::Climb,
        Self::Descend,
        Self::Land,
        Self::Takeoff,
        Self::Dock,
        Self::Undock,
        Self::Grounded,
        Self::Docked,
        Self::FormationHold,
        Self::FormationTransition,
        Self::RelayHold,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Translate => "translate",
            Self::Orbit => "orbit",
            Self::Avoid => "avoid",
            Self::Climb => "climb",
            Self::Descend => "descend",
            Self::Land => "land",
            Self::Takeoff => "takeoff",
            Self::Dock => "dock",
            Self::Undock => "undock",
            Self::Grounded => "grounded",
            Self::Docked => "docked",
            Self::FormationHold => "formation-hold",
            Self::FormationTransition => "formation-transition",
            Self::RelayHold => "relay-hold",
        }
    }
}

impl std::fmt::Display for BehavioralMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// κ — autonomy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutonomyLevel {
    Autonomous,
    OperatorGuided,
    Emergency,
    Manual,
}

impl AutonomyLevel {
    pub const ALL: [Self; 4] = [
        Self::Autonomous,
        Self::OperatorGuided,
        Self::Emergency,
        Self::Manual,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Autonomous => "autonomous",
            Self::OperatorGuided => "operator-guided",
            Self::Emergency => "emergency",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for AutonomyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// χ — formation role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormationRole {
    Leader,
    Follower,
    Relay,
    Performer,
    ChargerInbound,
    Charging,
    ChargerOutbound,
    Scout,
    Anchor,
    Reserve,
}

impl FormationRole {
    pub const ALL: [Self; 10] = [
        Self::Leader,
        Self::Follower,
        Self::Relay,
        Self::Performer,
        Self::ChargerInbound,
        Self::Charging,
        Self::ChargerOutbound,
        Self::Scout,
        Self::Anchor,
        Self::Reserve,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Follower => "follower",
            Self::Relay => "relay",
            Self::Performer => "performer",
            Self::ChargerInbound => "charger-inbound",
            Self::Charging => "charging",
            Self::ChargerOutbound => "charger-outbound",
            Self::Scout => "scout",
            Self::Anchor => "anchor",
            Self::Reserve => "reserve",
        }
    }

    /// The lifecycle of a drone returning to charge: inbound, charging, then
    /// outbound again. Used by the role engine to recognize "in the
    /// charging lifecycle" without re-deriving it from battery state.
    #[must_use]
    pub fn in_charging_lifecycle(self) -> bool {
        matches!(self, Self::ChargerInbound | Self::Charging | Self::ChargerOutbound)
    }
}

impl std::fmt::Display for FormationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// λ — resource ownership. Derived from χ via [`crate::dependency::ROLE_OWNERSHIP`],
/// never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceOwnership {
    ExclusiveVolume,
    SharedCorridor,
    Yielding,
    EnergySource,
    EnergyStore,
    EnergyConsumer,
    CommBridge,
}

impl ResourceOwnership {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExclusiveVolume => "exclusive-volume",
            Self::SharedCorridor => "shared-corridor",
            Self::Yielding => "yielding",
            Self::EnergySource => "energy-source",
            Self::EnergyStore => "energy-store",
            Self::EnergyConsumer => "energy-consumer",
            Self::CommBridge => "comm-bridge",
        }
    }
}

impl std::fmt::Display for ResourceOwnership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// τ — physical traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhysicalTraits {
    Bare,
    SolarEquipped,
    BatteryCarrier,
    CameraEquipped,
    SensorExtended,
    DualDeck,
}

impl PhysicalTraits {
    pub const ALL: [Self; 6] = [
        Self::Bare,
        Self::SolarEquipped,
        Self::BatteryCarrier,
        Self::CameraEquipped,
        Self::SensorExtended,
        Self::DualDeck,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bare => "bare",
            Self::SolarEquipped => "solar-equipped",
            Self::BatteryCarrier => "battery-carrier",
            Self::CameraEquipped => "camera-equipped",
            Self::SensorExtended => "sensor-extended",
            Self::DualDeck => "dual-deck",
        }
    }
}

impl std::fmt::Display for PhysicalTraits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ρ — hardware target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HardwareTarget {
    #[serde(rename = "crazyflie-2.1")]
    Crazyflie21,
    CrazyflieBl,
    EspDrone,
    SimGazebo,
    SimSimple,
}

impl HardwareTarget {
    pub const ALL: [Self; 5] = [
        Self::Crazyflie21,
        Self::CrazyflieBl,
        Self::EspDrone,
        Self::SimGazebo,
        Self::SimSimple,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crazyflie21 => "crazyflie-2.1",
            Self::CrazyflieBl => "crazyflie-bl",
            Self::EspDrone => "esp-drone",
            Self::SimGazebo => "sim-gazebo",
            Self::SimSimple => "sim-simple",
        }
    }

    /// Whether this hardware target is a simulator (simulators support all
    /// physical traits, per the dependency table).
    #[must_use]
    pub fn is_simulated(self) -> bool {
        matches!(self, Self::SimGazebo | Self::SimSimple)
    }
}

impl std::fmt::Display for HardwareTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Motor-command generator family referenced by a behavioral pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorType {
    PositionHold,
    VelocityTrack,
    WaypointSequence,
    RelativeOffset,
    OrbitCenter,
    TrajectorySpline,
    EmergencyStop,
    Idle,
}

impl GeneratorType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PositionHold => "position-hold",
            Self::VelocityTrack => "velocity-track",
            Self::WaypointSequence => "waypoint-sequence",
            Self::RelativeOffset => "relative-offset",
            Self::OrbitCenter => "orbit-center",
            Self::TrajectorySpline => "trajectory-spline",
            Self::EmergencyStop => "emergency-stop",
            Self::Idle => "idle",
        }
    }
}

impl std::fmt::Display for GeneratorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behavioral_mode_round_trips_through_as_str() {
        for mode in BehavioralMode::ALL {
            assert_eq!(mode.as_str().replace('-', ""), mode.as_str().replace('-', ""));
        }
    }

    #[test]
    fn hardware_target_kebab_names_are_stable() {
        assert_eq!(HardwareTarget::Crazyflie21.as_str(), "crazyflie-2.1");
        assert_eq!(HardwareTarget::SimSimple.as_str(), "sim-simple");
    }

    #[test]
    fn simulated_hardware_targets_are_identified() {
        assert!(HardwareTarget::SimGazebo.is_simulated());
        assert!(!HardwareTarget::Crazyflie21.is_simulated());
    }
}
