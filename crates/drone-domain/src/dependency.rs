//! The fiber-bundle dependency rules between the six structural dimensions.
//! These tables are the exhaustive contract: the catalog is validated
//! against them once at load time ([`validate_core`]); nothing in the
//! runtime hot path re-checks them per tick.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinate::CorePattern;
use crate::dimensions::{BehavioralMode, FormationRole, HardwareTarget, PhysicalTraits, ResourceOwnership};

/// τ values a given ρ may carry. Every hardware target supports `bare`;
/// simulators support every trait so scenario authors aren't hardware-bound.
/// Real hardware is limited to the traits it can physically carry.
pub const VALID_TRAITS: [&[PhysicalTraits]; 5] = [
    // Crazyflie21
    &[
        PhysicalTraits::Bare,
        PhysicalTraits::CameraEquipped,
        PhysicalTraits::SensorExtended,
    ],
    // CrazyflieBl
    &[PhysicalTraits::Bare, PhysicalTraits::CameraEquipped],
    // EspDrone
    &[PhysicalTraits::Bare, PhysicalTraits::SensorExtended],
    // SimGazebo
    &[
        PhysicalTraits::Bare,
        PhysicalTraits::SolarEquipped,
        PhysicalTraits::BatteryCarrier,
        PhysicalTraits::CameraEquipped,
        PhysicalTraits::SensorExtended,
        PhysicalTraits::DualDeck,
    ],
    // SimSimple
    &[
        PhysicalTraits::Bare,
        PhysicalTraits::SolarEquipped,
        PhysicalTraits::BatteryCarrier,
        PhysicalTraits::CameraEquipped,
        PhysicalTraits::SensorExtended,
        PhysicalTraits::DualDeck,
    ],
];

/// σ values excluded for a given τ. `orbit` is unsafe for anything carrying
/// extra mass or a rigid solar wing.
pub const EXCLUDED_MODES: [&[BehavioralMode]; 6] = [
    &[],                        // Bare
    &[BehavioralMode::Orbit],   // SolarEquipped
    &[BehavioralMode::Orbit],   // BatteryCarrier
    &[],                        // CameraEquipped
    &[],                        // SensorExtended
    &[BehavioralMode::Orbit],   // DualDeck
];

/// σ values excluded for a given ρ. Docking maneuvers require a dock sensor
/// suite neither `esp-drone` nor `sim-simple` model.
pub const EXCLUDED_MODES_BY_HARDWARE: [&[BehavioralMode]; 5] = [
    &[],                                                                    // Crazyflie21
    &[],                                                                    // CrazyflieBl
    &[BehavioralMode::Dock, BehavioralMode::Undock, BehavioralMode::Docked], // EspDrone
    &[],                                                                    // SimGazebo
    &[BehavioralMode::Dock, BehavioralMode::Undock, BehavioralMode::Docked], // SimSimple
];

/// χ values excluded for a given τ. Scouting needs agility that solar wings,
/// a spare battery payload, or a dual deck preclude.
pub const EXCLUDED_ROLES: [&[FormationRole]; 6] = [
    &[],                          // Bare
    &[FormationRole::Scout],      // SolarEquipped
    &[FormationRole::Scout],      // BatteryCarrier
    &[],                          // CameraEquipped
    &[],                          // SensorExtended
    &[FormationRole::Scout],      // DualDeck
];

/// λ values valid for a given χ.
pub const ROLE_OWNERSHIP: [&[ResourceOwnership]; 10] = [
    &[ResourceOwnership::ExclusiveVolume], // Leader
    &[ResourceOwnership::SharedCorridor],  // Follower
    &[ResourceOwnership::ExclusiveVolume, ResourceOwnership::CommBridge], // Relay
    &[ResourceOwnership::SharedCorridor, ResourceOwnership::ExclusiveVolume], // Performer
    &[ResourceOwnership::SharedCorridor, ResourceOwnership::Yielding],  // ChargerInbound
    &[ResourceOwnership::EnergyConsumer],  // Charging
    &[ResourceOwnership::SharedCorridor],  // ChargerOutbound
    &[ResourceOwnership::ExclusiveVolume], // Scout
    &[ResourceOwnership::ExclusiveVolume], // Anchor
    &[ResourceOwnership::SharedCorridor, ResourceOwnership::Yielding],  // Reserve
];

/// A core pattern that violates the fiber-bundle dependency rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DependencyViolation {
    #[error("hardware {hardware} cannot carry traits {traits}")]
    InvalidTraitsForHardware {
        hardware: HardwareTarget,
        traits: PhysicalTraits,
    },
    #[error("mode {mode} is excluded for traits {traits}")]
    ExcludedModeForTraits {
        mode: BehavioralMode,
        traits: PhysicalTraits,
    },
    #[error("mode {mode} is excluded for hardware {hardware}")]
    ExcludedModeForHardware {
        mode: BehavioralMode,
        hardware: HardwareTarget,
    },
    #[error("role {role} is excluded for traits {traits}")]
    ExcludedRoleForTraits {
        role: FormationRole,
        traits: PhysicalTraits,
    },
    #[error("ownership {ownership} is not valid for role {role}")]
    InvalidOwnershipForRole {
        ownership: ResourceOwnership,
        role: FormationRole,
    },
}

/// Validate a core pattern against the dependency tables, returning the
/// first violation found. There may be more than one; callers only need
/// the first to reject the pattern.
pub fn validate_core(core: &CorePattern) -> Result<(), DependencyViolation> {
    if !VALID_TRAITS[core.hardware as usize].contains(&core.traits) {
        return Err(DependencyViolation::InvalidTraitsForHardware {
            hardware: core.hardware,
            traits: core.traits,
        });
    }
    if EXCLUDED_MODES[core.traits as usize].contains(&core.mode) {
        return Err(DependencyViolation::ExcludedModeForTraits {
            mode: core.mode,
            traits: core.traits,
        });
    }
    if EXCLUDED_MODES_BY_HARDWARE[core.hardware as usize].contains(&core.mode) {
        return Err(DependencyViolation::ExcludedModeForHardware {
            mode: core.mode,
            hardware: core.hardware,
        });
    }
    if EXCLUDED_ROLES[core.traits as usize].contains(&core.role) {
        return Err(DependencyViolation::ExcludedRoleForTraits {
            role: core.role,
            traits: core.traits,
        });
    }
    if !ROLE_OWNERSHIP[core.role as usize].contains(&core.ownership) {
        return Err(DependencyViolation::InvalidOwnershipForRole {
            ownership: core.ownership,
            role: core.role,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::AutonomyLevel;

    #[test]
    fn orbit_is_rejected_for_solar_equipped() {
        let core = CorePattern::new(
            BehavioralMode::Orbit,
            AutonomyLevel::Autonomous,
            FormationRole::Performer,
            ResourceOwnership::SharedCorridor,
            PhysicalTraits::SolarEquipped,
            HardwareTarget::SimGazebo,
        );
        assert_eq!(
            validate_core(&core),
            Err(DependencyViolation::ExcludedModeForTraits {
                mode: BehavioralMode::Orbit,
                traits: PhysicalTraits::SolarEquipped,
            })
        );
    }

    #[test]
    fn docking_is_rejected_for_esp_drone() {
        let core = CorePattern::new(
            BehavioralMode::Dock,
            AutonomyLevel::Autonomous,
            FormationRole::Performer,
            ResourceOwnership::SharedCorridor,
            PhysicalTraits::Bare,
            HardwareTarget::EspDrone,
        );
        assert!(matches!(
            validate_core(&core),
            Err(DependencyViolation::ExcludedModeForHardware { .. })
        ));
    }

    #[test]
    fn valid_core_passes() {
        let core = CorePattern::with_default_ownership(
            BehavioralMode::Hover,
            AutonomyLevel::Autonomous,
            FormationRole::Performer,
            PhysicalTraits::Bare,
            HardwareTarget::Crazyflie21,
        );
        assert!(validate_core(&core).is_ok());
    }
}
