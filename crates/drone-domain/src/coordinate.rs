//! The core pattern key and the full 9D drone coordinate.

use serde::{Deserialize, Serialize};

use crate::dependency::ROLE_OWNERSHIP;
use crate::dimensions::{
    AutonomyLevel, BehavioralMode, FormationRole, HardwareTarget, PhysicalTraits,
    ResourceOwnership,
};
use crate::neighbor::NeighborGraph;
use crate::sensor::SensorState;

/// The six structural coordinates that key the catalog: σ κ χ λ τ ρ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorePattern {
    pub mode: BehavioralMode,
    pub autonomy: AutonomyLevel,
    pub role: FormationRole,
    pub ownership: ResourceOwnership,
    pub traits: PhysicalTraits,
    pub hardware: HardwareTarget,
}

impl CorePattern {
    #[must_use]
    pub fn new(
        mode: BehavioralMode,
        autonomy: AutonomyLevel,
        role: FormationRole,
        ownership: ResourceOwnership,
        traits: PhysicalTraits,
        hardware: HardwareTarget,
    ) -> Self {
        Self {
            mode,
            autonomy,
            role,
            ownership,
            traits,
            hardware,
        }
    }

    /// Build a core pattern, picking the first ownership value the
    /// dependency table permits for this role. Convenient for callers that
    /// don't care which of several valid λ values a role gets (the world
    /// model's registration defaults, tests); catalog entries loaded from
    /// disk specify ownership explicitly and it is validated, not derived.
    #[must_use]
    pub fn with_default_ownership(
        mode: BehavioralMode,
        autonomy: AutonomyLevel,
        role: FormationRole,
        traits: PhysicalTraits,
        hardware: HardwareTarget,
    ) -> Self {
        let ownership = ROLE_OWNERSHIP[role as usize][0];
        Self::new(mode, autonomy, role, ownership, traits, hardware)
    }

    /// The canonical catalog key: `{σ}-{κ}-{χ}-{τ}.{ρ}` (λ omitted; it is
    /// constrained by χ, not independently keyed).
    #[must_use]
    pub fn canonical_key(&self) -> String {
        format!(
            "{}-{}-{}-{}.{}",
            self.mode, self.autonomy, self.role, self.traits, self.hardware
        )
    }

    #[must_use]
    pub fn with_role(mut self, role: FormationRole) -> Self {
        self.role = role;
        if !ROLE_OWNERSHIP[role as usize].contains(&self.ownership) {
            self.ownership = ROLE_OWNERSHIP[role as usize][0];
        }
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: BehavioralMode) -> Self {
        self.mode = mode;
        self
    }
}

/// An opaque hash of the drone's current intent (Σ). The core treats this as
/// a non-structural annotation: it never triggers a blast-radius cycle on
/// its own, it only travels alongside the coordinate for downstream
/// consumers (telemetry dashboards, audit logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct IntentHash(pub u64);

/// The full 9D drone coordinate: the structural core plus the two
/// non-structural fibers (ε neighbor graph, δ sensor state) and the intent
/// hash Σ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneCoordinate {
    pub core: CorePattern,
    pub neighbors: NeighborGraph,
    pub sensors: SensorState,
    pub intent: IntentHash,
}

impl DroneCoordinate {
    #[must_use]
    pub fn new(core: CorePattern, sensors: SensorState) -> Self {
        Self {
            core,
            neighbors: NeighborGraph::default(),
            sensors,
            intent: IntentHash::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_uses_dash_and_dot_separators() {
        let core = CorePattern::with_default_ownership(
            BehavioralMode::Hover,
            AutonomyLevel::Autonomous,
            FormationRole::Performer,
            PhysicalTraits::Bare,
            HardwareTarget::Crazyflie21,
        );
        assert_eq!(
            core.canonical_key(),
            "hover-autonomous-performer-bare.crazyflie-2.1"
        );
    }

    #[test]
    fn with_role_keeps_valid_ownership_where_possible() {
        let core = CorePattern::with_default_ownership(
            BehavioralMode::FormationHold,
            AutonomyLevel::Autonomous,
            FormationRole::Performer,
            PhysicalTraits::Bare,
            HardwareTarget::SimSimple,
        );
        // performer's first valid ownership is shared-corridor, which is
        // also valid for follower, so it should be kept rather than reset.
        let moved = core.with_role(FormationRole::Follower);
        assert_eq!(moved.ownership, ResourceOwnership::SharedCorridor);
    }
}
