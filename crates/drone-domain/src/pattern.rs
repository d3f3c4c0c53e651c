//! A behavioral pattern — one catalog entry. Patterns are pre-verified
//! offline; the runtime only ever selects among them, never generates one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coordinate::CorePattern;
use crate::dimensions::{GeneratorType, HardwareTarget};
use crate::ids::PatternId;

/// Conditions that must hold before a pattern may be selected.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Preconditions {
    /// Minimum battery fraction, in [0, 1].
    pub battery_floor: f32,
    /// Minimum position-quality fraction, in [0, 1].
    pub position_quality_floor: f32,
    /// Minimum count of neighbors + visible base stations.
    pub min_references: u32,
    /// Patterns this one may be entered from (by id).
    pub valid_from: Vec<PatternId>,
    /// Hardware targets this pattern is restricted to, if any (empty means
    /// unrestricted beyond the core's own hardware field).
    pub hardware_requirements: Vec<HardwareTarget>,
}

/// A single forced-exit rule: `condition -> target_pattern`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForcedExit {
    pub condition: ForcedExitCondition,
    pub target_pattern: PatternId,
}

/// The field a forced-exit condition compares. The grammar is deliberately
/// narrow (`<field> < <number>`) on purpose; broadening it is future work,
/// not something to improvise here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ForcedExitField {
    Battery,
    PositionQuality,
}

/// `<field> < <threshold>`. Malformed or unrecognized conditions never
/// throw; they simply never fire (see [`ForcedExitCondition::evaluate`] via
/// the constraint engine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForcedExitCondition {
    pub field: ForcedExitField,
    pub threshold: f32,
}

impl ForcedExitCondition {
    #[must_use]
    pub fn evaluate(&self, battery_percentage: f32, position_quality: f32) -> bool {
        let value = match self.field {
            ForcedExitField::Battery => battery_percentage,
            ForcedExitField::PositionQuality => position_quality,
        };
        value < self.threshold
    }
}

/// What patterns may follow this one, and under what emergencies it must be
/// abandoned.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Postconditions {
    pub valid_to: Vec<PatternId>,
    pub forced_exits: Vec<ForcedExit>,
}

/// Bounds on a named generator parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParamBounds {
    pub min: f64,
    pub max: f64,
}

/// The motor-command generator this pattern drives, with its default
/// parameters and their bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    pub generator_type: GeneratorType,
    pub defaults: HashMap<String, f64>,
    pub bounds: HashMap<String, ParamBounds>,
}

/// Offline verification status of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Verified,
    Unverified,
    Failed,
}

/// The offline-computed safety envelope and proof status for a pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    pub status: VerificationStatus,
    pub collision_clearance_m: f64,
    pub max_velocity_ms: f64,
    pub max_acceleration_ms2: f64,
    pub energy_rate_js: f64,
    pub max_duration_s: f64,
    pub verified_transitions: Vec<PatternId>,
}

/// A complete catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralPattern {
    /// Must equal `core.canonical_key()` — checked at catalog load.
    pub id: PatternId,
    pub core: CorePattern,
    pub description: String,
    pub preconditions: Preconditions,
    pub postconditions: Postconditions,
    pub generator: Generator,
    pub verification: Verification,
}

impl BehavioralPattern {
    #[must_use]
    pub fn id_matches_canonical_key(&self) -> bool {
        self.id == self.core.canonical_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_exit_condition_fires_below_threshold() {
        let cond = ForcedExitCondition {
            field: ForcedExitField::Battery,
            threshold: 0.1,
        };
        assert!(cond.evaluate(0.05, 1.0));
        assert!(!cond.evaluate(0.5, 1.0));
    }
}
