//! # Swarm Coordination Core — Domain Model
//!
//! The nine-dimensional drone coordinate, the finite catalog-entry shapes,
//! and the fiber-bundle dependency rules that constrain them. These types
//! are the single source of truth for the catalog index, world model, and
//! coordinator crates: a drone's behavior is always described by a point in
//! this space, never by an ad hoc string or flag.

pub mod compatibility;
pub mod coordinate;
pub mod dependency;
pub mod dimensions;
pub mod error;
pub mod ids;
pub mod neighbor;
pub mod pattern;
pub mod sensor;
pub mod state;
pub mod transition;

pub use compatibility::CompatibilityRule;
pub use coordinate::{CorePattern, DroneCoordinate, IntentHash};
pub use dependency::{
    DependencyViolation, EXCLUDED_MODES, EXCLUDED_MODES_BY_HARDWARE, EXCLUDED_ROLES,
    ROLE_OWNERSHIP, VALID_TRAITS, validate_core,
};
pub use dimensions::{
    AutonomyLevel, BehavioralMode, FormationRole, GeneratorType, HardwareTarget, PhysicalTraits,
    ResourceOwnership,
};
pub use error::DomainError;
pub use ids::{DroneId, PatternId};
pub use neighbor::NeighborGraph;
pub use pattern::{
    BehavioralPattern, ForcedExit, ForcedExitCondition, ForcedExitField, Generator, ParamBounds,
    Postconditions, Preconditions, Verification, VerificationStatus,
};
pub use sensor::{BatteryState, Orientation, SensorState, Vec3};
pub use state::{Assignment, DroneState};
pub use transition::{TransitionRule, is_sigma_transition_valid, required_transition_rules};
