//! Catalog load-time validation errors. The runtime query surface
//! ([`crate::CatalogIndex`]) never returns these — by the time a catalog is
//! queryable it has already passed [`crate::CatalogBuilder::validate`].

use thiserror::Error;

use drone_domain::{DependencyViolation, PatternId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate pattern id: {0}")]
    DuplicateId(PatternId),

    #[error("pattern {id} has id not matching its canonical key {canonical_key}")]
    IdKeyMismatch { id: PatternId, canonical_key: String },

    #[error("pattern {pattern} fails dependency validation: {source}")]
    Dependency {
        pattern: PatternId,
        #[source]
        source: DependencyViolation,
    },

    #[error("pattern {pattern} references unknown pattern {referenced} via {via}")]
    DanglingReference {
        pattern: PatternId,
        referenced: PatternId,
        via: &'static str,
    },

    #[error("pattern {from} -> {to} is a valid_to edge but the sigma transition is disallowed")]
    SigmaTransitionDisallowed { from: PatternId, to: PatternId },

    #[error("emergency-autonomy pattern {0} must have zero preconditions")]
    EmergencyPreconditionsMustBeZero(PatternId),

    #[error("pattern {0} is completely isolated (no incoming or outgoing edges)")]
    IsolatedPattern(PatternId),

    #[error("pattern {0} has no path to any grounded pattern")]
    NoPathToGrounded(PatternId),

    #[error("compatibility rule glob {0:?} is empty; did you mean \"*\"?")]
    EmptyCompatibilityGlob(String),
}
