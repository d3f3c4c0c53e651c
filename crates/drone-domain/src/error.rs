//! Domain-level errors.

use thiserror::Error;

use crate::dependency::DependencyViolation;

/// Errors raised while constructing or validating domain values. The
/// runtime hot path (world model updates, constraint solving) is
/// deliberately infallible — these are load-time/construction-time errors
/// only.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("pattern id {id} does not match its canonical key {canonical_key}")]
    IdKeyMismatch { id: String, canonical_key: String },

    #[error(transparent)]
    Dependency(#[from] DependencyViolation),
}
