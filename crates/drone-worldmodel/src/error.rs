//! World model errors. Every *operational* path (telemetry ingestion,
//! pattern updates, staleness sweeps) is deliberately infallible per the
//! spec — unknown drones are silently ignored rather than raising. The only
//! fallible surface is construction-time configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldModelError {
    #[error("comm_range_m must be positive, got {0}")]
    NonPositiveCommRange(f64),
}
