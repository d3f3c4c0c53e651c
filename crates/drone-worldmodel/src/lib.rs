//! # World Model
//!
//! The coordination core's single mutable, shared resource: authoritative
//! per-drone state, neighbor-graph (ε) recomputation, and staleness
//! tracking. The catalog of behavioral patterns is immutable once loaded
//! ([`drone_catalog::CatalogIndex`]); everything that changes tick to tick
//! lives here instead.

pub mod config;
pub mod delta;
pub mod error;
pub mod model;

pub use config::WorldModelConfig;
pub use delta::{DeltaResult, StructuralDimension};
pub use error::WorldModelError;
pub use model::WorldModel;
