//! # Catalog Index
//!
//! The finite, pre-verified collection of behavioral patterns and their
//! pairwise compatibility rules. Patterns are loaded and validated once
//! ([`CatalogBuilder::validate`]); every dependency-rule and referential
//! check runs at that point, never per tick. The resulting
//! [`CatalogIndex`] is an immutable, read-only store cheap to clone and
//! share across the coordinator's components.

pub mod builder;
pub mod error;
pub mod glob;
pub mod index;

pub use builder::CatalogBuilder;
pub use error::CatalogError;
pub use glob::{glob_match, glob_specificity};
pub use index::{CatalogIndex, PartialCoreKey};
