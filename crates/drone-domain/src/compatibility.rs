//! Pairwise pattern compatibility rules. Globs (`*` = any substring) are
//! matched by [`drone_catalog`](../drone_catalog/index.html)'s index; this
//! crate only owns the rule's shape.

use serde::{Deserialize, Serialize};

/// A bidirectional compatibility rule between two pattern-id globs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityRule {
    pub pattern_a_glob: String,
    pub pattern_b_glob: String,
    pub compatible: bool,
    pub min_separation_m: f64,
    pub reason: Option<String>,
}
