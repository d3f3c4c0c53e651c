//! Unchecked catalog construction plus the one-time load validation pass.

use std::collections::{HashMap, HashSet, VecDeque};

use drone_domain::{
    AutonomyLevel, BehavioralMode, BehavioralPattern, CompatibilityRule, PatternId, TransitionRule,
    is_sigma_transition_valid, required_transition_rules, validate_core,
};

use crate::error::CatalogError;
use crate::index::CatalogIndex;

/// Accumulates patterns and rules without validating them. Call
/// [`CatalogBuilder::validate`] once loading is complete to obtain a
/// queryable [`CatalogIndex`] — the runtime never sees an unvalidated
/// catalog.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    patterns: Vec<BehavioralPattern>,
    compatibility_rules: Vec<CompatibilityRule>,
    transition_rules: Vec<TransitionRule>,
}

impl CatalogBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            compatibility_rules: Vec::new(),
            transition_rules: required_transition_rules(),
        }
    }

    pub fn add_pattern(&mut self, pattern: BehavioralPattern) -> &mut Self {
        self.patterns.push(pattern);
        self
    }

    pub fn add_compatibility_rule(&mut self, rule: CompatibilityRule) -> &mut Self {
        self.compatibility_rules.push(rule);
        self
    }

    /// Add a transition rule on top of the required defaults. A rule with
    /// the same (from, to) as a required rule takes precedence only if it
    /// is strictly more specific; see [`is_sigma_transition_valid`].
    pub fn add_transition_rule(&mut self, rule: TransitionRule) -> &mut Self {
        self.transition_rules.push(rule);
        self
    }

    /// Run every load-time check and, if they all pass, build the index.
    /// Returns the first violation found; callers that want every violation
    /// should fix-and-rerun (validation is cheap and only happens at load).
    pub fn validate(self) -> Result<CatalogIndex, CatalogError> {
        let mut by_id: HashMap<PatternId, BehavioralPattern> = HashMap::with_capacity(self.patterns.len());
        let mut ids_in_order: Vec<PatternId> = Vec::with_capacity(self.patterns.len());
        for pattern in self.patterns {
            if !pattern.id_matches_canonical_key() {
                return Err(CatalogError::IdKeyMismatch {
                    id: pattern.id.clone(),
                    canonical_key: pattern.core.canonical_key(),
                });
            }
            if by_id.contains_key(&pattern.id) {
                return Err(CatalogError::DuplicateId(pattern.id));
            }
            ids_in_order.push(pattern.id.clone());
            by_id.insert(pattern.id.clone(), pattern);
        }

        for pattern in by_id.values() {
            validate_core(&pattern.core).map_err(|source| CatalogError::Dependency {
                pattern: pattern.id.clone(),
                source,
            })?;

            if pattern.core.autonomy == AutonomyLevel::Emergency
                && (pattern.preconditions.battery_floor > 0.0 || pattern.preconditions.position_quality_floor > 0.0)
            {
                return Err(CatalogError::EmergencyPreconditionsMustBeZero(pattern.id.clone()));
            }

            for to_id in &pattern.postconditions.valid_to {
                let to = by_id.get(to_id).ok_or_else(|| CatalogError::DanglingReference {
                    pattern: pattern.id.clone(),
                    referenced: to_id.clone(),
                    via: "valid_to",
                })?;
                if !is_sigma_transition_valid(&self.transition_rules, pattern.core.mode, to.core.mode) {
                    return Err(CatalogError::SigmaTransitionDisallowed {
                        from: pattern.id.clone(),
                        to: to_id.clone(),
                    });
                }
            }
            for from_id in &pattern.preconditions.valid_from {
                if !by_id.contains_key(from_id) {
                    return Err(CatalogError::DanglingReference {
                        pattern: pattern.id.clone(),
                        referenced: from_id.clone(),
                        via: "valid_from",
                    });
                }
            }
            for forced_exit in &pattern.postconditions.forced_exits {
                if !by_id.contains_key(&forced_exit.target_pattern) {
                    return Err(CatalogError::DanglingReference {
                        pattern: pattern.id.clone(),
                        referenced: forced_exit.target_pattern.clone(),
                        via: "forced_exits.target_pattern",
                    });
                }
            }
        }

        for rule in &self.compatibility_rules {
            if rule.pattern_a_glob.is_empty() && rule.pattern_a_glob != "*" {
                return Err(CatalogError::EmptyCompatibilityGlob(rule.pattern_a_glob.clone()));
            }
            if rule.pattern_b_glob.is_empty() && rule.pattern_b_glob != "*" {
                return Err(CatalogError::EmptyCompatibilityGlob(rule.pattern_b_glob.clone()));
            }
        }

        let mut referenced: HashSet<&str> = HashSet::new();
        for pattern in by_id.values() {
            for to_id in &pattern.postconditions.valid_to {
                referenced.insert(to_id.as_str());
            }
            for forced_exit in &pattern.postconditions.forced_exits {
                referenced.insert(forced_exit.target_pattern.as_str());
            }
        }
        for pattern in by_id.values() {
            let has_outgoing = !pattern.postconditions.valid_to.is_empty() || !pattern.postconditions.forced_exits.is_empty();
            let has_incoming = referenced.contains(pattern.id.as_str()) || !pattern.preconditions.valid_from.is_empty();
            if !has_outgoing && !has_incoming {
                return Err(CatalogError::IsolatedPattern(pattern.id.clone()));
            }
        }

        for pattern in by_id.values() {
            if pattern.core.mode == BehavioralMode::Grounded {
                continue;
            }
            if !has_path_to_grounded(pattern, &by_id) {
                return Err(CatalogError::NoPathToGrounded(pattern.id.clone()));
            }
        }

        Ok(CatalogIndex::from_parts(by_id, ids_in_order, self.compatibility_rules, self.transition_rules))
    }
}

fn has_path_to_grounded(start: &BehavioralPattern, by_id: &HashMap<PatternId, BehavioralPattern>) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    visited.insert(start.id.as_str());
    queue.push_back(start.id.as_str());

    while let Some(current_id) = queue.pop_front() {
        let Some(current) = by_id.get(current_id) else {
            continue;
        };
        if current.core.mode == BehavioralMode::Grounded {
            return true;
        }
        let next_ids = current
            .postconditions
            .valid_to
            .iter()
            .chain(current.postconditions.forced_exits.iter().map(|fe| &fe.target_pattern));
        for next_id in next_ids {
            if visited.insert(next_id.as_str()) {
                queue.push_back(next_id.as_str());
            }
        }
    }
    false
}
