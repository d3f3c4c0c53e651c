//! The validated, queryable catalog.

use std::collections::HashMap;

use drone_domain::{
    AutonomyLevel, BehavioralMode, BehavioralPattern, CompatibilityRule, FormationRole,
    HardwareTarget, PatternId, PhysicalTraits, ResourceOwnership, TransitionRule,
    is_sigma_transition_valid,
};

use crate::glob::{glob_match, glob_specificity};

/// A partial [`drone_domain::CorePattern`] key for [`CatalogIndex::filter_by_core`]:
/// every `Some` field must match exactly; `None` fields are unconstrained.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialCoreKey {
    pub mode: Option<BehavioralMode>,
    pub autonomy: Option<AutonomyLevel>,
    pub role: Option<FormationRole>,
    pub ownership: Option<ResourceOwnership>,
    pub traits: Option<PhysicalTraits>,
    pub hardware: Option<HardwareTarget>,
}

impl PartialCoreKey {
    #[must_use]
    pub fn hardware_traits(hardware: HardwareTarget, traits: PhysicalTraits) -> Self {
        Self {
            hardware: Some(hardware),
            traits: Some(traits),
            ..Self::default()
        }
    }

    fn matches(&self, core: &drone_domain::CorePattern) -> bool {
        self.mode.is_none_or(|m| m == core.mode)
            && self.autonomy.is_none_or(|a| a == core.autonomy)
            && self.role.is_none_or(|r| r == core.role)
            && self.ownership.is_none_or(|o| o == core.ownership)
            && self.traits.is_none_or(|t| t == core.traits)
            && self.hardware.is_none_or(|h| h == core.hardware)
    }
}

/// An immutable, previously-validated collection of behavioral patterns and
/// compatibility rules. Read-only and cheap to share: build once, query
/// every tick.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    patterns: HashMap<PatternId, BehavioralPattern>,
    /// Load-time insertion order, preserved so a coordinator can build a
    /// stable string-to-`u16` numeric mapping at startup.
    ids_in_order: Vec<PatternId>,
    compatibility_rules: Vec<CompatibilityRule>,
    transition_rules: Vec<TransitionRule>,
}

impl CatalogIndex {
    pub(crate) fn from_parts(
        patterns: HashMap<PatternId, BehavioralPattern>,
        ids_in_order: Vec<PatternId>,
        compatibility_rules: Vec<CompatibilityRule>,
        transition_rules: Vec<TransitionRule>,
    ) -> Self {
        Self {
            patterns,
            ids_in_order,
            compatibility_rules,
            transition_rules,
        }
    }

    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&BehavioralPattern> {
        self.patterns.get(id)
    }

    /// Pattern ids in load order — the basis for the coordinator's numeric
    /// pattern-id table. Stable across runs as long as the caller loads
    /// patterns into the builder in a stable order.
    #[must_use]
    pub fn pattern_ids(&self) -> &[PatternId] {
        &self.ids_in_order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Every pattern whose core matches every `Some` field of `partial`.
    pub fn filter_by_core(&self, partial: PartialCoreKey) -> Vec<&BehavioralPattern> {
        let mut matches: Vec<&BehavioralPattern> = self
            .patterns
            .values()
            .filter(|p| partial.matches(&p.core))
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches
    }

    /// Three conditions must all hold: `to` is in `from`'s `valid_to`,
    /// `from` is in `to`'s `valid_from`, and the σ-to-σ transition is
    /// permitted by the transition matrix. Missing patterns make this
    /// false; a pattern transitioning to itself is always valid.
    #[must_use]
    pub fn is_transition_valid(&self, from_id: &str, to_id: &str) -> bool {
        if from_id == to_id {
            return true;
        }
        let Some(from) = self.patterns.get(from_id) else {
            return false;
        };
        let Some(to) = self.patterns.get(to_id) else {
            return false;
        };
        from.postconditions.valid_to.iter().any(|id| id == to_id)
            && to.preconditions.valid_from.iter().any(|id| id == from_id)
            && is_sigma_transition_valid(&self.transition_rules, from.core.mode, to.core.mode)
    }

    /// Finds the most specific compatibility rule covering the pair
    /// (checked in both orientations, since rules are bidirectional) and
    /// applies it. Absent any matching rule, the pair is compatible
    /// (open-world).
    #[must_use]
    pub fn is_compatible(&self, id_a: &str, id_b: &str, separation_m: f64) -> bool {
        let mut best: Option<(&CompatibilityRule, u16)> = None;
        for rule in &self.compatibility_rules {
            let forward = glob_match(&rule.pattern_a_glob, id_a) && glob_match(&rule.pattern_b_glob, id_b);
            let backward = glob_match(&rule.pattern_a_glob, id_b) && glob_match(&rule.pattern_b_glob, id_a);
            if !forward && !backward {
                continue;
            }
            let score = u16::from(glob_specificity(&rule.pattern_a_glob))
                + u16::from(glob_specificity(&rule.pattern_b_glob));
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((rule, score));
            }
        }

        match best {
            None => true,
            Some((rule, _)) if !rule.compatible => false,
            Some((rule, _)) => separation_m >= rule.min_separation_m,
        }
    }
}
