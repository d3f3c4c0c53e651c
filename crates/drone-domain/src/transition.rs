//! The σ-to-σ transition matrix: which behavioral-mode transitions are
//! kinematically sane regardless of which catalog entry a drone is in.

use serde::{Deserialize, Serialize};

use crate::dimensions::BehavioralMode;

/// One row of the transition matrix. `from`/`to` of `None` means `*`
/// (matches any mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRule {
    pub from: Option<BehavioralMode>,
    pub to: Option<BehavioralMode>,
    pub valid: bool,
    pub via: Option<BehavioralMode>,
    pub transition_time_s: f64,
    pub reason: Option<String>,
}

impl TransitionRule {
    #[must_use]
    pub fn matches(&self, from: BehavioralMode, to: BehavioralMode) -> bool {
        self.from.is_none_or(|f| f == from) && self.to.is_none_or(|t| t == to)
    }

    /// Specificity score used to resolve overlapping rules: exact beats one
    /// wildcard side beats both wildcards.
    #[must_use]
    fn specificity(&self) -> u8 {
        u8::from(self.from.is_some()) + u8::from(self.to.is_some())
    }
}

/// The baseline rules every catalog carries regardless of what it loads on
/// top. A catalog may add more specific rules; the lookup always prefers
/// the most specific match.
#[must_use]
pub fn required_transition_rules() -> Vec<TransitionRule> {
    use BehavioralMode::{Avoid, Grounded, Hover, Orbit, Takeoff, Translate};

    vec![
        TransitionRule {
            from: Some(Grounded),
            to: Some(Takeoff),
            valid: true,
            via: None,
            transition_time_s: 2.0,
            reason: None,
        },
        TransitionRule {
            from: Some(Grounded),
            to: Some(Hover),
            valid: false,
            via: Some(Takeoff),
            transition_time_s: 0.0,
            reason: Some("must take off before hovering".to_string()),
        },
        TransitionRule {
            from: Some(Grounded),
            to: Some(Translate),
            valid: false,
            via: Some(Takeoff),
            transition_time_s: 0.0,
            reason: Some("must take off before translating".to_string()),
        },
        TransitionRule {
            from: Some(Grounded),
            to: Some(Orbit),
            valid: false,
            via: Some(Takeoff),
            transition_time_s: 0.0,
            reason: Some("must take off before orbiting".to_string()),
        },
        TransitionRule {
            from: None,
            to: Some(Avoid),
            valid: true,
            via: None,
            transition_time_s: 0.1,
            reason: Some("collision avoidance always available".to_string()),
        },
    ]
}

/// Look up the most specific rule covering `from -> to` and return whether
/// it is valid. Self-transitions and the absence of any matching rule both
/// resolve to "valid" (open-world for unconstrained mode pairs; holding a
/// mode is trivially a valid transition into itself).
#[must_use]
pub fn is_sigma_transition_valid(rules: &[TransitionRule], from: BehavioralMode, to: BehavioralMode) -> bool {
    if from == to {
        return true;
    }
    rules
        .iter()
        .filter(|r| r.matches(from, to))
        .max_by_key(|r| r.specificity())
        .map_or(true, |r| r.valid)
}
