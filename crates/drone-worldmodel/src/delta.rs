//! Structural delta classification: which of the six structural dimensions
//! changed between two core patterns.

/// One of the six structural dimensions (σ κ χ λ τ ρ).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralDimension {
    Mode,
    Autonomy,
    Role,
    Ownership,
    Traits,
    Hardware,
}

/// The result of comparing a drone's old and new [`drone_domain::CorePattern`].
/// All six structural dimensions are treated identically: any of them
/// changing means `structural` is true and a blast-radius cycle is owed.
/// ε/δ/Σ changes never produce a `DeltaResult` at all.
#[derive(Debug, Clone, Default)]
pub struct DeltaResult {
    pub changed: Vec<StructuralDimension>,
    pub structural: bool,
}

impl DeltaResult {
    #[must_use]
    pub fn classify(old: &drone_domain::CorePattern, new: &drone_domain::CorePattern) -> Self {
        let mut changed = Vec::new();
        if old.mode != new.mode {
            changed.push(StructuralDimension::Mode);
        }
        if old.autonomy != new.autonomy {
            changed.push(StructuralDimension::Autonomy);
        }
        if old.role != new.role {
            changed.push(StructuralDimension::Role);
        }
        if old.ownership != new.ownership {
            changed.push(StructuralDimension::Ownership);
        }
        if old.traits != new.traits {
            changed.push(StructuralDimension::Traits);
        }
        if old.hardware != new.hardware {
            changed.push(StructuralDimension::Hardware);
        }
        let structural = !changed.is_empty();
        Self { changed, structural }
    }
}
