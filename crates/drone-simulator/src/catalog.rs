//! A small, real catalog covering one full flight lifecycle plus the
//! charging loop, built in code rather than loaded from disk. Loading from
//! disk is a concern of whatever deploys the coordination core; this
//! simulator only needs enough of a catalog to drive `Coordinator` through a
//! believable scenario end to end.

use std::collections::HashMap;

use drone_catalog::{CatalogBuilder, CatalogError, CatalogIndex};
use drone_domain::{
    AutonomyLevel, BehavioralMode, BehavioralPattern, CorePattern, ForcedExit, ForcedExitCondition,
    ForcedExitField, FormationRole, Generator, GeneratorType, HardwareTarget, ParamBounds,
    PhysicalTraits, Postconditions, Preconditions, Verification, VerificationStatus,
};

const HW: HardwareTarget = HardwareTarget::SimSimple;
const TRAITS: PhysicalTraits = PhysicalTraits::Bare;

fn core(mode: BehavioralMode, role: FormationRole) -> CorePattern {
    CorePattern::with_default_ownership(mode, AutonomyLevel::Autonomous, role, TRAITS, HW)
}

fn verification(max_velocity_ms: f64, max_duration_s: f64) -> Verification {
    Verification {
        status: VerificationStatus::Verified,
        collision_clearance_m: 0.5,
        max_velocity_ms,
        max_acceleration_ms2: 2.0,
        energy_rate_js: 8.0,
        max_duration_s,
        verified_transitions: vec![],
    }
}

fn position_hold_generator() -> Generator {
    let mut defaults = HashMap::new();
    defaults.insert("hold_radius_m".to_string(), 0.25);
    let mut bounds = HashMap::new();
    bounds.insert("hold_radius_m".to_string(), ParamBounds { min: 0.05, max: 1.0 });
    Generator {
        generator_type: GeneratorType::PositionHold,
        defaults,
        bounds,
    }
}

fn velocity_track_generator() -> Generator {
    let mut defaults = HashMap::new();
    defaults.insert("max_speed_ms".to_string(), 3.0);
    Generator {
        generator_type: GeneratorType::VelocityTrack,
        defaults,
        bounds: HashMap::new(),
    }
}

fn idle_generator() -> Generator {
    Generator {
        generator_type: GeneratorType::Idle,
        defaults: HashMap::new(),
        bounds: HashMap::new(),
    }
}

#[allow(clippy::too_many_arguments)]
fn pattern(
    mode: BehavioralMode,
    role: FormationRole,
    description: &str,
    battery_floor: f32,
    position_quality_floor: f32,
    valid_from: &[&str],
    valid_to: &[&str],
    forced_exits: Vec<ForcedExit>,
    generator: Generator,
    verification: Verification,
) -> BehavioralPattern {
    let core = core(mode, role);
    BehavioralPattern {
        id: core.canonical_key(),
        core,
        description: description.to_string(),
        preconditions: Preconditions {
            battery_floor,
            position_quality_floor,
            min_references: 0,
            valid_from: valid_from.iter().map(|s| (*s).to_string()).collect(),
            hardware_requirements: vec![],
        },
        postconditions: Postconditions {
            valid_to: valid_to.iter().map(|s| (*s).to_string()).collect(),
            forced_exits,
        },
        generator,
        verification,
    }
}

fn forced_exit_to(field: ForcedExitField, threshold: f32, target: &str) -> ForcedExit {
    ForcedExit {
        condition: ForcedExitCondition { field, threshold },
        target_pattern: target.to_string(),
    }
}

/// Build and validate the demo catalog: grounded, takeoff, hover (performer
/// and reserve), translate, formation-hold, land, and the three-stage
/// charging lifecycle, all on `sim-simple` hardware with bare traits.
pub fn demo_catalog() -> Result<CatalogIndex, CatalogError> {
    const GROUNDED: &str = "grounded-autonomous-reserve-bare.sim-simple";
    const TAKEOFF: &str = "takeoff-autonomous-reserve-bare.sim-simple";
    const HOVER_PERFORMER: &str = "hover-autonomous-performer-bare.sim-simple";
    const HOVER_RESERVE: &str = "hover-autonomous-reserve-bare.sim-simple";
    const TRANSLATE: &str = "translate-autonomous-performer-bare.sim-simple";
    const FORMATION_HOLD: &str = "formation-hold-autonomous-performer-bare.sim-simple";
    const LAND: &str = "land-autonomous-reserve-bare.sim-simple";
    const CHARGER_INBOUND: &str = "translate-autonomous-charger-inbound-bare.sim-simple";
    const CHARGING: &str = "grounded-autonomous-charging-bare.sim-simple";
    const CHARGER_OUTBOUND: &str = "takeoff-autonomous-charger-outbound-bare.sim-simple";

    let mut builder = CatalogBuilder::new();

    builder.add_pattern(pattern(
        BehavioralMode::Grounded,
        FormationRole::Reserve,
        "parked, motors off",
        0.0,
        0.0,
        &[LAND],
        &[TAKEOFF],
        vec![],
        idle_generator(),
        verification(0.0, f64::MAX),
    ));

    builder.add_pattern(pattern(
        BehavioralMode::Takeoff,
        FormationRole::Reserve,
        "vertical ascent to operating altitude",
        0.2,
        0.2,
        &[GROUNDED],
        &[HOVER_PERFORMER, HOVER_RESERVE],
        vec![],
        velocity_track_generator(),
        verification(2.0, 15.0),
    ));

    builder.add_pattern(pattern(
        BehavioralMode::Hover,
        FormationRole::Performer,
        "station-keep over a fixed point, performing mission work",
        0.2,
        0.3,
        &[TAKEOFF, TRANSLATE, FORMATION_HOLD, CHARGER_OUTBOUND],
        &[TRANSLATE, FORMATION_HOLD, LAND],
        vec![forced_exit_to(ForcedExitField::Battery, 0.15, LAND)],
        position_hold_generator(),
        verification(0.5, f64::MAX),
    ));

    builder.add_pattern(pattern(
        BehavioralMode::Hover,
        FormationRole::Reserve,
        "station-keep, not currently tasked",
        0.2,
        0.3,
        &[TAKEOFF, CHARGER_OUTBOUND],
        &[LAND, CHARGER_INBOUND],
        vec![forced_exit_to(ForcedExitField::Battery, 0.15, LAND)],
        position_hold_generator(),
        verification(0.5, f64::MAX),
    ));

    builder.add_pattern(pattern(
        BehavioralMode::Translate,
        FormationRole::Performer,
        "directed flight toward a target position",
        0.25,
        0.3,
        &[HOVER_PERFORMER],
        &[HOVER_PERFORMER],
        vec![forced_exit_to(ForcedExitField::Battery, 0.15, LAND)],
        velocity_track_generator(),
        verification(5.0, f64::MAX),
    ));

    builder.add_pattern(pattern(
        BehavioralMode::FormationHold,
        FormationRole::Performer,
        "hold a slot in a formation shape",
        0.25,
        0.4,
        &[HOVER_PERFORMER],
        &[HOVER_PERFORMER],
        vec![forced_exit_to(ForcedExitField::Battery, 0.15, LAND)],
        position_hold_generator(),
        verification(1.0, f64::MAX),
    ));

    builder.add_pattern(pattern(
        BehavioralMode::Land,
        FormationRole::Reserve,
        "controlled descent, the safe fallback for every forced exit",
        0.0,
        0.0,
        &[HOVER_PERFORMER, HOVER_RESERVE, TRANSLATE, FORMATION_HOLD],
        &[GROUNDED],
        vec![],
        velocity_track_generator(),
        verification(1.5, 30.0),
    ));

    builder.add_pattern(pattern(
        BehavioralMode::Translate,
        FormationRole::ChargerInbound,
        "directed flight to the charging pad",
        0.0,
        0.2,
        &[HOVER_PERFORMER, HOVER_RESERVE],
        &[CHARGING],
        vec![],
        velocity_track_generator(),
        verification(3.0, 30.0),
    ));

    builder.add_pattern(pattern(
        BehavioralMode::Grounded,
        FormationRole::Charging,
        "docked at the pad, drawing power",
        0.0,
        0.0,
        &[CHARGER_INBOUND],
        &[CHARGER_OUTBOUND],
        vec![],
        idle_generator(),
        verification(0.0, f64::MAX),
    ));

    builder.add_pattern(pattern(
        BehavioralMode::Takeoff,
        FormationRole::ChargerOutbound,
        "vertical ascent back to operating altitude after a full charge",
        0.85,
        0.2,
        &[CHARGING],
        &[HOVER_PERFORMER, HOVER_RESERVE],
        vec![],
        velocity_track_generator(),
        verification(2.0, 15.0),
    ));

    builder.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_validates() {
        demo_catalog().expect("demo catalog should validate");
    }

    #[test]
    fn demo_catalog_covers_the_full_flight_and_charging_lifecycle() {
        let catalog = demo_catalog().unwrap();
        assert!(catalog.lookup("grounded-autonomous-reserve-bare.sim-simple").is_some());
        assert!(catalog.lookup("takeoff-autonomous-charger-outbound-bare.sim-simple").is_some());
        assert_eq!(catalog.pattern_ids().len(), 10);
    }

    #[test]
    fn grounded_to_hover_requires_takeoff() {
        let catalog = demo_catalog().unwrap();
        assert!(!catalog.is_transition_valid(
            "grounded-autonomous-reserve-bare.sim-simple",
            "hover-autonomous-performer-bare.sim-simple"
        ));
        assert!(catalog.is_transition_valid(
            "grounded-autonomous-reserve-bare.sim-simple",
            "takeoff-autonomous-reserve-bare.sim-simple"
        ));
    }
}
