//! The tick-driven coordinator loop: absorbs telemetry, detects forced
//! exits, runs the blast radius and constraint engine, periodically
//! reassigns roles, applies the results to the world model, and emits wire
//! commands through the injected [`CommsInterface`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use drone_catalog::{CatalogIndex, PartialCoreKey};
use drone_domain::{Assignment, BehavioralMode, DroneId, HardwareTarget, PatternId, PhysicalTraits, SensorState};
use drone_worldmodel::WorldModel;

use crate::blast_radius::BlastRadiusEngine;
use crate::comms::CommsInterface;
use crate::config::CoordinatorConfig;
use crate::constraint::{ConstraintEngine, SwarmObjective};
use crate::role::{CoverageSpec, FormationSpec, RoleAssignment, RoleConfig};
use crate::wire::{CommandFlags, DroneCommand};

/// Maps catalog pattern-id strings to the compact `u16`s the wire format
/// carries. Built once at startup from the catalog's load-time insertion
/// order — stable across runs as long as the catalog itself is loaded in a
/// stable order.
#[derive(Debug, Clone, Default)]
pub struct PatternIdTable {
    to_numeric: HashMap<PatternId, u16>,
    to_string: Vec<PatternId>,
}

impl PatternIdTable {
    #[must_use]
    pub fn build(catalog: &CatalogIndex) -> Self {
        let mut to_numeric = HashMap::with_capacity(catalog.pattern_ids().len());
        let mut to_string = Vec::with_capacity(catalog.pattern_ids().len());
        for id in catalog.pattern_ids() {
            let numeric = u16::try_from(to_string.len()).unwrap_or(u16::MAX);
            to_numeric.insert(id.clone(), numeric);
            to_string.push(id.clone());
        }
        Self { to_numeric, to_string }
    }

    #[must_use]
    pub fn numeric_of(&self, id: &str) -> Option<u16> {
        self.to_numeric.get(id).copied()
    }

    #[must_use]
    pub fn string_of(&self, numeric: u16) -> Option<&PatternId> {
        self.to_string.get(usize::from(numeric))
    }
}

type OnTickHook = Arc<dyn Fn(u64, &[Assignment]) + Send + Sync>;
type OnShutdownHook = Arc<dyn Fn() + Send + Sync>;

/// Tick-driven composition of every other component. Generic over the
/// comms implementation so tests can inject a channel-backed double and
/// production code can inject a hardware bridge, with identical logic
/// either way.
pub struct Coordinator<C: CommsInterface + 'static> {
    comms: Arc<C>,
    catalog: Arc<CatalogIndex>,
    world: Arc<Mutex<WorldModel>>,
    config: CoordinatorConfig,
    pattern_ids: PatternIdTable,

    blast_radius: BlastRadiusEngine,
    constraint: ConstraintEngine,
    role: RoleAssignment,

    pub objectives: Vec<SwarmObjective>,
    pub formation: FormationSpec,
    pub coverage: CoverageSpec,

    tick_count: u64,
    role_tick_counts: HashMap<DroneId, u32>,

    on_tick: Option<OnTickHook>,
    on_shutdown: Option<OnShutdownHook>,

    telemetry_task: Option<JoinHandle<()>>,
}

impl<C: CommsInterface + 'static> Coordinator<C> {
    #[must_use]
    pub fn new(comms: C, catalog: CatalogIndex, config: CoordinatorConfig) -> Self {
        let pattern_ids = PatternIdTable::build(&catalog);
        let world = WorldModel::new(config.world_model_config());
        Self {
            comms: Arc::new(comms),
            catalog: Arc::new(catalog),
            world: Arc::new(Mutex::new(world)),
            config,
            pattern_ids,
            blast_radius: BlastRadiusEngine::new(),
            constraint: ConstraintEngine::new(),
            role: RoleAssignment::new(),
            objectives: Vec::new(),
            formation: FormationSpec::default(),
            coverage: CoverageSpec::default(),
            tick_count: 0,
            role_tick_counts: HashMap::new(),
            on_tick: None,
            on_shutdown: None,
            telemetry_task: None,
        }
    }

    pub fn set_on_tick<F>(&mut self, hook: F)
    where
        F: Fn(u64, &[Assignment]) + Send + Sync + 'static,
    {
        self.on_tick = Some(Arc::new(hook));
    }

    pub fn set_on_shutdown<F>(&mut self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_shutdown = Some(Arc::new(hook));
    }

    #[must_use]
    pub fn pattern_ids(&self) -> &PatternIdTable {
        &self.pattern_ids
    }

    /// Register a drone with the world model's default initial core.
    pub async fn register_drone(
        &self,
        id: DroneId,
        hardware: HardwareTarget,
        traits: PhysicalTraits,
        initial_pattern: PatternId,
        telemetry: SensorState,
    ) {
        let mut world = self.world.lock().await;
        world.add_drone(id, hardware, traits, initial_pattern, telemetry);
    }

    /// Connect comms and start absorbing telemetry in the background.
    /// Ticking itself is driven by repeated calls to [`Coordinator::tick`]:
    /// a cooperative single-threaded loop, not a hidden timer thread.
    pub async fn start(&mut self, drone_ids: &[DroneId]) {
        self.comms.connect(drone_ids).await;

        let mut telemetry_rx = self.comms.subscribe_telemetry();
        let world = Arc::clone(&self.world);
        self.telemetry_task = Some(tokio::spawn(async move {
            loop {
                match telemetry_rx.recv().await {
                    Ok(event) => {
                        let mut world = world.lock().await;
                        world.update_telemetry(&event.drone_id, event.sensor_state);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "telemetry receiver lagged; some updates were dropped");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        }));
    }

    /// Cancel telemetry ingestion, command every active drone to land, and
    /// disconnect. Best-effort: a drone with no hover/land/grounded pattern
    /// in the catalog for its hardware is simply left alone.
    pub async fn stop(&mut self) {
        if let Some(task) = self.telemetry_task.take() {
            task.abort();
        }

        let active = {
            let world = self.world.lock().await;
            world.get_active_drone_ids()
        };
        for id in &active {
            let world = self.world.lock().await;
            let Some(drone) = world.get_drone(id) else { continue };
            let hardware = drone.core.hardware;
            let traits = drone.core.traits;
            drop(world);

            let landing = self
                .catalog
                .filter_by_core(PartialCoreKey {
                    mode: Some(BehavioralMode::Land),
                    hardware: Some(hardware),
                    traits: Some(traits),
                    ..PartialCoreKey::default()
                })
                .into_iter()
                .next()
                .or_else(|| {
                    self.catalog
                        .filter_by_core(PartialCoreKey {
                            mode: Some(BehavioralMode::Grounded),
                            hardware: Some(hardware),
                            traits: Some(traits),
                            ..PartialCoreKey::default()
                        })
                        .into_iter()
                        .next()
                });

            if let Some(pattern) = landing {
                let numeric = self.pattern_ids.numeric_of(&pattern.id).unwrap_or(u16::MAX);
                self.comms
                    .send_command(
                        id,
                        DroneCommand {
                            pattern_id: numeric,
                            target_pos: (0.0, 0.0, 0.0),
                            target_vel: (0.0, 0.0, 0.0),
                            flags: CommandFlags::EMERGENCY,
                        },
                    )
                    .await;
            }
        }

        self.comms.disconnect().await;
        if let Some(hook) = &self.on_shutdown {
            hook();
        }
    }

    /// Run one tick end to end: mark staleness, scan for forced exits,
    /// solve and apply assignments for whatever that touches, and
    /// periodically rerun role assignment. Returns every assignment applied
    /// this tick, in affected-set iteration order.
    pub async fn tick(&mut self) -> Vec<Assignment> {
        self.tick_count += 1;
        let mut world = self.world.lock().await;

        world.mark_stale_drones();

        let changed = self.scan_forced_exits(&world);

        let mut all_assignments = Vec::new();

        // Literal §4.6 step 3: blast radius + solve only run when something
        // forced an exit this tick. A healthy, unchanged drone therefore
        // contributes no assignment at all rather than a same-id one; see
        // DESIGN.md's Open Question 4 for why this reading was chosen over
        // the scenario prose's "produces an assignment ... with the same
        // pattern id".
        if !changed.is_empty() {
            let affected = self.blast_radius.cascade(&world, &changed, None);
            let ordered = order_by_registration(&world, &affected);
            let assignments = self.constraint.solve(&world, &self.catalog, &ordered, &self.objectives);
            self.apply_assignments(&mut world, &assignments).await;
            all_assignments.extend(assignments);
        }

        if self.config.role_reassignment_interval_ticks > 0
            && self.tick_count % self.config.role_reassignment_interval_ticks == 0
        {
            // A free function, not a method: `world` is a guard borrowed from
            // `self.world`, and a `&mut self` method call here would collide
            // with that live borrow. Passing each field it needs explicitly
            // keeps the borrows disjoint.
            let role_assignments = run_role_cycle(
                &self.role,
                &self.blast_radius,
                &self.constraint,
                &self.catalog,
                self.comms.as_ref(),
                &self.pattern_ids,
                &self.config,
                &self.formation,
                &self.coverage,
                &self.objectives,
                &mut world,
                &mut self.role_tick_counts,
            )
            .await;
            all_assignments.extend(role_assignments);
        }

        drop(world);

        if let Some(hook) = &self.on_tick {
            hook(self.tick_count, &all_assignments);
        }

        all_assignments
    }

    fn scan_forced_exits(&self, world: &WorldModel) -> Vec<DroneId> {
        let mut changed = Vec::new();
        for id in world.get_active_drone_ids() {
            let Some(drone) = world.get_drone(&id) else { continue };
            if drone.current_pattern.is_empty() {
                continue;
            }
            let Some(pattern) = self.catalog.lookup(&drone.current_pattern) else {
                continue;
            };
            let battery = drone.telemetry.battery.percentage;
            let position_quality = drone.telemetry.position_quality;
            if pattern
                .postconditions
                .forced_exits
                .iter()
                .any(|fe| fe.condition.evaluate(battery, position_quality))
            {
                changed.push(id);
            }
        }
        changed
    }

    async fn apply_assignments(&self, world: &mut WorldModel, assignments: &[Assignment]) {
        apply_assignments(&self.catalog, self.comms.as_ref(), &self.pattern_ids, world, assignments).await;
    }
}

/// Re-run role assignment, apply any resulting structural change through
/// the constraint engine, and update per-drone hysteresis counters. Takes
/// every collaborator as an explicit argument rather than as a `Coordinator`
/// method so it can run while a lock guard borrowed from `Coordinator::world`
/// is still held.
#[allow(clippy::too_many_arguments)]
async fn run_role_cycle<C: CommsInterface>(
    role: &RoleAssignment,
    blast_radius: &BlastRadiusEngine,
    constraint: &ConstraintEngine,
    catalog: &CatalogIndex,
    comms: &C,
    pattern_ids: &PatternIdTable,
    config: &CoordinatorConfig,
    formation: &FormationSpec,
    coverage: &CoverageSpec,
    objectives: &[SwarmObjective],
    world: &mut WorldModel,
    role_tick_counts: &mut HashMap<DroneId, u32>,
) -> Vec<Assignment> {
    let active = world.get_active_drone_ids();
    let role_config = RoleConfig {
        battery_charge_threshold: config.battery_charge_threshold,
        battery_return_threshold: config.battery_return_threshold,
        role_hysteresis_ticks: config.role_hysteresis_ticks,
    };
    let role_changes = role.assign(world, &active, formation, coverage, &role_config, Some(role_tick_counts));

    let mut assignments = Vec::new();
    if !role_changes.is_empty() {
        let changed_ids: Vec<DroneId> = role_changes.keys().cloned().collect();
        let affected = blast_radius.cascade(world, &changed_ids, None);

        for (id, new_role) in &role_changes {
            let Some(drone) = world.get_drone(id) else { continue };
            let new_core = drone.core.with_role(*new_role);
            let pattern_id = drone.current_pattern.clone();
            world.update_pattern(id, pattern_id, new_core);
        }

        let ordered = order_by_registration(world, &affected);
        assignments = constraint.solve(world, catalog, &ordered, objectives);
        apply_assignments(catalog, comms, pattern_ids, world, &assignments).await;
    }

    for id in &active {
        *role_tick_counts.entry(id.clone()).or_insert(0) += 1;
    }
    for id in role_changes.keys() {
        role_tick_counts.insert(id.clone(), 0);
    }

    assignments
}

async fn apply_assignments<C: CommsInterface>(
    catalog: &CatalogIndex,
    comms: &C,
    pattern_ids: &PatternIdTable,
    world: &mut WorldModel,
    assignments: &[Assignment],
) {
    for assignment in assignments {
        let Some(pattern) = catalog.lookup(&assignment.pattern_id) else {
            tracing::warn!(
                drone_id = %assignment.drone_id,
                pattern_id = %assignment.pattern_id,
                "assignment references a pattern absent from the catalog; drone retains its last core"
            );
            continue;
        };
        world.update_pattern(&assignment.drone_id, assignment.pattern_id.clone(), pattern.core);

        let numeric_id = pattern_ids.numeric_of(&assignment.pattern_id).unwrap_or(u16::MAX);
        let (target_pos, target_vel) = (
            assignment.target_pos.map_or((0.0, 0.0, 0.0), |v| (v.x, v.y, v.z)),
            assignment.target_vel.map_or((0.0, 0.0, 0.0), |v| (v.x, v.y, v.z)),
        );
        comms
            .send_command(
                &assignment.drone_id,
                DroneCommand {
                    pattern_id: numeric_id,
                    target_pos,
                    target_vel,
                    flags: CommandFlags(0),
                },
            )
            .await;
    }
}

/// Order an arbitrary id set by world-model registration order, giving the
/// constraint engine the deterministic iteration order it documents
/// (insertion order).
fn order_by_registration(world: &WorldModel, ids: &HashSet<DroneId>) -> Vec<DroneId> {
    world
        .all_drone_ids()
        .iter()
        .filter(|id| ids.contains(*id))
        .cloned()
        .collect()
}
