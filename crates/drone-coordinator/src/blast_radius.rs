//! Blast-radius computation: which drones must be re-evaluated after one or
//! more drones change structurally.

use std::collections::HashSet;

use drone_domain::{DroneId, FormationRole};
use drone_worldmodel::WorldModel;

/// Stateless computation over a [`WorldModel`] snapshot. Holds nothing of
/// its own; every call takes the world model it should read.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlastRadiusEngine;

impl BlastRadiusEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// `{i} ∪ ε(i).neighbors ∪ role_dependents(i)`. A drone missing from the
    /// world model degrades to `{i}` — still includes self.
    #[must_use]
    pub fn single(&self, world: &WorldModel, id: &str) -> HashSet<DroneId> {
        let mut affected = HashSet::new();
        affected.insert(id.to_string());

        let Some(drone) = world.get_drone(id) else {
            return affected;
        };
        let graph = &drone.neighbors;

        affected.extend(graph.neighbors.iter().cloned());

        match drone.core.role {
            FormationRole::Leader => affected.extend(graph.followers.iter().cloned()),
            FormationRole::Follower => {
                if let Some(leader) = &graph.leader {
                    affected.insert(leader.clone());
                }
            }
            FormationRole::Relay => {
                if let Some(target) = &graph.relay_target {
                    affected.insert(target.clone());
                }
            }
            _ => {}
        }
        if let Some(source) = &graph.relay_source {
            affected.insert(source.clone());
        }

        affected
    }

    /// Cascading blast radius over an initial changed set, bounded to O(N)
    /// predicate evaluations by the evaluated/frontier discipline: each
    /// drone enters `evaluated` at most once.
    #[must_use]
    pub fn cascade(
        &self,
        world: &WorldModel,
        changed: &[DroneId],
        would_change_pattern: Option<&dyn Fn(&str) -> bool>,
    ) -> HashSet<DroneId> {
        let mut affected: HashSet<DroneId> = HashSet::new();
        for id in changed {
            affected.extend(self.single(world, id));
        }

        let Some(predicate) = would_change_pattern else {
            return affected;
        };

        let mut evaluated: HashSet<DroneId> = changed.iter().cloned().collect();
        let mut frontier: Vec<DroneId> = affected.difference(&evaluated).cloned().collect();

        while !frontier.is_empty() {
            let mut next_frontier: Vec<DroneId> = Vec::new();
            for j in &frontier {
                if evaluated.contains(j) {
                    continue;
                }
                evaluated.insert(j.clone());
                if predicate(j) {
                    let blast = self.single(world, j);
                    for candidate in blast {
                        let inserted = affected.insert(candidate.clone());
                        if inserted && !evaluated.contains(&candidate) && !next_frontier.contains(&candidate) {
                            next_frontier.push(candidate);
                        }
                    }
                }
            }
            frontier = next_frontier;
        }

        affected
    }
}
