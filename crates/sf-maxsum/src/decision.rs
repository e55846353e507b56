//! Turning selector decisions into hand-offs.

use std::collections::BTreeMap;

use sf_core::{PlaneId, Task};

use crate::{FactorGraph, FleetView};

/// A task the hosting plane should give away.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HandOff {
    pub task: Task,
    pub to:   PlaneId,
}

/// Ask every selector for its pick; list the ones that are not the host.
///
/// Selectors are visited in task id order.  Tied picks go to the candidate
/// with the smallest workload penalty, `weight` per task held, where the
/// host's earlier hand-offs in the same call already count as moved.  With a
/// zero weight every tie stays with the owner.
///
/// Only the host evaluates its own selectors, so across the fleet each task
/// appears in at most one list per call.  An inactive graph decides nothing.
pub fn decide(graph: &FactorGraph, fleet: FleetView<'_>, weight: f64) -> Vec<HandOff> {
    if !graph.is_active() {
        return Vec::new();
    }
    let me = graph.plane();
    let mut moved: BTreeMap<PlaneId, i64> = BTreeMap::new();
    let mut out = Vec::new();

    for node in graph.selectors() {
        let penalty = |p: PlaneId| match fleet.get(p) {
            Some(state) => {
                let held = state.task_count() as i64 + moved.get(&p).copied().unwrap_or(0);
                weight * held as f64
            }
            None => f64::INFINITY,
        };
        let Some(to) = node.select_by(penalty) else { continue };
        if to == me {
            continue;
        }
        *moved.entry(me).or_default() -= 1;
        *moved.entry(to).or_default() += 1;
        out.push(HandOff { task: *node.task(), to });
    }
    out
}
