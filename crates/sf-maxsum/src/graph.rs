//! `FactorGraph` — the nodes one plane hosts, and how they are wired.

use std::collections::{BTreeMap, BTreeSet};

use sf_agent::{PlaneState, TrustedRead};
use sf_behavior::Belief;
use sf_core::{FactorId, PlaneId, Task, TaskId};

use crate::{CostFunction, Edge, SelectorNode, WorkloadNode};

/// Costs beyond this are clamped so message arithmetic stays finite.
const MAX_COST: f64 = 1e12;

fn sanitize(cost: f64) -> f64 {
    if cost.is_nan() { MAX_COST } else { cost.clamp(-MAX_COST, MAX_COST) }
}

/// Read access to the hosting plane and, through the trusted channel, to
/// every other plane.
#[derive(Copy, Clone)]
pub struct FleetView<'a> {
    pub me:    &'a PlaneState,
    pub peers: &'a dyn TrustedRead,
}

impl<'a> FleetView<'a> {
    pub fn new(me: &'a PlaneState, peers: &'a dyn TrustedRead) -> Self {
        Self { me, peers }
    }

    pub fn get(&self, plane: PlaneId) -> Option<&'a PlaneState> {
        if plane == self.me.id { Some(self.me) } else { self.peers.peer(plane) }
    }
}

/// Outcome of offering an inbound belief to the graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BeliefIntake {
    Stored,
    /// The graph is sitting this cycle out.
    Inactive,
    /// No local node has that id.
    UnknownNode,
    /// The local node exists but is not linked to the sender this cycle.
    StaleEdge,
}

/// Every node hosted by one plane.
///
/// # Invariants
///
/// - `selectors` holds exactly the tasks the plane owns: callers add and
///   remove selectors from the task lifecycle hooks.
/// - After [`rebuild`](Self::rebuild) every edge set is exactly the one
///   derived from that cycle's confirmed neighbors.  Edges to a fresh
///   selector are the only ones added mid-cycle, and only to the plane's own
///   workload node.
/// - Every own selector is linked to the own workload node in both
///   directions.
#[derive(Clone, Debug, PartialEq)]
pub struct FactorGraph {
    me:        PlaneId,
    workload:  WorkloadNode,
    selectors: BTreeMap<TaskId, SelectorNode>,
    active:    bool,
}

impl FactorGraph {
    pub fn new(me: PlaneId) -> Self {
        Self {
            me,
            workload:  WorkloadNode::new(me),
            selectors: BTreeMap::new(),
            active:    false,
        }
    }

    #[inline]
    pub fn plane(&self) -> PlaneId {
        self.me
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn workload(&self) -> &WorkloadNode {
        &self.workload
    }

    pub fn selector(&self, task: TaskId) -> Option<&SelectorNode> {
        self.selectors.get(&task)
    }

    pub fn selectors(&self) -> impl Iterator<Item = &SelectorNode> + '_ {
        self.selectors.values()
    }

    // ── Task lifecycle ────────────────────────────────────────────────────

    /// Create the selector for a task this plane just acquired, linked to the
    /// plane's own workload node.
    pub fn add_selector(&mut self, task: Task, me: &PlaneState, cost: &dyn CostFunction) {
        let c = sanitize(cost.cost(me, &task));
        let mut node = SelectorNode::new(self.me, task);
        node.edges.insert(self.workload.id(), Edge::new(c));
        self.workload.edges.insert(node.id(), Edge::new(c));
        self.selectors.insert(task.id, node);
    }

    /// Destroy the selector of a task this plane no longer owns, and the
    /// workload edge into it.
    pub fn remove_selector(&mut self, task: TaskId) -> Option<SelectorNode> {
        let node = self.selectors.remove(&task)?;
        self.workload.edges.remove(&node.id());
        Some(node)
    }

    // ── Topology ──────────────────────────────────────────────────────────

    /// Rewire every local node from scratch against `confirmed`.
    ///
    /// The hosting plane always takes part, listed in `confirmed` or not.
    /// Returns whether the graph is active for the cycle.
    pub fn rebuild(
        &mut self,
        confirmed: &BTreeSet<PlaneId>,
        fleet:     FleetView<'_>,
        cost:      &dyn CostFunction,
    ) -> bool {
        self.workload.edges.clear();
        for node in self.selectors.values_mut() {
            node.edges.clear();
        }

        let planes: BTreeSet<PlaneId> = confirmed.iter().copied().chain([self.me]).collect();
        let mut visible = 0usize;
        for &p in &planes {
            let Some(state) = fleet.get(p) else { continue };
            for task in state.tasks() {
                let c = sanitize(cost.cost(fleet.me, task));
                self.workload.edges.insert(FactorId::selector(p, task.id), Edge::new(c));
            }
            visible += state.task_count();

            for node in self.selectors.values_mut() {
                let c = sanitize(cost.cost(state, node.task()));
                node.edges.insert(FactorId::workload(p), Edge::new(c));
            }
        }

        self.active = planes.len() >= 2 && visible > 0;
        self.active
    }

    /// Recompute every edge potential from current plane states.
    ///
    /// Edges whose plane has vanished, or whose task has changed hands since
    /// the rebuild, keep their previous potential.
    pub fn refresh_potentials(&mut self, fleet: FleetView<'_>, cost: &dyn CostFunction) {
        for (id, edge) in self.workload.edges.iter_mut() {
            let Some(task) = id.task else { continue };
            if let Some(t) = fleet.get(id.plane).and_then(|owner| owner.task(task)) {
                edge.potential = sanitize(cost.cost(fleet.me, t));
            }
        }
        for node in self.selectors.values_mut() {
            let task = *node.task();
            for (id, edge) in node.edges.iter_mut() {
                if let Some(state) = fleet.get(id.plane) {
                    edge.potential = sanitize(cost.cost(state, &task));
                }
            }
        }
    }

    /// Deactivate until the next rebuild.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    // ── Beliefs ───────────────────────────────────────────────────────────

    /// Store an inbound belief, overwriting any earlier one from the same
    /// sender.
    pub fn receive(&mut self, belief: &Belief) -> BeliefIntake {
        if !self.active {
            return BeliefIntake::Inactive;
        }
        if belief.to.plane != self.me {
            return BeliefIntake::UnknownNode;
        }
        let edges = match belief.to.task {
            None => &mut self.workload.edges,
            Some(task) => match self.selectors.get_mut(&task) {
                Some(node) => &mut node.edges,
                None => return BeliefIntake::UnknownNode,
            },
        };
        match edges.get_mut(&belief.from) {
            Some(edge) => {
                edge.belief = Some(sanitize(belief.value));
                BeliefIntake::Stored
            }
            None => BeliefIntake::StaleEdge,
        }
    }
}
