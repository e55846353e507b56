//! Factor-graph nodes and the min-sum message rules.
//!
//! Every edge joins one plane's workload node `W_P` to one task's selector
//! node `S_T` and stands for the binary variable "P does T".  All messages are
//! cost differences `cost(x = 1) - cost(x = 0)` for that variable, so negative
//! means "P should do T".
//!
//! - `W_P → S_T` is P's marginal cost of doing T: the edge potential `c(P, T)`,
//!   plus, when T belongs to another plane, how much worse P's best set of
//!   other claims gets once T is claimed too.  Claiming `n` foreign tasks in
//!   one cycle costs `k·n(n-1)/2` on top of the potentials; keeping a task P
//!   already owns is not a claim, its workload is already in the potential.
//! - `S_T → W_P` is minus the best alternative: `-min_{P' != P} m(P')`, where
//!   `m(P')` is the last belief from `W_P'` or, before one arrives, the edge
//!   potential.  Exactly one plane must do T, so P doing it saves the best
//!   other plane's cost.
//!
//! `select()` on a selector returns `argmin m(P)`.  Moving a task between two
//! planes whose loads differ by one leaves the summed penalty unchanged, so
//! such a task ties; the decision step breaks those ties toward the plane
//! holding fewer tasks.

use std::collections::BTreeMap;

use sf_core::{FactorId, PlaneId, Task};

/// Values within this distance of the minimum count as tied.
pub const TIE_EPSILON: f64 = 1e-9;

/// One side of an edge as seen by the node hosting it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    /// Workload-adjusted cost of the edge's plane doing the edge's task.
    pub potential: f64,
    /// Last value received from the node on the other end, this cycle.
    pub belief:    Option<f64>,
}

impl Edge {
    pub fn new(potential: f64) -> Self {
        Self { potential, belief: None }
    }

    /// Best current estimate of the plane's cost: its belief if one has
    /// arrived, the potential otherwise.
    #[inline]
    pub fn estimate(&self) -> f64 {
        self.belief.unwrap_or(self.potential)
    }
}

// ── WorkloadNode ──────────────────────────────────────────────────────────────

/// A plane's workload node, linked to the selectors of every task it could take.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkloadNode {
    id:        FactorId,
    /// Keyed by selector id.
    pub edges: BTreeMap<FactorId, Edge>,
}

impl WorkloadNode {
    pub fn new(plane: PlaneId) -> Self {
        Self { id: FactorId::workload(plane), edges: BTreeMap::new() }
    }

    #[inline]
    pub fn id(&self) -> FactorId {
        self.id
    }

    /// Outgoing message to selector `to`, or `None` if `to` is not a neighbor.
    pub fn message_to(&self, to: FactorId, weight: f64) -> Option<f64> {
        let edge = self.edges.get(&to)?;
        let me = self.id.plane;
        if to.plane == me {
            return Some(edge.potential);
        }
        let mut scores: Vec<f64> = self
            .edges
            .iter()
            .filter(|&(&id, _)| id != to && id.plane != me)
            .map(|(_, e)| e.potential + e.belief.unwrap_or(0.0))
            .collect();
        scores.sort_by(f64::total_cmp);

        let with = best_claim(&scores, weight, 1);
        let without = best_claim(&scores, weight, 0);
        Some(edge.potential + (with - without))
    }
}

/// Cheapest total over a prefix of `scores` (ascending) given `held` foreign
/// tasks already claimed.  Claiming the `n`-th task costs `k·(n-1)` extra, so
/// increments only grow and the greedy prefix is optimal.
fn best_claim(scores: &[f64], weight: f64, held: usize) -> f64 {
    let mut total = 0.0;
    let mut n = held;
    for &s in scores {
        let inc = s + weight * n as f64;
        if inc >= 0.0 {
            break;
        }
        total += inc;
        n += 1;
    }
    total
}

// ── SelectorNode ──────────────────────────────────────────────────────────────

/// The selector of one task, hosted by the task's owner.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectorNode {
    id:        FactorId,
    task:      Task,
    /// Keyed by workload id.
    pub edges: BTreeMap<FactorId, Edge>,
}

impl SelectorNode {
    pub fn new(owner: PlaneId, task: Task) -> Self {
        Self { id: FactorId::selector(owner, task.id), task, edges: BTreeMap::new() }
    }

    #[inline]
    pub fn id(&self) -> FactorId {
        self.id
    }

    #[inline]
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Outgoing message to workload node `to`, or `None` if `to` is not a
    /// neighbor.  Zero when `to` is the only candidate.
    pub fn message_to(&self, to: FactorId) -> Option<f64> {
        self.edges.get(&to)?;
        let best_other = self
            .edges
            .iter()
            .filter(|&(&id, _)| id != to)
            .map(|(_, e)| e.estimate())
            .min_by(f64::total_cmp);
        Some(best_other.map_or(0.0, |m| -m))
    }

    /// The plane that should do this task.
    ///
    /// Ties within [`TIE_EPSILON`] go to the current owner, then to the lowest
    /// plane id.  `None` only when the selector has no neighbors at all.
    pub fn select(&self) -> Option<PlaneId> {
        self.select_by(|_| 0.0)
    }

    /// Like [`select`](Self::select), but tied candidates are first narrowed
    /// to those with the lowest `penalty`; owner and plane id only break what
    /// is left.
    pub fn select_by(&self, penalty: impl Fn(PlaneId) -> f64) -> Option<PlaneId> {
        let best = self.edges.values().map(Edge::estimate).min_by(f64::total_cmp)?;
        let tied: Vec<(PlaneId, f64)> = self
            .edges
            .iter()
            .filter(|(_, e)| e.estimate() <= best + TIE_EPSILON)
            .map(|(id, _)| (id.plane, penalty(id.plane)))
            .collect();
        let lightest = tied.iter().map(|&(_, p)| p).min_by(f64::total_cmp)?;

        let owner = self.id.plane;
        let mut left = tied
            .iter()
            .filter(|&&(_, p)| p <= lightest + TIE_EPSILON)
            .map(|&(plane, _)| plane);
        let first = left.next()?;
        if first == owner || left.any(|p| p == owner) {
            Some(owner)
        } else {
            Some(first)
        }
    }
}
