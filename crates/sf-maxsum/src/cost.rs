//! Pluggable per-plane cost of doing a task.

use sf_agent::PlaneState;
use sf_core::{PlaneId, Task};

/// Cost for `plane` to take on `task`.  Lower is better.
///
/// Implementations must be deterministic and return finite, non-negative
/// values.  `plane` may or may not currently own `task`.
pub trait CostFunction: Send + 'static {
    fn cost(&self, plane: &PlaneState, task: &Task) -> f64;
}

/// Straight-line distance plus `weight` per other task the plane holds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorkloadCost {
    pub weight: f64,
}

impl WorkloadCost {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl CostFunction for WorkloadCost {
    fn cost(&self, plane: &PlaneState, task: &Task) -> f64 {
        let others = plane.tasks().iter().filter(|t| t.id != task.id).count();
        plane.position.distance(task.location) + self.weight * others as f64
    }
}

/// Builds the cost function each plane runs with.
pub trait CostFactory {
    fn make(&self, plane: PlaneId) -> Box<dyn CostFunction>;
}

impl<F> CostFactory for F
where
    F: Fn(PlaneId) -> Box<dyn CostFunction>,
{
    fn make(&self, plane: PlaneId) -> Box<dyn CostFunction> {
        self(plane)
    }
}

impl CostFactory for WorkloadCost {
    fn make(&self, _plane: PlaneId) -> Box<dyn CostFunction> {
        Box::new(*self)
    }
}
