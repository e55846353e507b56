//! One round of belief propagation.

use sf_behavior::Belief;

use crate::FactorGraph;

/// Every outgoing belief of every node in `graph`, in a deterministic order:
/// the workload node's first, then each selector's by task id, each node's
/// messages by recipient id.
///
/// An inactive graph produces nothing.
pub fn run_round(graph: &FactorGraph, weight: f64) -> Vec<Belief> {
    if !graph.is_active() {
        return Vec::new();
    }
    let mut out = Vec::new();

    let workload = graph.workload();
    for &to in workload.edges.keys() {
        if let Some(value) = workload.message_to(to, weight) {
            out.push(Belief { from: workload.id(), to, value });
        }
    }

    for node in graph.selectors() {
        for &to in node.edges.keys() {
            if let Some(value) = node.message_to(to) {
                out.push(Belief { from: node.id(), to, value });
            }
        }
    }
    out
}
