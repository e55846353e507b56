//! Kahn's algorithm over the behavior dependency graph.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// The graph contains at least one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleError;

/// Topologically sort nodes `0..node_count` given `(parent, child)` edges.
///
/// Ready nodes are taken smallest-index first, so among all valid orders the
/// one closest to index order wins.  Since behavior handles are assigned in
/// attach order, an acyclic set runs in attach order unless its declared
/// dependencies force otherwise.
///
/// A self-edge `(n, n)` counts as a cycle.
pub fn topological_sort(node_count: usize, edges: &[(usize, usize)]) -> Result<Vec<usize>, CycleError> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut in_degree = vec![0usize; node_count];

    // 1. Build adjacency list and in-degree counts from edges.
    for &(parent, child) in edges {
        if parent >= node_count || child >= node_count {
            continue;
        }
        children[parent].push(child);
        in_degree[child] += 1;
    }

    // 2. Seed the heap with every root.
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(n, _)| Reverse(n))
        .collect();

    // 3. Drain.
    let mut sorted = Vec::with_capacity(node_count);
    while let Some(Reverse(node)) = ready.pop() {
        sorted.push(node);
        for &child in &children[node] {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                ready.push(Reverse(child));
            }
        }
    }

    // 4. Anything left unsorted sits on a cycle.
    if sorted.len() == node_count {
        Ok(sorted)
    } else {
        Err(CycleError)
    }
}
