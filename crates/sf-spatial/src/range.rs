//! Fixed-radius queries over plane positions.
//!
//! # Snapshot semantics
//!
//! The index is built from positions at one instant (the start of a tick)
//! and never updated.  Planes move during the tick, but every range check in
//! that tick is made against the snapshot, so delivery does not depend on
//! which planes happened to have moved already.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use sf_agent::PlaneState;
use sf_core::{PlaneId, Point};

/// R-tree entry: a plane id at a fixed position.
#[derive(Clone, Copy, Debug)]
struct PlaneEntry {
    point: [f64; 2],
    id:    PlaneId,
}

impl RTreeObject for PlaneEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PlaneEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Positions of every plane at one instant.
pub struct RangeIndex {
    tree:      RTree<PlaneEntry>,
    /// Snapshot position by `PlaneId` index.
    positions: Vec<Point>,
}

impl RangeIndex {
    /// Snapshot `planes`.  Planes must be indexed by their id, as the world
    /// stores them.
    pub fn snapshot(planes: &[PlaneState]) -> Self {
        let entries = planes
            .iter()
            .map(|p| PlaneEntry { point: p.position.to_array(), id: p.id })
            .collect();
        Self {
            tree:      RTree::bulk_load(entries),
            positions: planes.iter().map(|p| p.position).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Snapshot position of `plane`.
    pub fn position(&self, plane: PlaneId) -> Option<Point> {
        self.positions.get(plane.index()).copied()
    }

    /// Every plane within `range` of `center` (boundary inclusive), sorted by
    /// id.
    pub fn within(&self, center: Point, range: f64) -> Vec<PlaneId> {
        if range.is_nan() || range < 0.0 {
            return Vec::new();
        }
        let mut ids: Vec<PlaneId> = self
            .tree
            .locate_within_distance(center.to_array(), range * range)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Whether `to` was within `range` of `from` at snapshot time.
    pub fn in_range(&self, from: PlaneId, to: PlaneId, range: f64) -> bool {
        match (self.position(from), self.position(to)) {
            (Some(a), Some(b)) => a.within(b, range),
            _ => false,
        }
    }
}
