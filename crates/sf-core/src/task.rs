//! Spatially-located work items.

use crate::{Point, TaskId, Tick};

/// A task waiting to be serviced by whichever plane owns it.
///
/// `Task` is plain immutable data; ownership is expressed by which plane's
/// task list holds it, never by a field on the task.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub id:       TaskId,
    pub location: Point,
    pub created:  Tick,
}

impl Task {
    #[inline]
    pub fn new(id: TaskId, location: Point, created: Tick) -> Self {
        Self { id, location, created }
    }

    /// Ticks since creation at `now`.
    #[inline]
    pub fn age(&self, now: Tick) -> u64 {
        now.since(self.created)
    }
}
