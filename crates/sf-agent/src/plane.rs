//! The mutable state of a single plane.

use sf_core::{PlaneId, Point, Task, TaskId};

use crate::{RemovalReason, TaskEvent};

/// Construction parameters for one plane.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaneSpec {
    pub position:   Point,
    /// Communication range in metres.
    pub comm_range: f64,
    /// Distance covered per tick in metres.
    pub speed:      f64,
}

impl PlaneSpec {
    pub fn new(position: Point, comm_range: f64, speed: f64) -> Self {
        Self { position, comm_range, speed }
    }
}

/// Everything a plane knows about itself.
///
/// The task list keeps insertion order; every mutation goes through
/// [`add_task`](Self::add_task) / [`remove_task`](Self::remove_task) so that a
/// matching [`TaskEvent`] is queued for the plane's behaviors.
#[derive(Debug, Clone)]
pub struct PlaneState {
    pub id:         PlaneId,
    pub position:   Point,
    pub comm_range: f64,
    pub speed:      f64,

    /// Task the plane is currently flying towards, if any.
    pub target: Option<TaskId>,

    tasks:  Vec<Task>,
    events: Vec<TaskEvent>,
}

impl PlaneState {
    pub fn new(id: PlaneId, spec: PlaneSpec) -> Self {
        Self {
            id,
            position:   spec.position,
            comm_range: spec.comm_range,
            speed:      spec.speed,
            target:     None,
            tasks:      Vec::new(),
            events:     Vec::new(),
        }
    }

    // ── Task list ─────────────────────────────────────────────────────────

    /// Owned tasks in the order they were acquired.
    #[inline]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[inline]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn owns(&self, task: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == task)
    }

    pub fn task(&self, task: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task)
    }

    /// Take ownership of `task`.
    ///
    /// Returns `false` (and records nothing) if the task is already owned.
    pub fn add_task(&mut self, task: Task) -> bool {
        if self.owns(task.id) {
            return false;
        }
        self.tasks.push(task);
        self.events.push(TaskEvent::Added(task));
        true
    }

    /// Give up ownership of `task`.  Returns the removed task, or `None` if it
    /// was not owned.
    pub fn remove_task(&mut self, task: TaskId, reason: RemovalReason) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == task)?;
        let removed = self.tasks.remove(pos);
        if self.target == Some(task) {
            self.target = None;
        }
        self.events.push(TaskEvent::Removed { task: removed, reason });
        Some(removed)
    }

    /// The owned task closest to the plane's current position.
    ///
    /// Ties go to the task acquired first.
    pub fn nearest_task(&self) -> Option<&Task> {
        let here = self.position;
        self.tasks.iter().fold(None, |best: Option<&Task>, t| match best {
            Some(b) if b.location.distance_sq(here) <= t.location.distance_sq(here) => Some(b),
            _ => Some(t),
        })
    }

    // ── Lifecycle events ──────────────────────────────────────────────────

    #[inline]
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Remove and return all task events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<TaskEvent> {
        std::mem::take(&mut self.events)
    }
}
