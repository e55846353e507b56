//! Task lifecycle notifications.

use sf_core::Task;

/// Why a task left a plane's task list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemovalReason {
    /// The plane reached the task and serviced it.
    Completed,
    /// Ownership was transferred to another plane.
    HandedOff,
    /// The task outlived its deadline.
    Expired,
}

impl RemovalReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RemovalReason::Completed => "completed",
            RemovalReason::HandedOff => "handed_off",
            RemovalReason::Expired   => "expired",
        }
    }
}

/// A change to one plane's task list.
///
/// Recorded by [`PlaneState`][crate::PlaneState] on every mutation and
/// drained by the behavior runtime, which fans each event out to every
/// attached behavior before the next hook runs.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskEvent {
    Added(Task),
    Removed { task: Task, reason: RemovalReason },
}

impl TaskEvent {
    pub fn task(&self) -> &Task {
        match self {
            TaskEvent::Added(task)          => task,
            TaskEvent::Removed { task, .. } => task,
        }
    }
}
