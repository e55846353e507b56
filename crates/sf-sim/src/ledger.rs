//! Fleet-wide task statistics.
//!
//! Bookkeeping only: ownership itself lives in the planes' task lists, and
//! nothing in the protocol reads the ledger.

use sf_agent::{RemovalReason, TaskEvent};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskLedger {
    /// Tasks created through [`Sim::spawn_task`][crate::Sim::spawn_task].
    pub spawned:    u64,
    pub completed:  u64,
    pub expired:    u64,
    /// Hand-offs sent (the sending plane dropped the task).
    pub handed_off: u64,
    /// Task additions on any plane: spawns, hand-off receipts and bounces.
    pub acquired:   u64,
    /// Hand-offs the channel bounced back to their sender.
    pub returned:   u64,
}

impl TaskLedger {
    pub fn record(&mut self, event: &TaskEvent) {
        match event {
            TaskEvent::Added(_) => self.acquired += 1,
            TaskEvent::Removed { reason, .. } => match reason {
                RemovalReason::Completed => self.completed += 1,
                RemovalReason::HandedOff => self.handed_off += 1,
                RemovalReason::Expired   => self.expired += 1,
            },
        }
    }

    /// Tasks that still exist somewhere: owned or in flight.
    pub fn live(&self) -> u64 {
        self.spawned.saturating_sub(self.completed + self.expired)
    }
}
