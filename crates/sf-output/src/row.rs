//! Plain data row types written by output backends.

use sf_agent::PlaneState;
use sf_core::{TaskId, Tick};
use sf_sim::TickStats;

/// One plane's state at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSnapshotRow {
    pub plane_id:   u32,
    pub tick:       u64,
    pub x:          f64,
    pub y:          f64,
    pub task_count: u32,
    /// Task the plane is flying towards; `u32::MAX` when idle.
    pub target:     u32,
}

impl PlaneSnapshotRow {
    pub fn from_plane(tick: Tick, plane: &PlaneState) -> Self {
        Self {
            plane_id:   plane.id.0,
            tick:       tick.0,
            x:          plane.position.x,
            y:          plane.position.y,
            task_count: u32::try_from(plane.task_count()).unwrap_or(u32::MAX),
            target:     plane.target.unwrap_or(TaskId::INVALID).0,
        }
    }
}

/// Fleet-wide figures for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:       u64,
    pub owned:      u64,
    pub in_flight:  u64,
    pub sent:       u64,
    pub delivered:  u64,
    pub dropped:    u64,
    pub beliefs:    u64,
    pub handoffs:   u64,
    pub returned:   u64,
    pub spawned:    u64,
    pub completed:  u64,
    pub expired:    u64,
}

impl TickSummaryRow {
    pub fn from_stats(stats: &TickStats) -> Self {
        Self {
            tick:      stats.tick.0,
            owned:     stats.owned_tasks as u64,
            in_flight: stats.in_flight as u64,
            sent:      stats.routing.sent,
            delivered: stats.routing.delivered,
            dropped:   stats.routing.dropped,
            beliefs:   stats.routing.beliefs,
            handoffs:  stats.routing.handoffs,
            returned:  stats.routing.returned,
            spawned:   stats.ledger.spawned,
            completed: stats.ledger.completed,
            expired:   stats.ledger.expired,
        }
    }
}
