//! Simulation observer trait for progress reporting and data collection.

use sf_agent::PlaneState;
use sf_core::Tick;

use crate::{RouteStats, TaskLedger};

/// Summary of one tick, handed to [`SimObserver::on_tick_end`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickStats {
    pub tick:        Tick,
    /// Tasks held by some plane at the end of the tick.
    pub owned_tasks: usize,
    /// Tasks inside undelivered hand-offs at the end of the tick.
    pub in_flight:   usize,
    /// Messages no behavior handled.
    pub unhandled:   usize,
    pub routing:     RouteStats,
    /// Running totals after this tick.
    pub ledger:      TaskLedger,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Called every `config.snapshot_interval_ticks` ticks with every plane's
    /// state, in registration order.
    fn on_snapshot(&mut self, _tick: Tick, _planes: &[PlaneState]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
