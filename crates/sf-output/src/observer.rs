//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use sf_agent::PlaneState;
use sf_core::Tick;
use sf_sim::{SimObserver, TickStats};

use crate::row::{PlaneSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes plane snapshots and tick summaries to any
/// [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:        W,
    last_error:    Option<OutputError>,
    snapshot_rows: u64,
    summary_rows:  u64,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None, snapshot_rows: 0, summary_rows: 0 }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Snapshot rows handed to the writer so far.
    pub fn snapshot_rows(&self) -> u64 {
        self.snapshot_rows
    }

    /// Summary rows handed to the writer so far.
    pub fn summary_rows(&self) -> u64 {
        self.summary_rows
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, _tick: Tick, stats: &TickStats) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from_stats(stats));
        self.summary_rows += 1;
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, planes: &[PlaneState]) {
        if planes.is_empty() {
            return;
        }
        let rows: Vec<PlaneSnapshotRow> =
            planes.iter().map(|p| PlaneSnapshotRow::from_plane(tick, p)).collect();
        let result = self.writer.write_snapshots(&rows);
        self.snapshot_rows += rows.len() as u64;
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
