//! The `OutputWriter` trait implemented by all writers.

use crate::{OutputResult, PlaneSnapshotRow, TickSummaryRow};

/// Sink for simulation rows.
///
/// Errors are stored by [`SimOutputObserver`][crate::SimOutputObserver] and
/// retrieved with its `take_error`, since observer hooks return nothing.
pub trait OutputWriter {
    /// Write a batch of plane snapshots.
    fn write_snapshots(&mut self, rows: &[PlaneSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
