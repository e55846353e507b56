//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `plane_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, PlaneSnapshotRow, TickSummaryRow};

pub const SNAPSHOT_HEADER: [&str; 6] = ["plane_id", "tick", "x", "y", "task_count", "target"];

pub const SUMMARY_HEADER: [&str; 12] = [
    "tick", "owned", "in_flight", "sent", "delivered", "dropped", "beliefs", "handoffs",
    "returned", "spawned", "completed", "expired",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("plane_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[PlaneSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.plane_id.to_string(),
                row.tick.to_string(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                row.task_count.to_string(),
                row.target.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.owned.to_string(),
            row.in_flight.to_string(),
            row.sent.to_string(),
            row.delivered.to_string(),
            row.dropped.to_string(),
            row.beliefs.to_string(),
            row.handoffs.to_string(),
            row.returned.to_string(),
            row.spawned.to_string(),
            row.completed.to_string(),
            row.expired.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
