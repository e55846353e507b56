//! Integration tests for sf-output.

use tempfile::TempDir;

use crate::row::{PlaneSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn snap_row(plane_id: u32, tick: u64) -> PlaneSnapshotRow {
    PlaneSnapshotRow {
        plane_id,
        tick,
        x:          plane_id as f64 * 1.5,
        y:          -2.0,
        task_count: plane_id,
        target:     u32::MAX,
    }
}

fn summary_row(tick: u64) -> TickSummaryRow {
    TickSummaryRow {
        tick,
        owned: 4,
        in_flight: 1,
        sent: 10,
        delivered: 9,
        dropped: 1,
        beliefs: 6,
        handoffs: 1,
        returned: 0,
        spawned: 5,
        completed: 1,
        expired: 0,
    }
}

fn records(path: std::path::PathBuf) -> Vec<csv::StringRecord> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records().map(|r| r.unwrap()).collect()
}

/// In-memory writer that can be told to fail.
#[derive(Default)]
struct MemoryWriter {
    snapshots: Vec<PlaneSnapshotRow>,
    summaries: Vec<TickSummaryRow>,
    calls:     usize,
    fail_at:   Option<usize>,
}

impl OutputWriter for MemoryWriter {
    fn write_snapshots(&mut self, rows: &[PlaneSnapshotRow]) -> OutputResult<()> {
        self.snapshots.extend_from_slice(rows);
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_at == Some(call) {
            return Err(OutputError::Io(std::io::Error::other("disk full")));
        }
        self.summaries.push(*row);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

// ── CsvWriter ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use crate::csv::{CsvWriter, SNAPSHOT_HEADER, SUMMARY_HEADER};

    use super::*;

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("plane_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, SNAPSHOT_HEADER);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, SUMMARY_HEADER);
    }

    #[test]
    fn csv_snapshot_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("plane_snapshots.csv"));
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[1][0], "1"); // plane_id
        assert_eq!(&rows[1][1], "5"); // tick
        assert_eq!(&rows[1][2], "1.500");
        assert_eq!(&rows[1][3], "-2.000");
        assert_eq!(&rows[2][5], "4294967295"); // no target
    }

    #[test]
    fn csv_tick_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("tick_summaries.csv"));
        assert_eq!(rows.len(), 1);
        let fields: Vec<&str> = rows[0].iter().collect();
        assert_eq!(fields, ["3", "4", "1", "10", "9", "1", "6", "1", "0", "5", "1", "0"]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_missing_dir_errors() {
        let dir = tmp();
        let err = CsvWriter::new(&dir.path().join("nope")).err().unwrap();
        assert!(matches!(err, OutputError::Csv(_) | OutputError::Io(_)));
    }
}

// ── ThreadedWriter ────────────────────────────────────────────────────────────

#[cfg(test)]
mod threaded_tests {
    use crate::csv::CsvWriter;
    use crate::ThreadedWriter;

    use super::*;

    #[test]
    fn rows_reach_the_files_after_finish() {
        let dir = tmp();
        let mut w = ThreadedWriter::spawn(CsvWriter::new(dir.path()).unwrap()).unwrap();
        for tick in 0..50 {
            w.write_tick_summary(&summary_row(tick)).unwrap();
        }
        w.write_snapshots(&[snap_row(0, 49), snap_row(1, 49)]).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("tick_summaries.csv"));
        assert_eq!(rows.len(), 50);
        assert_eq!(&rows[49][0], "49");
        assert_eq!(records(dir.path().join("plane_snapshots.csv")).len(), 2);
    }

    #[test]
    fn first_error_reported_by_finish() {
        let inner = MemoryWriter { fail_at: Some(2), ..MemoryWriter::default() };
        let mut w = ThreadedWriter::spawn(inner).unwrap();
        for tick in 0..5 {
            w.write_tick_summary(&summary_row(tick)).unwrap();
        }
        let err = w.finish().unwrap_err();
        assert!(err.to_string().contains("disk full"));
        // Reported once.
        assert!(w.finish().is_ok());
    }

    #[test]
    fn handle_moves_to_producer_thread_and_keeps_order() {
        let dir = tmp();
        let w = ThreadedWriter::spawn(CsvWriter::new(dir.path()).unwrap()).unwrap();
        let producer = std::thread::spawn(move || {
            let mut w = w;
            for tick in 0..200 {
                w.write_tick_summary(&summary_row(tick)).unwrap();
            }
            w.finish()
        });
        producer.join().unwrap().unwrap();

        let ticks: Vec<String> = records(dir.path().join("tick_summaries.csv"))
            .iter()
            .map(|r| r[0].to_string())
            .collect();
        assert_eq!(ticks, (0..200).map(|t| t.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn writes_after_finish_fail() {
        let mut w = ThreadedWriter::spawn(MemoryWriter::default()).unwrap();
        w.finish().unwrap();
        let err = w.write_tick_summary(&summary_row(0)).unwrap_err();
        assert!(matches!(err, OutputError::WriterGone));
    }
}

// ── SimOutputObserver ─────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use sf_agent::PlaneSpec;
    use sf_core::{PlaneId, Point, SimConfig};
    use sf_maxsum::{MaxSumConfig, WorkloadCost};
    use sf_mobility::NavigatorConfig;
    use sf_sim::{SimBuilder, SimObserver, TickStats};

    use crate::csv::CsvWriter;
    use crate::{SimOutputObserver, ThreadedWriter};

    use super::*;

    fn sim(total_ticks: u64, snapshot_interval_ticks: u64) -> sf_sim::Sim {
        let config = SimConfig { total_ticks, seed: 1, snapshot_interval_ticks };
        let mut sim = SimBuilder::new(config)
            .planes([
                PlaneSpec::new(Point::new(0.0, 0.0), 20.0, 1.0),
                PlaneSpec::new(Point::new(6.0, 0.0), 20.0, 1.0),
                PlaneSpec::new(Point::new(12.0, 0.0), 20.0, 1.0),
            ])
            .install(|id, set| {
                sf_maxsum::install(
                    set,
                    id,
                    &MaxSumConfig::default(),
                    &NavigatorConfig::default(),
                    &WorkloadCost::new(1.0),
                )
            })
            .build()
            .unwrap();
        sim.spawn_task(PlaneId(0), Point::new(30.0, 0.0)).unwrap();
        sim
    }

    #[test]
    fn csv_integration() {
        let dir = tmp();
        let mut sim = sim(6, 2);
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // Snapshots at ticks 0, 2, 4 for 3 planes.
        let snaps = records(dir.path().join("plane_snapshots.csv"));
        assert_eq!(snaps.len(), 9);
        assert_eq!(obs.snapshot_rows(), 9);
        let summaries = records(dir.path().join("tick_summaries.csv"));
        assert_eq!(summaries.len(), 6);
        assert_eq!(&summaries[5][9], "1"); // spawned
    }

    #[test]
    fn threaded_integration() {
        let dir = tmp();
        let mut sim = sim(20, 5);
        let writer = ThreadedWriter::spawn(CsvWriter::new(dir.path()).unwrap()).unwrap();
        let mut obs = SimOutputObserver::new(writer);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());
        assert_eq!(obs.summary_rows(), 20);
        assert_eq!(records(dir.path().join("plane_snapshots.csv")).len(), 12);
    }

    #[test]
    fn first_error_kept() {
        let inner = MemoryWriter { fail_at: Some(1), ..MemoryWriter::default() };
        let mut obs = SimOutputObserver::new(inner);
        for tick in 0..4 {
            let stats = TickStats { tick: sf_core::Tick(tick), ..TickStats::default() };
            obs.on_tick_end(stats.tick, &stats);
        }
        assert!(obs.take_error().is_some());
        assert!(obs.take_error().is_none());
        let inner = obs.into_writer();
        assert_eq!(inner.summaries.len(), 3);
    }

    #[test]
    fn summary_row_mirrors_stats() {
        let mut stats = TickStats { tick: sf_core::Tick(9), owned_tasks: 3, in_flight: 2, ..TickStats::default() };
        stats.routing.beliefs = 12;
        stats.ledger.expired = 4;
        let row = TickSummaryRow::from_stats(&stats);
        assert_eq!((row.tick, row.owned, row.in_flight), (9, 3, 2));
        assert_eq!((row.beliefs, row.expired), (12, 4));
    }
}
