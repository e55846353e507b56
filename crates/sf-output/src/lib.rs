//! `sf-output` — simulation output writers for skyfleet.
//!
//! | Writer              | Files created / behavior                                |
//! |---------------------|---------------------------------------------------------|
//! | [`CsvWriter`]       | `plane_snapshots.csv`, `tick_summaries.csv`             |
//! | [`ThreadedWriter`]  | Moves any writer onto a background thread               |
//!
//! All writers implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `sf_sim::SimObserver`.  Rows are
//! plain `Copy` values, so the background thread never sees live simulation
//! state.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sf_output::{CsvWriter, SimOutputObserver, ThreadedWriter};
//!
//! let writer = ThreadedWriter::spawn(CsvWriter::new(Path::new("./output"))?)?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod threaded;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{PlaneSnapshotRow, TickSummaryRow};
pub use threaded::ThreadedWriter;
pub use writer::OutputWriter;
