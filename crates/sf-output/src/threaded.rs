//! `ThreadedWriter` — runs any [`OutputWriter`] on a background thread.
//!
//! The simulation thread only copies rows into an unbounded crossbeam channel;
//! formatting and file I/O happen on the `sf-output` thread.  Write errors
//! are reported by [`finish`](OutputWriter::finish), which also joins the
//! thread.  The first error wins; later rows are discarded.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, PlaneSnapshotRow, TickSummaryRow};

enum Batch {
    Snapshots(Vec<PlaneSnapshotRow>),
    Summary(TickSummaryRow),
}

pub struct ThreadedWriter {
    tx:       Option<Sender<Batch>>,
    handle:   Option<JoinHandle<OutputResult<()>>>,
    finished: bool,
}

impl ThreadedWriter {
    /// Move `writer` onto a new background thread.
    pub fn spawn<W>(writer: W) -> OutputResult<Self>
    where
        W: OutputWriter + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = thread::Builder::new()
            .name("sf-output".into())
            .spawn(move || pump(writer, rx))?;
        Ok(Self { tx: Some(tx), handle: Some(handle), finished: false })
    }

    fn send(&self, batch: Batch) -> OutputResult<()> {
        let tx = self.tx.as_ref().ok_or(OutputError::WriterGone)?;
        tx.send(batch).map_err(|_| OutputError::WriterGone)
    }

    fn join(&mut self) -> OutputResult<()> {
        self.finished = true;
        // Closing the channel ends the pump loop.
        self.tx = None;
        match self.handle.take().map(JoinHandle::join) {
            None => Ok(()),
            Some(Ok(result)) => result,
            Some(Err(_)) => Err(OutputError::WriterGone),
        }
    }
}

impl OutputWriter for ThreadedWriter {
    fn write_snapshots(&mut self, rows: &[PlaneSnapshotRow]) -> OutputResult<()> {
        self.send(Batch::Snapshots(rows.to_vec()))
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.send(Batch::Summary(*row))
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.join()
    }
}

impl Drop for ThreadedWriter {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.join() {
                warn!(error = %e, "output thread failed; error discarded on drop");
            }
        }
    }
}

fn pump<W: OutputWriter>(mut writer: W, rx: Receiver<Batch>) -> OutputResult<()> {
    let mut first_error = None;
    let mut batches = 0_u64;
    for batch in rx {
        if first_error.is_some() {
            continue;
        }
        let result = match batch {
            Batch::Snapshots(rows) => writer.write_snapshots(&rows),
            Batch::Summary(row) => writer.write_tick_summary(&row),
        };
        batches += 1;
        if let Err(e) = result {
            warn!(error = %e, "output write failed; discarding further rows");
            first_error = Some(e);
        }
    }
    let finished = writer.finish();
    debug!(batches, "output thread finished");
    match first_error {
        Some(e) => Err(e),
        None => finished,
    }
}
