//! # Batching
//!
//! The batcher is the single producer of the pipeline. It reads the input
//! sequentially, groups lines into fixed-size [`Batch`]es and hands each one
//! over a bounded channel. Ownership of a batch moves with it: once sent, the
//! batcher keeps no reference.
//!
//! Lines travel as raw bytes. Text decoding happens in the workers, so a
//! line that is not valid UTF-8 is one malformed record rather than the end
//! of the stream.
//!
//! The channel bound is the backpressure mechanism. When every worker is busy
//! and the queue is full, `send` blocks and the batcher stops reading, so peak
//! memory stays at roughly `queue_depth x batch_size` lines.

use std::io::{self, BufRead};
use std::time::Instant;

use crossbeam::channel::Sender;
use tracing::{debug, info, trace, warn};

/// An ordered group of raw input lines, processed as one unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    sequence: u64,
    lines: Vec<Vec<u8>>,
}

impl Batch {
    pub fn new(sequence: u64, capacity: usize) -> Self {
        Self {
            sequence,
            lines: Vec::with_capacity(capacity),
        }
    }

    /// Build a batch from already materialized lines
    pub fn from_lines<I, S>(sequence: u64, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        Self {
            sequence,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, line: Vec<u8>) {
        self.lines.push(line);
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.lines.iter().map(Vec::as_slice)
    }
}

/// What the batcher observed while producing
#[derive(Debug, Default)]
pub struct BatcherReport {
    pub batches_emitted: u64,
    pub lines_read: u64,
    /// Set when the stream ended early on an I/O error
    pub read_error: Option<io::Error>,
    /// Set when every consumer disconnected before end of input
    pub consumers_gone: bool,
}

/// Groups input lines into batches of at most `batch_size`
#[derive(Debug, Clone)]
pub struct Batcher {
    batch_size: usize,
}

impl Batcher {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Read `reader` to the end, sending batches into `sender`
    ///
    /// The sender is dropped on return, which closes the queue once the
    /// last batch has been taken.
    pub fn run<R: BufRead>(&self, mut reader: R, sender: Sender<Batch>) -> BatcherReport {
        let started = Instant::now();
        let mut report = BatcherReport::default();
        let mut batch = Batch::new(0, self.batch_size);
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {
                    report.lines_read += 1;
                    batch.push(trim_line_terminator(&line).to_vec());

                    if batch.len() >= self.batch_size {
                        let next = Batch::new(batch.sequence + 1, self.batch_size);
                        let full = std::mem::replace(&mut batch, next);
                        if !self.emit(full, &sender, &mut report) {
                            return report;
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(
                        lines_read = report.lines_read,
                        error = %e,
                        "⚠️ BATCHER: Read failed mid-stream, truncating input"
                    );
                    report.read_error = Some(e);
                    break;
                }
            }
        }

        if !batch.is_empty() {
            self.emit(batch, &sender, &mut report);
        }

        info!(
            batches = report.batches_emitted,
            lines = report.lines_read,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "📦 BATCHER: Input exhausted, closing queue"
        );

        report
    }

    /// Blocks while the queue is full. Returns false when no consumer is left.
    fn emit(&self, batch: Batch, sender: &Sender<Batch>, report: &mut BatcherReport) -> bool {
        let sequence = batch.sequence;
        let size = batch.len();

        if sender.send(batch).is_err() {
            debug!(sequence, "BATCHER: All consumers disconnected, stopping");
            report.consumers_gone = true;
            return false;
        }

        report.batches_emitted += 1;
        trace!(sequence, size, "BATCHER: Batch enqueued");
        true
    }
}

fn trim_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
