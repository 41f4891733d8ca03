//! DLC operation scanner
//!
//! Reads a log exactly once, forward, and correlates three independently
//! numbered event streams into one record per load/unload operation:
//!
//! - the DLC thread itself (`Starting ... operation` / `Finishing ... operation`),
//! - the datastore transaction manager (`DatastoreTransactionStarted|Committed`),
//! - the pivot transaction manager (`ActivePivot transaction N started|committed`).
//!
//! The datastore and pivot events are emitted by other threads than the DLC
//! one, so they are routed back to their operation through two bridge tables
//! keyed by the raw transaction ids.
//!
//! The overall data processing architecture is:
//!
//! raw line
//! LineNormalizer
//! EventPatterns
//! OperationTracker
//! OperationRecord
//!

mod classify;
mod error;
mod normalize;
mod record;
mod slow_ops;
mod tracker;


pub use classify::{Event, EventPatterns, StartFields};
pub use error::ScanError;
pub use normalize::{LINE_TIMESTAMP_FORMAT, LineNormalizer, NormalizedLine, parse_line_timestamp};
pub use record::{OperationRecord, OperationType};
pub use slow_ops::SlowOpCapture;
pub use tracker::{ClosedOperation, OperationKey, OperationTracker, ReopenPolicy};

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Options for a single file scan.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Operations at least this slow get their lines written to `slow_log`.
    pub threshold_ms: Option<u64>,
    pub slow_log: Option<PathBuf>,
    pub reopen_policy: ReopenPolicy,
}

impl ScanConfig {
    /// Capture is enabled only when both a threshold and a path are set.
    pub fn capture(&self) -> Option<(&Path, u64)> {
        Some((self.slow_log.as_deref()?, self.threshold_ms?))
    }
}

/// Result of a completed scan.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Completed operations in file order.
    pub records: Vec<OperationRecord>,
    pub lines_read: u64,
    /// Operations whose lines went to the slow operation log.
    pub slow_written: usize,
    /// Operations still open when the input ended.
    pub still_open: usize,
}

pub struct Scanner<W: Write = BufWriter<File>> {
    normalizer: LineNormalizer,
    patterns: EventPatterns,
    tracker: OperationTracker,
    capture: Option<SlowOpCapture<W>>,
    completed: Vec<OperationRecord>,
    lines_read: u64,
}

impl<W: Write> Scanner<W> {
    pub fn new(reopen_policy: ReopenPolicy, capture: Option<SlowOpCapture<W>>) -> Result<Self, ScanError> {
        Ok(Self {
            normalizer: LineNormalizer::new()?,
            patterns: EventPatterns::new()?,
            tracker: OperationTracker::new(reopen_policy, capture.is_some()),
            capture,
            completed: Vec::new(),
            lines_read: 0,
        })
    }

    /// Feeds one raw line, without its line terminator.
    pub fn process_line(&mut self, raw: &str) -> Result<(), ScanError> {
        self.lines_read += 1;

        let Some(line) = self.normalizer.normalize(raw) else {
            return Ok(());
        };
        let thread = line.thread.as_str();

        if let Some(start) = self.patterns.start(&line.text) {
            match line.timestamp {
                Some(start_time) => {
                    self.tracker.open(thread, start, start_time, raw);
                }
                None => {
                    tracing::debug!(
                        thread,
                        operation_id = start.operation_id,
                        "start line without timestamp ignored"
                    );
                    self.tracker.buffer_line(thread, raw);
                }
            }
            return Ok(());
        }

        self.tracker.buffer_line(thread, raw);

        let Some(event) = self.patterns.correlated(&line.text) else {
            return Ok(());
        };

        if let Some(closed) = self.tracker.apply(thread, line.timestamp, &event) {
            self.complete(closed)?;
        }

        Ok(())
    }

    fn complete(&mut self, closed: ClosedOperation) -> Result<(), ScanError> {
        let ClosedOperation { record, lines } = closed;

        let written = match (self.capture.as_mut(), lines) {
            (Some(capture), Some(lines)) => capture.offer(&record, &lines),
            _ => Ok(false),
        };

        tracing::debug!(
            operation_id = %record.operation_id,
            duration_ms = record.dlc_duration_ms,
            "operation completed"
        );
        self.completed.push(record);

        written.map(|_| ()).map_err(ScanError::SideFile)
    }

    /// Feeds every line of `reader`. Invalid UTF-8 is replaced, not fatal.
    pub fn scan<R: BufRead>(&mut self, mut reader: R) -> Result<(), ScanError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf).map_err(ScanError::Read)?;
            if n == 0 {
                return Ok(());
            }

            let line = String::from_utf8_lossy(trim_line_end(&buf));
            self.process_line(&line)?;
        }
    }

    pub fn completed(&self) -> &[OperationRecord] {
        &self.completed
    }

    pub fn tracker(&self) -> &OperationTracker {
        &self.tracker
    }

    /// Flushes the slow operation log, if any.
    pub fn flush(&mut self) -> Result<(), ScanError> {
        match self.capture.as_mut() {
            Some(capture) => capture.flush().map_err(ScanError::SideFile),
            None => Ok(()),
        }
    }

    /// Flushes the side channel and hands back the records.
    ///
    /// A flush failure drops the records; use [`Scanner::run`] to keep them.
    pub fn finish(mut self) -> Result<ScanOutcome, ScanError> {
        self.flush()?;

        Ok(ScanOutcome {
            still_open: self.tracker.open_count(),
            slow_written: self.capture.as_ref().map_or(0, SlowOpCapture::written),
            records: self.completed,
            lines_read: self.lines_read,
        })
    }

    /// Scans `reader` to the end and finishes.
    ///
    /// Any read or side file failure, including the final flush, comes back
    /// as [`ScanError::Interrupted`] carrying the records completed so far.
    pub fn run<R: BufRead>(mut self, reader: R, path: &Path) -> Result<ScanOutcome, ScanError> {
        if let Err(source) = self.scan(reader).and_then(|()| self.flush()) {
            return Err(ScanError::Interrupted {
                path: path.to_path_buf(),
                partial: self.take_completed(),
                source: Box::new(source),
            });
        }

        self.finish()
    }

    /// Takes the records completed so far, leaving the scanner empty.
    pub fn take_completed(&mut self) -> Vec<OperationRecord> {
        std::mem::take(&mut self.completed)
    }

    pub fn into_capture(self) -> Option<SlowOpCapture<W>> {
        self.capture
    }
}

/// Scans one log file.
///
/// The slow operation log is created only when `config` enables capture. Both
/// files are closed on every exit path. If reading or writing the slow
/// operation log fails, the records completed before the failure are returned
/// inside [`ScanError::Interrupted`].
pub fn scan_file(path: &Path, config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
    tracing::info!(path = %path.display(), "opening log file");
    let input = File::open(path).map_err(|e| ScanError::open(path, e))?;

    let capture = match config.capture() {
        Some((slow_log, threshold_ms)) => Some(
            SlowOpCapture::create(slow_log, threshold_ms).map_err(|e| ScanError::open(slow_log, e))?,
        ),
        None => None,
    };

    let outcome = Scanner::new(config.reopen_policy, capture)?.run(BufReader::new(input), path)?;
    tracing::info!(
        path = %path.display(),
        lines = outcome.lines_read,
        operations = outcome.records.len(),
        slow = outcome.slow_written,
        still_open = outcome.still_open,
        "log file processed"
    );
    Ok(outcome)
}

fn trim_line_end(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
