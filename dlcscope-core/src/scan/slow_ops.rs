use crate::scan::record::OperationRecord;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Side channel receiving the raw lines of operations slower than a
/// threshold.
///
/// Lines are buffered per open operation by the tracker. On close the buffer
/// is handed here and written out only if the operation was slow.
pub struct SlowOpCapture<W: Write> {
    threshold_ms: i64,
    out: W,
    written: usize,
}

impl SlowOpCapture<BufWriter<File>> {
    pub fn create(path: &Path, threshold_ms: u64) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), threshold_ms))
    }
}

impl<W: Write> SlowOpCapture<W> {
    pub fn new(out: W, threshold_ms: u64) -> Self {
        Self {
            threshold_ms: i64::try_from(threshold_ms).unwrap_or(i64::MAX),
            out,
            written: 0,
        }
    }

    pub fn threshold_ms(&self) -> i64 {
        self.threshold_ms
    }

    pub fn is_slow(&self, record: &OperationRecord) -> bool {
        record.dlc_duration_ms >= self.threshold_ms
    }

    /// Writes the delimiter and the captured lines when `record` is slow.
    /// Returns whether anything was written.
    pub fn offer(&mut self, record: &OperationRecord, lines: &[String]) -> io::Result<bool> {
        if !self.is_slow(record) {
            return Ok(false);
        }

        writeln!(self.out)?;
        writeln!(
            self.out,
            "---- SLOW DLC OP: {} ({}ms) ----",
            record.operation_id, record.dlc_duration_ms
        )?;
        for line in lines {
            writeln!(self.out, "{line}")?;
        }

        self.written += 1;
        Ok(true)
    }

    /// Number of operations written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
