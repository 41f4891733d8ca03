//! Time-window excerpts of large log files.
//!
//! Copies the lines of a log whose leading timestamp falls in `[start, end]`
//! into a smaller file, so the scanner only reads the part of interest.
//! Lines without a timestamp (stack traces, multi-line messages) follow the
//! last timestamped line: kept inside the window, dropped outside it.

mod error;
mod matcher;


pub use error::ExcerptError;
pub use matcher::{DEFAULT_TIME_FORMAT, TimestampMatcher};

use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub matcher: TimestampMatcher,
}

impl TimeWindow {
    /// Parses both bounds with `format`.
    pub fn parse(start: &str, end: &str, format: &str) -> Result<Self, ExcerptError> {
        let matcher = TimestampMatcher::new(format)?;
        let start = matcher.parse_bound(start)?;
        let end = matcher.parse_bound(end)?;

        if start > end {
            return Err(ExcerptError::EmptyWindow { start, end });
        }

        Ok(Self {
            start,
            end,
            matcher,
        })
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExcerptSummary {
    pub lines_read: u64,
    pub kept_lines: u64,
    /// A timestamp past the end of the window was seen and reading stopped.
    pub stopped_early: bool,
}

/// Copies the lines of `reader` that fall inside `window` to `out`.
pub fn reduce<R: BufRead, W: Write>(
    mut reader: R,
    mut out: W,
    window: &TimeWindow,
) -> Result<ExcerptSummary, ExcerptError> {
    let mut summary = ExcerptSummary::default();
    let mut in_window = false;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(ExcerptError::Read)? == 0 {
            break;
        }
        summary.lines_read += 1;

        let line = String::from_utf8_lossy(&buf);
        if let Some(ts) = window.matcher.detect(&line) {
            if ts > window.end {
                summary.stopped_early = true;
                break;
            }
            in_window = ts >= window.start;
        }

        if in_window {
            out.write_all(&buf).map_err(ExcerptError::Write)?;
            summary.kept_lines += 1;
        }
    }

    out.flush().map_err(ExcerptError::Write)?;
    Ok(summary)
}

/// File-to-file wrapper over [`reduce`].
pub fn reduce_log_file(
    input: &Path,
    output: &Path,
    window: &TimeWindow,
) -> Result<ExcerptSummary, ExcerptError> {
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        start = %window.start,
        end = %window.end,
        "reducing log file"
    );

    let reader = File::open(input).map_err(|e| ExcerptError::open(input, e))?;
    let writer = File::create(output).map_err(|e| ExcerptError::create(output, e))?;

    let summary = reduce(BufReader::new(reader), BufWriter::new(writer), window)?;

    if summary.stopped_early {
        tracing::info!(end = %window.end, "reached end of window, stopped reading");
    }
    tracing::info!(kept = summary.kept_lines, read = summary.lines_read, "log reduction completed");

    Ok(summary)
}
