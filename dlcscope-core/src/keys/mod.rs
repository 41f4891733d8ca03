//! Key limiter for CSV extracts.
//!
//! Shrinks a directory tree of CSV files to the rows whose key column holds
//! one of the first N distinct values seen. Discovery walks the files in
//! sorted order, so the same tree always yields the same key set.

mod discover;
mod error;

#[cfg(test)]
mod tests;

pub use discover::{CSV_GLOB, discover, resolve_glob};
pub use error::KeysError;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LimitSummary {
    pub kept: u64,
    pub removed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeysOutcome {
    /// CSV files found under the input directory.
    pub files: usize,
    pub allowed: HashSet<String>,
    pub totals: LimitSummary,
    /// Files that failed while being limited and were left out.
    pub skipped: usize,
}

/// Collects distinct values of `column` until `limit` of them are found.
///
/// Files that cannot be read, are empty, or lack the column are skipped with
/// a warning.
pub fn discover_unique_values(files: &[PathBuf], column: &str, limit: usize) -> HashSet<String> {
    let mut allowed = HashSet::new();

    for (i, path) in files.iter().enumerate() {
        if allowed.len() >= limit {
            tracing::info!(limit, "key limit reached, stopping discovery");
            break;
        }
        tracing::debug!(file = %path.display(), index = i + 1, total = files.len(), "scanning for keys");

        if let Err(e) = collect_values(path, column, limit, &mut allowed) {
            tracing::warn!(file = %path.display(), error = %e, "skipping file during discovery");
        }
    }

    tracing::info!(found = allowed.len(), "key discovery complete");
    allowed
}

fn collect_values(
    path: &Path,
    column: &str,
    limit: usize,
    allowed: &mut HashSet<String>,
) -> Result<(), KeysError> {
    let mut reader = open_reader(path)?;
    let mut records = reader.records();

    let Some(header) = records.next() else {
        return Ok(());
    };
    let header = header.map_err(|e| KeysError::read(path, e))?;
    let Some(index) = column_index(&header, column) else {
        tracing::warn!(file = %path.display(), column, "column not found, skipping file");
        return Ok(());
    };

    for row in records {
        if allowed.len() >= limit {
            break;
        }
        let row = row.map_err(|e| KeysError::read(path, e))?;
        if let Some(value) = row.get(index) {
            allowed.insert(value.to_string());
        }
    }

    Ok(())
}

/// Copies the header of `input` and the rows whose `column` value is in
/// `allowed` to `output`. Rows too short to hold the column count as removed.
pub fn limit_csv(
    input: &Path,
    output: &Path,
    column: &str,
    allowed: &HashSet<String>,
) -> Result<LimitSummary, KeysError> {
    let mut reader = open_reader(input)?;
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(output)
        .map_err(|e| KeysError::write(output, e))?;

    let mut summary = LimitSummary::default();
    let mut records = reader.records();

    let Some(header) = records.next() else {
        return Ok(summary);
    };
    let header = header.map_err(|e| KeysError::read(input, e))?;
    writer
        .write_record(&header)
        .map_err(|e| KeysError::write(output, e))?;

    if let Some(index) = column_index(&header, column) {
        for row in records {
            let row = row.map_err(|e| KeysError::read(input, e))?;
            match row.get(index) {
                Some(value) if allowed.contains(value) => {
                    writer
                        .write_record(&row)
                        .map_err(|e| KeysError::write(output, e))?;
                    summary.kept += 1;
                }
                _ => summary.removed += 1,
            }
        }
    }

    writer.flush().map_err(|e| KeysError::write(output, e))?;

    tracing::info!(
        file = %output.display(),
        kept = summary.kept,
        removed = summary.removed,
        "csv file limited"
    );
    Ok(summary)
}

/// Limits every CSV file under `input_dir` to the first `limit` distinct
/// values of `column`, mirroring the tree into `output_dir`.
///
/// Nothing is written when no file or no key is found. A file that fails is
/// logged, counted in [`KeysOutcome::skipped`] and left out of the output.
pub fn run_keys(
    input_dir: &Path,
    output_dir: &Path,
    column: &str,
    limit: usize,
) -> Result<KeysOutcome, KeysError> {
    create_dir(output_dir)?;

    tracing::info!(dir = %input_dir.display(), "searching csv files recursively");
    let files = discover(input_dir, CSV_GLOB)?;
    if files.is_empty() {
        tracing::warn!(dir = %input_dir.display(), "no csv files found");
        return Ok(KeysOutcome::default());
    }

    let allowed = discover_unique_values(&files, column, limit);
    let mut outcome = KeysOutcome {
        files: files.len(),
        allowed,
        totals: LimitSummary::default(),
        skipped: 0,
    };
    if outcome.allowed.is_empty() {
        tracing::warn!(column, "no key values discovered");
        return Ok(outcome);
    }

    for input in &files {
        let relative = input.strip_prefix(input_dir).unwrap_or(input);
        let output = output_dir.join(relative);
        if let Some(parent) = output.parent() {
            create_dir(parent)?;
        }

        match limit_csv(input, &output, column, &outcome.allowed) {
            Ok(summary) => {
                outcome.totals.kept += summary.kept;
                outcome.totals.removed += summary.removed;
            }
            Err(e) => {
                tracing::warn!(file = %input.display(), error = %e, "skipping file");
                outcome.skipped += 1;
                if output.exists()
                    && let Err(e) = fs::remove_file(&output)
                {
                    tracing::warn!(file = %output.display(), error = %e, "failed to remove partial output");
                }
            }
        }
    }

    Ok(outcome)
}

fn open_reader(path: &Path) -> Result<csv::Reader<fs::File>, KeysError> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| KeysError::read(path, e))
}

fn column_index(header: &StringRecord, column: &str) -> Option<usize> {
    header.iter().position(|h| h == column)
}

fn create_dir(path: &Path) -> Result<(), KeysError> {
    fs::create_dir_all(path).map_err(|source| KeysError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
