use crate::report::error::ReportError;
use crate::scan::{OperationRecord, OperationType};
use crate::stats::{MetricSummary, SlowestReports};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const OPERATIONS_REPORT_FILE: &str = "dlc_operations_report.csv";
pub const DETAILED_REPORT_FILE: &str = "dlc_operations_detailed_report.csv";
pub const SUMMARY_FILE: &str = "dlc_summary_stats.csv";
/// Appended to each top-N report name: `slowest_commits_dlc_slowest_operations.csv`.
pub const SLOWEST_SUFFIX: &str = "dlc_slowest_operations.csv";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct OperationRow<'a> {
    thread: &'a str,
    operation_id: &'a str,
    operation_type: OperationType,
    topic: &'a str,
    scope: &'a str,
    locked_stores: &'a str,
    start_time: String,
    end_time: Option<String>,
    pivots: String,
    ds_transaction_id: Option<&'a str>,
    ds_transaction_duration_ms: u64,
    ds_commit_duration_ms: u64,
    pivot_transaction_id: Option<&'a str>,
    pivot_transaction_duration_ms: u64,
    pivot_commit_duration_ms: u64,
    dlc_duration_ms: i64,
}

impl<'a> From<&'a OperationRecord> for OperationRow<'a> {
    fn from(r: &'a OperationRecord) -> Self {
        Self {
            thread: &r.thread,
            operation_id: &r.operation_id,
            operation_type: r.operation_type,
            topic: &r.topic,
            scope: &r.scope,
            locked_stores: &r.locked_stores,
            start_time: format_time(r.start_time),
            end_time: r.end_time.map(format_time),
            pivots: r.pivots_joined(),
            ds_transaction_id: r.ds_transaction_id.as_deref(),
            ds_transaction_duration_ms: r.ds_transaction_duration_ms,
            ds_commit_duration_ms: r.ds_commit_duration_ms,
            pivot_transaction_id: r.pivot_transaction_id.as_deref(),
            pivot_transaction_duration_ms: r.pivot_transaction_duration_ms,
            pivot_commit_duration_ms: r.pivot_commit_duration_ms,
            dlc_duration_ms: r.dlc_duration_ms,
        }
    }
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    #[serde(rename = "Metric")]
    metric: &'a str,
    #[serde(rename = "Min (ms)")]
    min_ms: i64,
    #[serde(rename = "Max (ms)")]
    max_ms: i64,
    #[serde(rename = "Average (ms)")]
    mean_ms: f64,
}

#[derive(Serialize)]
struct SlowOperationRow<'a> {
    operation_id: &'a str,
    operation_type: OperationType,
    dlc_duration_ms: i64,
    pivot_transaction_id: Option<&'a str>,
}

#[derive(Serialize)]
struct SlowTransactionRow<'a> {
    pivot_transaction_id: Option<&'a str>,
    duration_ms: u64,
    operation_id: &'a str,
    locked_stores: &'a str,
}

fn format_time(t: NaiveDateTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Writes every report file into `dir`, creating it if needed. Returns the
/// paths written, in write order.
pub fn write_reports(
    dir: &Path,
    records: &[OperationRecord],
    summaries: &[MetricSummary],
    slowest: &SlowestReports<'_>,
) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();

    let mut by_start: Vec<&OperationRecord> = records.iter().collect();
    by_start.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    written.push(write_rows(
        &dir.join(OPERATIONS_REPORT_FILE),
        by_start.into_iter().map(OperationRow::from),
    )?);

    written.push(write_rows(
        &dir.join(DETAILED_REPORT_FILE),
        records.iter().map(OperationRow::from),
    )?);

    written.push(write_rows(
        &dir.join(SUMMARY_FILE),
        summaries.iter().map(|s| SummaryRow {
            metric: s.metric.label(),
            min_ms: s.min_ms,
            max_ms: s.max_ms,
            mean_ms: s.mean_ms,
        }),
    )?);

    written.push(write_rows(
        &slowest_path(dir, SlowestReports::OPERATIONS),
        slowest.operations.iter().map(|r| SlowOperationRow {
            operation_id: &r.operation_id,
            operation_type: r.operation_type,
            dlc_duration_ms: r.dlc_duration_ms,
            pivot_transaction_id: r.pivot_transaction_id.as_deref(),
        }),
    )?);

    written.push(write_rows(
        &slowest_path(dir, SlowestReports::TRANSACTIONS),
        slowest.transactions.iter().map(|r| SlowTransactionRow {
            pivot_transaction_id: r.pivot_transaction_id.as_deref(),
            duration_ms: r.pivot_transaction_duration_ms,
            operation_id: &r.operation_id,
            locked_stores: &r.locked_stores,
        }),
    )?);

    written.push(write_rows(
        &slowest_path(dir, SlowestReports::COMMITS),
        slowest.commits.iter().map(|r| SlowTransactionRow {
            pivot_transaction_id: r.pivot_transaction_id.as_deref(),
            duration_ms: r.pivot_commit_duration_ms,
            operation_id: &r.operation_id,
            locked_stores: &r.locked_stores,
        }),
    )?);

    tracing::info!(dir = %dir.display(), files = written.len(), "reports written");
    Ok(written)
}

fn slowest_path(dir: &Path, report: &str) -> PathBuf {
    dir.join(format!("{report}_{SLOWEST_SUFFIX}"))
}

fn write_rows<T, I>(path: &Path, rows: I) -> Result<PathBuf, ReportError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_path(path).map_err(|e| ReportError::csv(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| ReportError::csv(path, e))?;
    }
    writer.flush().map_err(|e| ReportError::csv(path, e))?;

    tracing::debug!(path = %path.display(), "report file written");
    Ok(path.to_path_buf())
}
