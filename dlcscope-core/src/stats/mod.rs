//! Summary statistics and top-N views over completed operations.
//!
//! Records are never mutated here; every function borrows the completed list
//! produced by the scanner.

#[cfg(test)]
mod tests;

use crate::scan::OperationRecord;
use serde::Serialize;

pub const DEFAULT_TOP_N: usize = 5;

/// The three durations reported per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    DlcDuration,
    PivotTransactionDuration,
    PivotCommitDuration,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::DlcDuration,
        Metric::PivotTransactionDuration,
        Metric::PivotCommitDuration,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::DlcDuration => "DLC operation duration",
            Metric::PivotTransactionDuration => "AP Transaction duration",
            Metric::PivotCommitDuration => "AP Commit duration",
        }
    }

    pub fn value(&self, record: &OperationRecord) -> i64 {
        match self {
            Metric::DlcDuration => record.dlc_duration_ms,
            Metric::PivotTransactionDuration => saturating_i64(record.pivot_transaction_duration_ms),
            Metric::PivotCommitDuration => saturating_i64(record.pivot_commit_duration_ms),
        }
    }
}

fn saturating_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub min_ms: i64,
    pub max_ms: i64,
    pub mean_ms: f64,
}

/// Min / max / mean of every metric. `None` when there is nothing to
/// summarize.
pub fn summarize(records: &[OperationRecord]) -> Option<Vec<MetricSummary>> {
    if records.is_empty() {
        return None;
    }

    let summaries = Metric::ALL
        .iter()
        .map(|metric| {
            let mut min = i64::MAX;
            let mut max = i64::MIN;
            let mut sum = 0f64;

            for r in records {
                let v = metric.value(r);
                min = min.min(v);
                max = max.max(v);
                sum += v as f64;
            }

            MetricSummary {
                metric: *metric,
                min_ms: min,
                max_ms: max,
                mean_ms: sum / records.len() as f64,
            }
        })
        .collect();

    Some(summaries)
}

/// The `n` records with the largest `metric`, descending. Ties keep file
/// order.
pub fn top_n(records: &[OperationRecord], metric: Metric, n: usize) -> Vec<&OperationRecord> {
    let mut sorted: Vec<&OperationRecord> = records.iter().collect();
    // sort_by is stable
    sorted.sort_by(|a, b| metric.value(b).cmp(&metric.value(a)));
    sorted.truncate(n);
    sorted
}

/// The three top-N views printed and persisted after a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct SlowestReports<'a> {
    pub operations: Vec<&'a OperationRecord>,
    pub transactions: Vec<&'a OperationRecord>,
    pub commits: Vec<&'a OperationRecord>,
}

impl<'a> SlowestReports<'a> {
    /// Report names, used for file names and headings.
    pub const OPERATIONS: &'static str = "slowest_dlc_operations";
    pub const TRANSACTIONS: &'static str = "slowest_transactions";
    pub const COMMITS: &'static str = "slowest_commits";

    pub fn named(&self) -> [(&'static str, Metric, &[&'a OperationRecord]); 3] {
        [
            (Self::OPERATIONS, Metric::DlcDuration, self.operations.as_slice()),
            (
                Self::TRANSACTIONS,
                Metric::PivotTransactionDuration,
                self.transactions.as_slice(),
            ),
            (Self::COMMITS, Metric::PivotCommitDuration, self.commits.as_slice()),
        ]
    }
}

pub fn slowest(records: &[OperationRecord], n: usize) -> SlowestReports<'_> {
    SlowestReports {
        operations: top_n(records, Metric::DlcDuration, n),
        transactions: top_n(records, Metric::PivotTransactionDuration, n),
        commits: top_n(records, Metric::PivotCommitDuration, n),
    }
}
