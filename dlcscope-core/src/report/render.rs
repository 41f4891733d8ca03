use crate::scan::OperationRecord;
use crate::stats::{MetricSummary, SlowestReports};
use owo_colors::OwoColorize;

/// Summary table followed by the three top-N tables.
pub fn render_analysis(
    summaries: &[MetricSummary],
    slowest: &SlowestReports<'_>,
    styled: bool,
) -> String {
    let mut out = String::new();

    out.push_str(&heading("DLC Operations Summary Statistics:", styled));
    out.push('\n');
    out.push_str(&render_summary(summaries));
    out.push_str(&render_slowest(slowest, styled));

    out
}

pub fn render_summary(summaries: &[MetricSummary]) -> String {
    let rows = summaries
        .iter()
        .map(|s| {
            vec![
                s.metric.label().to_string(),
                s.min_ms.to_string(),
                s.max_ms.to_string(),
                format!("{:.1}", s.mean_ms),
            ]
        })
        .collect::<Vec<_>>();

    table(&["Metric", "Min (ms)", "Max (ms)", "Average (ms)"], &rows)
}

pub fn render_slowest(slowest: &SlowestReports<'_>, styled: bool) -> String {
    let mut out = String::new();
    let n = slowest.operations.len();

    out.push('\n');
    out.push_str(&heading(&format!("Top {n} Slowest DLC Operations:"), styled));
    out.push('\n');
    let rows = slowest
        .operations
        .iter()
        .map(|r| {
            vec![
                r.operation_id.clone(),
                r.operation_type.to_string(),
                r.dlc_duration_ms.to_string(),
                r.pivot_transaction_id.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    out.push_str(&table(
        &["operation_id", "operation_type", "dlc_duration_ms", "pivot_transaction_id"],
        &rows,
    ));

    out.push_str(&transaction_table(
        "Slowest Transactions",
        &slowest.transactions,
        |r| r.pivot_transaction_duration_ms,
        styled,
    ));
    out.push_str(&transaction_table(
        "Slowest Commits",
        &slowest.commits,
        |r| r.pivot_commit_duration_ms,
        styled,
    ));

    out
}

fn transaction_table(
    title: &str,
    records: &[&OperationRecord],
    duration: fn(&OperationRecord) -> u64,
    styled: bool,
) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&heading(&format!("Top {} {title}:", records.len()), styled));
    out.push('\n');
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.pivot_transaction_id.clone().unwrap_or_default(),
                duration(r).to_string(),
                r.operation_id.clone(),
                r.locked_stores.clone(),
            ]
        })
        .collect::<Vec<_>>();
    out.push_str(&table(
        &["pivot_transaction_id", "duration_ms", "operation_id", "locked_stores"],
        &rows,
    ));

    out
}

fn heading(text: &str, styled: bool) -> String {
    if styled {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Right-aligned columns, one header line.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_row(headers.iter().copied(), &widths));
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }

    out
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(c, &w)| format!("{c:>w$}"))
        .collect::<Vec<_>>()
        .join(" ")
}
