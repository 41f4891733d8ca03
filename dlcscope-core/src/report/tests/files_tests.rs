use crate::report::tests::record;
use crate::report::{
    DETAILED_REPORT_FILE, OPERATIONS_REPORT_FILE, ReportError, SUMMARY_FILE, write_reports,
};
use crate::stats::{slowest, summarize};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn writes_all_report_files() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("output");
    let records = vec![record("1", 0, 100, 40), record("2", 5, 300, 80)];
    let summaries = summarize(&records).unwrap();
    let reports = slowest(&records, 5);

    // Act
    let written = write_reports(&out_dir, &records, &summaries, &reports).unwrap();

    // Assert
    let names = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            OPERATIONS_REPORT_FILE,
            DETAILED_REPORT_FILE,
            SUMMARY_FILE,
            "slowest_dlc_operations_dlc_slowest_operations.csv",
            "slowest_transactions_dlc_slowest_operations.csv",
            "slowest_commits_dlc_slowest_operations.csv",
        ]
    );
    for path in &written {
        assert!(path.starts_with(&out_dir));
        assert!(path.is_file());
    }
}

#[test]
fn operations_report_is_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![record("1", 0, 100, 40), record("2", 5, 300, 80)];
    let summaries = summarize(&records).unwrap();
    let reports = slowest(&records, 5);

    write_reports(dir.path(), &records, &summaries, &reports).unwrap();

    let sorted = fs::read_to_string(dir.path().join(OPERATIONS_REPORT_FILE)).unwrap();
    let detailed = fs::read_to_string(dir.path().join(DETAILED_REPORT_FILE)).unwrap();
    let first_id = |csv: &str| csv.lines().nth(1).unwrap().split(',').nth(1).unwrap().to_string();

    assert_eq!(first_id(&sorted), "2");
    assert_eq!(first_id(&detailed), "1");
}

#[test]
fn operation_row_columns() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![record("7", 0, 250, 40)];
    let summaries = summarize(&records).unwrap();
    let reports = slowest(&records, 5);

    write_reports(dir.path(), &records, &summaries, &reports).unwrap();

    let detailed = fs::read_to_string(dir.path().join(DETAILED_REPORT_FILE)).unwrap();
    let mut lines = detailed.lines();
    assert_eq!(
        lines.next().unwrap(),
        "thread,operation_id,operation_type,topic,scope,locked_stores,start_time,end_time,\
         pivots,ds_transaction_id,ds_transaction_duration_ms,ds_commit_duration_ms,\
         pivot_transaction_id,pivot_transaction_duration_ms,pivot_commit_duration_ms,\
         dlc_duration_ms"
    );
    assert_eq!(
        lines.next().unwrap(),
        "main,7,LOAD,Trades,{AsOfDate=2026-01-29},\"Trades, Sensi\",\
         2026-01-29 10:00:00.000,2026-01-29 10:00:00.250,Sensi;VaR,71,0,0,71,40,4,250"
    );
}

#[test]
fn summary_file_uses_metric_labels() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![record("1", 0, 100, 40), record("2", 5, 300, 80)];
    let summaries = summarize(&records).unwrap();
    let reports = slowest(&records, 5);

    write_reports(dir.path(), &records, &summaries, &reports).unwrap();

    let summary = fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap();
    assert_eq!(
        summary,
        "Metric,Min (ms),Max (ms),Average (ms)\n\
         DLC operation duration,100,300,200.0\n\
         AP Transaction duration,40,80,60.0\n\
         AP Commit duration,4,8,6.0\n"
    );
}

#[test]
fn unwritable_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "x").unwrap();
    let records = vec![record("1", 0, 100, 40)];
    let summaries = summarize(&records).unwrap();
    let reports = slowest(&records, 5);

    let err = write_reports(&blocker.join("sub"), &records, &summaries, &reports).unwrap_err();

    assert!(matches!(err, ReportError::CreateDir { .. }));
}
