use dlcscope_core::scan::{OperationType, ReopenPolicy, ScanConfig, ScanError, scan_file};
use dlcscope_core::stats::{Metric, slowest, summarize};
use integration_tests::harness::{FIXTURE_LOG, capture_events, fixture_path};
use pretty_assertions::assert_eq;
use std::fs;
use tracing::Level;

fn ids(records: &[&dlcscope_core::scan::OperationRecord]) -> Vec<String> {
    records.iter().map(|r| r.operation_id.clone()).collect()
}

#[test]
fn fixture_log_yields_completed_operations() {
    // Arrange
    let path = fixture_path(FIXTURE_LOG);

    // Act
    let outcome = scan_file(&path, &ScanConfig::default()).unwrap();

    // Assert
    let records = &outcome.records;
    assert_eq!(
        records.iter().map(|r| r.operation_id.as_str()).collect::<Vec<_>>(),
        vec!["0", "1", "2", "4"]
    );
    assert_eq!(outcome.still_open, 1);
    assert_eq!(outcome.lines_read, 30);

    assert_eq!(
        records.iter().map(|r| r.dlc_duration_ms).collect::<Vec<_>>(),
        vec![2500, 8000, 300, 2000]
    );

    let colored = &records[0];
    assert_eq!(colored.thread, "main");
    assert_eq!(colored.topic, "StaticTopic");
    assert_eq!(colored.pivot_transaction_id.as_deref(), Some("3"));
    assert_eq!(colored.pivot_transaction_duration_ms, 500);
    assert_eq!(colored.pivot_commit_duration_ms, 200);
    assert_eq!(colored.ds_transaction_duration_ms, 2000);

    let trades = &records[1];
    assert_eq!(trades.scope, "AsOfDate=2026-01-23");
    assert_eq!(trades.locked_stores, "Trades, Sensi");
    assert_eq!(trades.pivots_joined(), "PLCube;VaR-ES Cube");
    assert_eq!(trades.pivot_transaction_duration_ms, 1600);
    assert_eq!(trades.pivot_commit_duration_ms, 350);
    assert_eq!(trades.ds_commit_duration_ms, 400);

    let unload = &records[2];
    assert_eq!(unload.operation_type, OperationType::Unload);
    assert!(unload.pivots.is_empty());
    assert_eq!(unload.ds_transaction_id.as_deref(), Some("5"));

    assert_eq!(records[3].pivot_transaction_id.as_deref(), Some("6"));
}

#[test]
fn fixture_statistics() {
    let outcome = scan_file(&fixture_path(FIXTURE_LOG), &ScanConfig::default()).unwrap();

    let summaries = summarize(&outcome.records).unwrap();
    let top = slowest(&outcome.records, 2);

    assert_eq!(summaries[0].metric, Metric::DlcDuration);
    assert_eq!(summaries[0].min_ms, 300);
    assert_eq!(summaries[0].max_ms, 8000);
    assert!((summaries[0].mean_ms - 3200.0).abs() < 1e-9);
    assert_eq!(summaries[1].max_ms, 1600);

    assert_eq!(ids(&top.operations), vec!["1", "0"]);
    assert_eq!(ids(&top.transactions), vec!["1", "0"]);
    assert_eq!(ids(&top.commits), vec!["1", "0"]);
}

#[test]
fn slow_operations_go_to_side_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let slow_log = dir.path().join("slow.log");
    let config = ScanConfig {
        threshold_ms: Some(5000),
        slow_log: Some(slow_log.clone()),
        reopen_policy: ReopenPolicy::DiscardSilently,
    };

    // Act
    let outcome = scan_file(&fixture_path(FIXTURE_LOG), &config).unwrap();

    // Assert
    assert_eq!(outcome.slow_written, 1);
    let written = fs::read_to_string(&slow_log).unwrap();
    assert!(written.starts_with("\n---- SLOW DLC OP: 1 (8000ms) ----\n"));
    assert!(written.contains("operation_id=1"));
    assert!(written.contains("Parse failure on line 12"));
    assert!(written.contains("Finishing LOAD operation, id 1."));
    assert!(!written.contains("operation_id=0"));
    assert!(!written.contains("transaction_id=4"));
}

#[test]
fn replaced_operation_is_reported_with_warning_policy() {
    let config = ScanConfig {
        reopen_policy: ReopenPolicy::DiscardWithWarning,
        ..Default::default()
    };

    let (outcome, events) = capture_events(|| scan_file(&fixture_path(FIXTURE_LOG), &config));

    let outcome = outcome.unwrap();
    assert_eq!(outcome.records.len(), 4);
    let warnings = events
        .iter()
        .filter(|e| e.level == Level::WARN)
        .collect::<Vec<_>>();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("operation_id"), Some("3"));
    assert_eq!(warnings[0].field("thread"), Some("main"));
}

#[test]
fn silent_policy_emits_no_warning() {
    let (outcome, events) =
        capture_events(|| scan_file(&fixture_path(FIXTURE_LOG), &ScanConfig::default()));

    assert_eq!(outcome.unwrap().records.len(), 4);
    assert!(events.iter().all(|e| e.level != Level::WARN));
    assert!(
        events
            .iter()
            .any(|e| e.message() == Some("log file processed"))
    );
}

#[test]
fn missing_log_is_an_open_error() {
    let err = scan_file(&fixture_path("does_not_exist.log"), &ScanConfig::default()).unwrap_err();

    assert!(matches!(err, ScanError::Open { .. }));
}
