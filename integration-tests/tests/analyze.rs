use dlcscope_core::cli::analyze::{AnalyzeArgs, analyze, reduced_log_path, run_analyze};
use dlcscope_core::conf::{AnalysisConfig, TimeRange};
use dlcscope_core::report::{DETAILED_REPORT_FILE, SUMMARY_FILE};
use integration_tests::harness::{FIXTURE_LOG, fixture_path};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn settings(output_dir: &Path) -> dlcscope_core::conf::AnalyzeSettings {
    AnalysisConfig {
        input: Some(fixture_path(FIXTURE_LOG)),
        output_dir: Some(output_dir.to_path_buf()),
        ..Default::default()
    }
    .resolve()
    .unwrap()
}

fn window() -> TimeRange {
    TimeRange {
        start: "2026-01-29 10:04:00.000".to_string(),
        end: "2026-01-29 10:11:00.000".to_string(),
    }
}

#[test]
fn analyze_writes_reports() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");

    // Act
    let summary = analyze(&settings(&out)).unwrap();

    // Assert
    assert_eq!(summary.operations, 4);
    assert_eq!(summary.still_open, 1);
    assert_eq!(summary.reports.len(), 6);
    assert_eq!(summary.reduced_log, None);

    let detailed = fs::read_to_string(out.join(DETAILED_REPORT_FILE)).unwrap();
    assert_eq!(detailed.lines().count(), 5);

    let stats = fs::read_to_string(out.join(SUMMARY_FILE)).unwrap();
    assert!(stats.contains("DLC operation duration,300,8000,3200.0"));
}

#[test]
fn analyze_time_window_removes_reduced_log() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");
    let mut settings = settings(&out);
    settings.window = Some(window());

    let summary = analyze(&settings).unwrap();

    assert_eq!(summary.operations, 2);
    assert_eq!(summary.still_open, 0);
    assert!(!reduced_log_path(&settings.input, &out).exists());
}

#[test]
fn analyze_keeps_reduced_log_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");
    let mut settings = settings(&out);
    settings.window = Some(window());
    settings.keep_reduced = true;

    let summary = analyze(&settings).unwrap();

    let reduced = summary.reduced_log.unwrap();
    assert_eq!(reduced, out.join("reduced_log_dlc_run.log"));
    let content = fs::read_to_string(&reduced).unwrap();
    assert!(content.starts_with("2026-01-29 10:05:00.000"));
    assert!(content.contains("NumberFormatException"));
    assert!(!content.contains("10:20:00.000"));
}

#[test]
fn window_without_operations_writes_no_reports() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");
    let mut settings = settings(&out);
    settings.window = Some(TimeRange {
        start: "2026-01-29 10:40:00.000".to_string(),
        end: "2026-01-29 10:50:00.000".to_string(),
    });

    let summary = analyze(&settings).unwrap();

    assert_eq!(summary.operations, 0);
    assert!(summary.reports.is_empty());
    assert!(!out.join(SUMMARY_FILE).exists());
}

#[test]
fn run_analyze_merges_config_file_and_flags() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports");
    let slow_log = dir.path().join("slow.log");
    let config = dir.path().join("config.yaml");
    fs::write(
        &config,
        format!(
            "input: {}\nthreshold: 1000\noutput_log: {}\noutput_dir: {}\ntop_n: 10\n",
            fixture_path(FIXTURE_LOG).display(),
            slow_log.display(),
            out.display()
        ),
    )
    .unwrap();
    let args = AnalyzeArgs {
        config: Some(config),
        threshold: Some(5000),
        ..Default::default()
    };

    // Act
    let summary = run_analyze(&args).unwrap();

    // Assert
    assert_eq!(summary.operations, 4);
    // the flag threshold wins over the file one
    assert_eq!(summary.slow_written, 1);
    assert!(slow_log.is_file());
    assert!(out.join(SUMMARY_FILE).is_file());
}

#[test]
fn run_analyze_without_input_fails() {
    let args = AnalyzeArgs::default();

    let err = run_analyze(&args).unwrap_err();

    assert!(err.to_string().contains("no input log given"));
}

#[test]
fn run_analyze_rejects_invalid_settings() {
    let args = AnalyzeArgs {
        input: Some(fixture_path(FIXTURE_LOG)),
        top_n: Some(0),
        ..Default::default()
    };

    let err = run_analyze(&args).unwrap_err();

    assert!(err.to_string().contains("invalid configuration"));
}
