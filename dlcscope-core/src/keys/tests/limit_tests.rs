use crate::keys::tests::write;
use crate::keys::{LimitSummary, limit_csv, run_keys};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;

#[test]
fn limit_csv_keeps_allowed_rows() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "in.csv", "id,tradeKey\n1,A\n2,B\n3\n4,A\n");
    let allowed = HashSet::from(["A".to_string()]);
    let output = dir.path().join("out.csv");

    // Act
    let summary = limit_csv(&dir.path().join("in.csv"), &output, "tradeKey", &allowed).unwrap();

    // Assert
    assert_eq!(summary, LimitSummary { kept: 2, removed: 2 });
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "id,tradeKey\n1,A\n4,A\n"
    );
}

#[test]
fn limit_csv_missing_column_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "in.csv", "id,other\n1,A\n");
    let output = dir.path().join("out.csv");

    let summary = limit_csv(
        &dir.path().join("in.csv"),
        &output,
        "tradeKey",
        &HashSet::from(["A".to_string()]),
    )
    .unwrap();

    assert_eq!(summary, LimitSummary::default());
    assert_eq!(fs::read_to_string(&output).unwrap(), "id,other\n");
}

#[test]
fn run_keys_mirrors_tree() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    write(&input, "day1/trades.csv", "tradeKey,pv\nA,1\nB,2\nC,3\n");
    write(&input, "day2/trades.csv", "tradeKey,pv\nC,4\nA,5\n");

    // Act
    let outcome = run_keys(&input, &output, "tradeKey", 2).unwrap();

    // Assert
    assert_eq!(outcome.files, 2);
    assert_eq!(
        outcome.allowed,
        HashSet::from(["A".to_string(), "B".to_string()])
    );
    assert_eq!(outcome.totals, LimitSummary { kept: 3, removed: 2 });
    assert_eq!(
        fs::read_to_string(output.join("day1/trades.csv")).unwrap(),
        "tradeKey,pv\nA,1\nB,2\n"
    );
    assert_eq!(
        fs::read_to_string(output.join("day2/trades.csv")).unwrap(),
        "tradeKey,pv\nA,5\n"
    );
}

#[test]
fn run_keys_without_csv_files_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir_all(&input).unwrap();
    let output = dir.path().join("out");

    let outcome = run_keys(&input, &output, "tradeKey", 2).unwrap();

    assert_eq!(outcome.files, 0);
    assert!(outcome.allowed.is_empty());
    assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
}

#[test]
fn run_keys_skips_a_broken_file_and_limits_the_rest() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("a_broken.csv"), b"tradeKey,pv\nA,1\n\xff\xfe,2\n").unwrap();
    write(&input, "b_good.csv", "tradeKey,pv\nA,3\nB,4\nC,5\n");

    // Act
    let outcome = run_keys(&input, &output, "tradeKey", 2).unwrap();

    // Assert
    assert_eq!(outcome.files, 2);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.totals, LimitSummary { kept: 2, removed: 1 });
    assert!(!output.join("a_broken.csv").exists());
    assert_eq!(
        fs::read_to_string(output.join("b_good.csv")).unwrap(),
        "tradeKey,pv\nA,3\nB,4\n"
    );
}
