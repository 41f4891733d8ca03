use crate::report::tests::record;
use crate::report::{render_analysis, render_summary};
use crate::stats::{slowest, summarize};
use pretty_assertions::assert_eq;

#[test]
fn summary_table_is_right_aligned() {
    let records = vec![record("1", 0, 100, 40), record("2", 1, 300, 80)];
    let summaries = summarize(&records).unwrap();

    let out = render_summary(&summaries);

    assert_eq!(
        out,
        "                 Metric Min (ms) Max (ms) Average (ms)\n\
         \x20DLC operation duration      100      300        200.0\n\
         AP Transaction duration       40       80         60.0\n\
         \x20    AP Commit duration        4        8          6.0\n"
    );
}

#[test]
fn analysis_lists_slowest_first() {
    // Arrange
    let records = vec![
        record("1", 0, 100, 40),
        record("2", 1, 900, 10),
        record("3", 2, 500, 70),
    ];
    let summaries = summarize(&records).unwrap();
    let reports = slowest(&records, 2);

    // Act
    let out = render_analysis(&summaries, &reports, false);

    // Assert
    assert!(out.starts_with("DLC Operations Summary Statistics:\n"));
    assert!(out.contains("Top 2 Slowest DLC Operations:"));
    assert!(out.contains("Top 2 Slowest Transactions:"));
    assert!(out.contains("Top 2 Slowest Commits:"));

    let ops = out
        .split("Top 2 Slowest DLC Operations:\n")
        .nth(1)
        .unwrap()
        .lines()
        .skip(1)
        .take(2)
        .map(|l| l.split_whitespace().next().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(ops, vec!["2", "3"]);
}

#[test]
fn plain_output_has_no_escape_codes() {
    let records = vec![record("1", 0, 100, 40)];
    let summaries = summarize(&records).unwrap();
    let reports = slowest(&records, 5);

    let plain = render_analysis(&summaries, &reports, false);
    let styled = render_analysis(&summaries, &reports, true);

    assert!(!plain.contains('\x1b'));
    assert!(styled.contains('\x1b'));
}
