use crate::keys::tests::write;
use crate::keys::{CSV_GLOB, discover, discover_unique_values, resolve_glob};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::path::Path;

#[test]
fn discover_finds_nested_csv_sorted() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b.csv", "k\n1\n");
    write(dir.path(), "a/z.csv", "k\n1\n");
    write(dir.path(), "a/deeper/y.csv", "k\n1\n");
    write(dir.path(), "notes.txt", "ignored");

    // Act
    let files = discover(dir.path(), CSV_GLOB).unwrap();

    // Assert
    let relative = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect::<Vec<_>>();
    assert_eq!(relative, vec!["a/deeper/y.csv", "a/z.csv", "b.csv"]);
}

#[test]
fn resolve_glob_escapes_root() {
    let resolved = resolve_glob(Path::new("/data/[2026]"), "*.csv");

    assert_eq!(resolved, "/data/[[]2026[]]/*.csv");
}

#[test]
fn unique_values_stop_at_limit() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "1.csv", "tradeKey,value\nA,1\nA,2\nB,3\n");
    write(dir.path(), "2.csv", "tradeKey,value\nC,1\nD,2\n");
    let files = discover(dir.path(), CSV_GLOB).unwrap();

    let allowed = discover_unique_values(&files, "tradeKey", 3);

    assert_eq!(
        allowed,
        HashSet::from(["A".to_string(), "B".to_string(), "C".to_string()])
    );
}

#[test]
fn files_without_column_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "1.csv", "other\nX\n");
    write(dir.path(), "2.csv", "");
    write(dir.path(), "3.csv", "tradeKey\nA\n");
    let files = discover(dir.path(), CSV_GLOB).unwrap();

    let allowed = discover_unique_values(&files, "tradeKey", 10);

    assert_eq!(allowed, HashSet::from(["A".to_string()]));
}
