use std::path::PathBuf;

/// A DLC run with five operations: one colored, one with a stack trace, one
/// replaced by a second start on the same thread, and one never finished.
pub const FIXTURE_LOG: &str = "dlc_run.log";

pub fn fixture_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(file)
}
