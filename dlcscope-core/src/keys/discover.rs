use crate::keys::error::KeysError;
use glob::{Pattern, glob};
use std::path::{Path, PathBuf};

pub const CSV_GLOB: &str = "**/*.csv";

/// Every file under `root` matching `glob_pattern`, sorted.
///
/// Unreadable entries are skipped. The root itself is escaped so directory
/// names containing glob metacharacters are taken literally.
pub fn discover(root: &Path, glob_pattern: &str) -> Result<Vec<PathBuf>, KeysError> {
    let pattern = resolve_glob(root, glob_pattern);
    let mut paths: Vec<_> = glob(&pattern)
        .map_err(|e| KeysError::Glob {
            pattern: pattern.clone(),
            source: e,
        })?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    paths.sort();
    Ok(paths)
}

pub fn resolve_glob(root: &Path, pattern: &str) -> String {
    let root = Pattern::escape(&root.to_string_lossy());
    Path::new(&root).join(pattern).to_string_lossy().into_owned()
}
