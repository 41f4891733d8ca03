use crate::conf::load_config;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat {
    #[default]
    Json,
    Yaml,
}

impl DumpFormat {
    /// `--json` and `--yaml` conflict at the parser; neither means JSON.
    pub fn from_flags(json: bool, yaml: bool) -> Self {
        match (json, yaml) {
            (_, true) => Self::Yaml,
            (_, false) => Self::Json,
        }
    }
}

/// Prints the parsed file in `format`.
pub fn dump(path: &Path, format: DumpFormat) -> anyhow::Result<()> {
    let cfg = load_config(path)?;
    print!("{}", render_dump(&cfg, format)?);
    Ok(())
}

pub fn render_dump<T: Serialize>(value: &T, format: DumpFormat) -> anyhow::Result<String> {
    match format {
        DumpFormat::Json => dump_json(value),
        DumpFormat::Yaml => dump_yaml(value),
    }
}

fn dump_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let s = serde_json::to_string_pretty(value)?;
    Ok(format!("{s}\n"))
}

fn dump_yaml<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_yaml::to_string(value)?)
}
