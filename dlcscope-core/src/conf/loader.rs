use crate::conf::error::ConfigError;
use crate::conf::types::AnalysisConfig;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = parse_config(path, &raw)?;

    tracing::info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Parses `raw` as the contents of `path`. An empty document is an empty
/// configuration.
pub fn parse_config(path: &Path, raw: &str) -> Result<AnalysisConfig, ConfigError> {
    let value: Value = serde_yaml::from_str(raw).map_err(|e| ConfigError::parse(path, e))?;

    match value {
        Value::Null => Ok(AnalysisConfig::default()),
        Value::Mapping(_) => serde_yaml::from_value(value).map_err(|e| ConfigError::parse(path, e)),
        other => Err(ConfigError::NotMapping {
            path: path.to_path_buf(),
            found: kind(&other),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
