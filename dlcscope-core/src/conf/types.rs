use crate::conf::error::ConfigError;
use crate::excerpt::DEFAULT_TIME_FORMAT;
use crate::scan::ReopenPolicy;
use crate::stats::DEFAULT_TOP_N;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// File model of the analysis configuration. Every key is optional; the same
/// type carries command line overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,

    /// Slow operation threshold, milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u64>,

    /// Side file receiving the lines of slow operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_log: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_reduced: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reopen_policy: Option<ReopenPolicy>,
}

impl AnalysisConfig {
    /// `overrides` wins wherever it sets a value.
    pub fn merge(self, overrides: AnalysisConfig) -> AnalysisConfig {
        AnalysisConfig {
            input: overrides.input.or(self.input),
            threshold: overrides.threshold.or(self.threshold),
            output_log: overrides.output_log.or(self.output_log),
            output_dir: overrides.output_dir.or(self.output_dir),
            top_n: overrides.top_n.or(self.top_n),
            time_format: overrides.time_format.or(self.time_format),
            start_time: overrides.start_time.or(self.start_time),
            end_time: overrides.end_time.or(self.end_time),
            keep_reduced: overrides.keep_reduced.or(self.keep_reduced),
            reopen_policy: overrides.reopen_policy.or(self.reopen_policy),
        }
    }

    /// Fills built-in defaults. The input log is the only required value.
    pub fn resolve(self) -> Result<AnalyzeSettings, ConfigError> {
        let input = self.input.ok_or(ConfigError::MissingInput)?;

        // a half-open window disables the excerpt step
        let window = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(TimeRange { start, end }),
            _ => None,
        };

        Ok(AnalyzeSettings {
            input,
            threshold_ms: self.threshold,
            output_log: self.output_log,
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            top_n: self.top_n.unwrap_or(DEFAULT_TOP_N),
            time_format: self
                .time_format
                .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string()),
            window,
            keep_reduced: self.keep_reduced.unwrap_or(false),
            reopen_policy: self.reopen_policy.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// Fully resolved settings of one `analyze` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeSettings {
    pub input: PathBuf,
    pub threshold_ms: Option<u64>,
    pub output_log: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub top_n: usize,
    pub time_format: String,
    pub window: Option<TimeRange>,
    pub keep_reduced: bool,
    pub reopen_policy: ReopenPolicy,
}
