//! Analysis configuration.
//!
//! A YAML file supplies defaults for `dlcscope analyze`; command line flags
//! override it field by field. Resolution turns the merged file model into
//! [`AnalyzeSettings`], filling built-in defaults.

mod error;
mod loader;
mod types;
mod validation;


pub use error::ConfigError;
pub use loader::{load_config, parse_config};
pub use types::{AnalysisConfig, AnalyzeSettings, DEFAULT_OUTPUT_DIR, TimeRange};
pub use validation::{Severity, ValidationIssue, ValidationReport, validate};
