//! Command implementations behind the `dlcscope` binary.
//!
//! Each subcommand parses its own flags with clap and returns
//! `anyhow::Result`, adding context to the library errors.

pub mod analyze;
pub mod conf;
pub mod excerpt;
pub mod keys;

pub use analyze::{AnalyzeArgs, AnalyzeSummary, run_analyze};
pub use conf::ConfigCmd;
pub use excerpt::{ExcerptArgs, run_excerpt};
pub use keys::{KeysArgs, run_keys};
