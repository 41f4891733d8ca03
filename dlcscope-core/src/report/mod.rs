//! Console and CSV output of a finished analysis.

mod error;
mod files;
mod render;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use files::{
    DETAILED_REPORT_FILE, OPERATIONS_REPORT_FILE, SLOWEST_SUFFIX, SUMMARY_FILE, write_reports,
};
pub use render::{render_analysis, render_slowest, render_summary};
