use crate::conf::types::AnalysisConfig;
use crate::excerpt::{DEFAULT_TIME_FORMAT, TimeWindow, TimestampMatcher};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Configuration key the issue is about.
    pub field: &'static str,
    pub message: String,
    pub help: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    fn error(&mut self, field: &'static str, message: String, help: Option<&str>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            field,
            message,
            help: help.map(str::to_string),
        });
    }

    fn warning(&mut self, field: &'static str, message: String, help: Option<&str>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            field,
            message,
            help: help.map(str::to_string),
        });
    }

    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let severity = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            out.push_str(&format!("{}: {}: {}\n", issue.field, severity, issue.message));
            if let Some(help) = &issue.help {
                out.push_str(&format!("  help: {help}\n"));
            }
        }
        out
    }

    pub fn render_pretty(&self) -> String {
        let mut out = String::new();

        if self.has_violations() {
            out.push_str(&format!(
                "configuration check found {} errors, {} warnings\n\n",
                self.errors.len(),
                self.warnings.len()
            ));
        }

        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let label = match issue.severity {
                Severity::Error => "error".red().bold().to_string(),
                Severity::Warning => "warning".yellow().bold().to_string(),
            };
            out.push_str(&format!("  {label}: {} ({})\n", issue.message, issue.field));
            if let Some(help) = &issue.help {
                out.push_str(&format!("    help: {help}\n"));
            }
            out.push('\n');
        }

        out
    }
}

/// Checks a merged configuration without touching the input log.
///
/// Errors make an `analyze` run impossible; warnings flag settings that are
/// accepted but have no effect.
pub fn validate(config: &AnalysisConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.input.is_none() {
        report.warning(
            "input",
            "no input log configured".to_string(),
            Some("Pass --input on the command line."),
        );
    }

    if config.top_n == Some(0) {
        report.error("top_n", "top_n must be at least 1".to_string(), None);
    }

    match (config.threshold, &config.output_log) {
        (Some(threshold), None) => report.warning(
            "threshold",
            format!("threshold of {threshold}ms set without output_log"),
            Some("Slow operations are only captured when both threshold and output_log are set."),
        ),
        (None, Some(path)) => report.warning(
            "output_log",
            format!("output_log {} set without threshold", path.display()),
            Some("Slow operations are only captured when both threshold and output_log are set."),
        ),
        _ => {}
    }

    let format = config.time_format.as_deref().unwrap_or(DEFAULT_TIME_FORMAT);
    if let Err(e) = TimestampMatcher::new(format) {
        report.error("time_format", e.to_string(), None);
        return report;
    }

    match (&config.start_time, &config.end_time) {
        (Some(start), Some(end)) => {
            if let Err(e) = TimeWindow::parse(start, end, format) {
                report.error("start_time", e.to_string(), None);
            }
        }
        (Some(_), None) | (None, Some(_)) => report.warning(
            "start_time",
            "only one end of the time window is set, the log will not be reduced".to_string(),
            Some("Set both start_time and end_time to analyze an excerpt."),
        ),
        (None, None) => {}
    }

    report
}
