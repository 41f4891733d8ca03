use crate::conf::{AnalysisConfig, AnalyzeSettings, ConfigError, load_config, validate};
use crate::excerpt::{TimeWindow, reduce_log_file};
use crate::logging::stdout_is_terminal;
use crate::report::{render_analysis, write_reports};
use crate::scan::{ReopenPolicy, ScanConfig, ScanError, ScanOutcome, scan_file};
use crate::stats::{slowest, summarize};
use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Path to a YAML configuration file supplying defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the input log file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Threshold in milliseconds for capturing slow operations
    #[arg(short, long)]
    pub threshold: Option<u64>,

    /// Side file receiving the lines of slow operations
    #[arg(short = 'o', long)]
    pub output_log: Option<PathBuf>,

    /// Number of slowest operations to report
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Directory receiving the CSV reports
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Start of the time window to analyze
    #[arg(short, long)]
    pub start_time: Option<String>,

    /// End of the time window to analyze
    #[arg(short, long)]
    pub end_time: Option<String>,

    /// chrono format of the window bounds and of the line timestamps
    #[arg(long)]
    pub time_format: Option<String>,

    /// Keep the reduced log file after analysis
    #[arg(long)]
    pub keep_reduced: bool,

    /// What to do when an operation starts on a thread that already has one open
    #[arg(long, value_enum)]
    pub reopen_policy: Option<ReopenPolicy>,
}

impl AnalyzeArgs {
    /// Flags as a configuration layer; unset flags leave the file value.
    pub fn overrides(&self) -> AnalysisConfig {
        AnalysisConfig {
            input: self.input.clone(),
            threshold: self.threshold,
            output_log: self.output_log.clone(),
            output_dir: self.output_dir.clone(),
            top_n: self.top_n,
            time_format: self.time_format.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            keep_reduced: self.keep_reduced.then_some(true),
            reopen_policy: self.reopen_policy,
        }
    }

    /// Config file, then flags, then built-in defaults.
    pub fn settings(&self) -> Result<AnalyzeSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!(path = %path.display(), "using configuration file");
                load_config(path)?
            }
            None => AnalysisConfig::default(),
        };
        let merged = file.merge(self.overrides());

        let report = validate(&merged);
        for issue in &report.warnings {
            tracing::warn!(field = issue.field, "{}", issue.message);
        }
        if report.has_errors() {
            eprint!("{}", report.render_plain());
            return Err(ConfigError::Invalid {
                errors: report.errors.len(),
            }
            .into());
        }

        Ok(merged.resolve()?)
    }
}

/// What an `analyze` run produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalyzeSummary {
    pub operations: usize,
    pub slow_written: usize,
    pub still_open: usize,
    pub reports: Vec<PathBuf>,
    /// Reduced log left on disk, with `keep_reduced`.
    pub reduced_log: Option<PathBuf>,
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzeSummary> {
    let settings = args.settings()?;
    analyze(&settings)
}

/// Runs one analysis with resolved settings.
pub fn analyze(settings: &AnalyzeSettings) -> Result<AnalyzeSummary> {
    let reduced = match &settings.window {
        Some(range) => Some(reduce_input(settings, &range.start, &range.end)?),
        None => None,
    };
    let analysis_input = reduced.as_deref().unwrap_or(settings.input.as_path());

    println!("Extracting DLC operations from {}...", analysis_input.display());
    let scanned = scan_file(
        analysis_input,
        &ScanConfig {
            threshold_ms: settings.threshold_ms,
            slow_log: settings.output_log.clone(),
            reopen_policy: settings.reopen_policy,
        },
    );

    let mut summary = AnalyzeSummary::default();
    match reduced {
        Some(path) if settings.keep_reduced => summary.reduced_log = Some(path),
        Some(path) => {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove reduced log {}", path.display()))?;
            println!("Removed reduced log file: {}", path.display());
        }
        None => {}
    }

    let outcome = scanned.map_err(|err| {
        if let ScanError::Interrupted { partial, .. } = &err {
            tracing::warn!(completed = partial.len(), "scan interrupted, discarding partial results");
        }
        err
    })?;

    report(settings, outcome, summary)
}

fn reduce_input(settings: &AnalyzeSettings, start: &str, end: &str) -> Result<PathBuf> {
    let window = TimeWindow::parse(start, end, &settings.time_format)?;
    let reduced = reduced_log_path(&settings.input, &settings.output_dir);
    fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!("failed to create output directory {}", settings.output_dir.display())
    })?;

    println!("Reducing log file between {start} and {end}...");
    reduce_log_file(&settings.input, &reduced, &window)?;
    Ok(reduced)
}

/// `reduced_log_<input file name>` inside the output directory.
pub fn reduced_log_path(input: &Path, output_dir: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input.log".to_string());
    output_dir.join(format!("reduced_log_{name}"))
}

fn report(
    settings: &AnalyzeSettings,
    outcome: ScanOutcome,
    mut summary: AnalyzeSummary,
) -> Result<AnalyzeSummary> {
    summary.operations = outcome.records.len();
    summary.slow_written = outcome.slow_written;
    summary.still_open = outcome.still_open;

    let Some(summaries) = summarize(&outcome.records) else {
        println!("No DLC operations found in the log file.");
        return Ok(summary);
    };
    let top = slowest(&outcome.records, settings.top_n);

    print!("{}", render_analysis(&summaries, &top, stdout_is_terminal()));

    if let Some(path) = &settings.output_log {
        println!(
            "\n{} slow operations written to {}",
            outcome.slow_written,
            path.display()
        );
    }

    summary.reports = write_reports(&settings.output_dir, &outcome.records, &summaries, &top)?;
    println!();
    for path in &summary.reports {
        println!("Report saved to {}", path.display());
    }

    Ok(summary)
}
