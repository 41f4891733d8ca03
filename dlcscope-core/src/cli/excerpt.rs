use crate::excerpt::{DEFAULT_TIME_FORMAT, ExcerptSummary, TimeWindow, reduce_log_file};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ExcerptArgs {
    /// Path to the input log file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path of the reduced log to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Start of the time window
    #[arg(short, long)]
    pub start_time: String,

    /// End of the time window
    #[arg(short, long)]
    pub end_time: String,

    /// chrono format of the bounds and of the line timestamps
    #[arg(long, default_value = DEFAULT_TIME_FORMAT)]
    pub time_format: String,
}

pub fn run_excerpt(args: &ExcerptArgs) -> Result<ExcerptSummary> {
    let window = TimeWindow::parse(&args.start_time, &args.end_time, &args.time_format)?;
    let summary = reduce_log_file(&args.input, &args.output, &window)?;

    println!(
        "Kept {} of {} lines in {}",
        summary.kept_lines,
        summary.lines_read,
        args.output.display()
    );
    Ok(summary)
}
