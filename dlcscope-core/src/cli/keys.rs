use crate::keys::{KeysOutcome, run_keys as limit_tree};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct KeysArgs {
    /// Directory containing the CSV files, searched recursively
    #[arg(short = 'd', long)]
    pub input_dir: PathBuf,

    /// Directory receiving the filtered CSV files
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Exact header of the column to limit on
    #[arg(short, long)]
    pub column: String,

    /// Maximum number of distinct column values to keep
    #[arg(short, long)]
    pub limit: usize,
}

pub fn run_keys(args: &KeysArgs) -> Result<KeysOutcome> {
    let outcome = limit_tree(&args.input_dir, &args.output_dir, &args.column, args.limit)?;

    if outcome.files == 0 {
        println!("No CSV files found in {}", args.input_dir.display());
    } else if outcome.allowed.is_empty() {
        println!("No values of '{}' were discovered", args.column);
    } else {
        println!(
            "Kept {} distinct '{}' values across {} files: {} rows kept, {} removed",
            outcome.allowed.len(),
            args.column,
            outcome.files,
            outcome.totals.kept,
            outcome.totals.removed
        );
        if outcome.skipped > 0 {
            println!("{} files could not be limited, see the log", outcome.skipped);
        }
    }
    Ok(outcome)
}
