use clap::{Parser, Subcommand};
use dlcscope_core::cli::{self, AnalyzeArgs, ConfigCmd, ExcerptArgs, KeysArgs};
use dlcscope_core::logging::{LogFormat, init_logging};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "dlcscope",
    version,
    about = "dlcscope: DLC operation analysis for server logs"
)]
struct Cli {
    /// Format of the diagnostic log written to stderr
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract DLC operations from a log file and report statistics
    Analyze(AnalyzeArgs),

    /// Copy the lines of a log that fall inside a time window
    Excerpt(ExcerptArgs),

    /// Keep only the rows of the first N distinct key values in a tree of CSV files
    Keys(KeysArgs),

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() -> ExitCode {
    let args = Cli::parse();
    init_logging(args.log_format);

    let result = match args.command {
        Command::Analyze(args) => cli::run_analyze(&args).map(|_| true),
        Command::Excerpt(args) => cli::run_excerpt(&args).map(|_| true),
        Command::Keys(args) => cli::run_keys(&args).map(|_| true),
        Command::Config { cmd } => cli::conf::run(cmd),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
