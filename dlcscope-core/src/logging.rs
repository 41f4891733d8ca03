use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Output format of the diagnostic log. Reports always go to stdout; the
/// diagnostic log goes to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human readable, colored on a terminal.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Initialize the logging system with environment-based filtering
///
/// - Uses `RUST_LOG` for level filtering (defaults to "info" if not set)
/// - JSON output flattens event fields for cleaner log output
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .init(),
        LogFormat::Json => fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .flatten_event(true)
            .init(),
    }
}

/// Whether console reports should be styled.
pub fn stdout_is_terminal() -> bool {
    io::stdout().is_terminal()
}
