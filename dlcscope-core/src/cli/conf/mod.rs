mod check;
mod dump;

pub use check::*;
use clap::Subcommand;
pub use dump::*;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate a configuration file and exit
    Check {
        /// Path to the YAML configuration file
        #[arg(default_value = "config.yaml")]
        path: PathBuf,

        /// Plain output, no colors
        #[arg(short, long)]
        plain: bool,

        /// Output the validation report as JSON
        #[arg(long, conflicts_with = "plain")]
        json: bool,
    },

    /// Print the configuration file as parsed
    Dump {
        #[arg(default_value = "config.yaml")]
        path: PathBuf,

        /// Output as JSON (the default)
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },
}

pub fn run(cmd: ConfigCmd) -> anyhow::Result<bool> {
    match cmd {
        ConfigCmd::Check { path, plain, json } => check(&path, plain, json),
        ConfigCmd::Dump { path, json, yaml } => {
            dump(&path, DumpFormat::from_flags(json, yaml)).map(|_| true)
        }
    }
}
