use crate::conf::{ConfigError, load_config, validate};
use owo_colors::OwoColorize;
use std::path::Path;

/// Loads and validates `path`. Returns whether the configuration is usable.
pub fn check(path: &Path, plain: bool, json: bool) -> anyhow::Result<bool> {
    let cfg = match load_config(path) {
        Ok(cfg) => cfg,
        Err(err) => {
            print_config_error(&err);
            return Ok(false);
        }
    };

    let report = validate(&cfg);

    if json {
        println!("{}", report.render_json()?);
    } else if plain {
        print!("{}", report.render_plain());
    } else {
        print!("{}", report.render_pretty());
    }

    if report.has_errors() {
        return Ok(false);
    }

    if !json {
        let ok = if plain {
            "ok".to_string()
        } else {
            "✔".green().to_string()
        };
        println!("{ok} Config loaded successfully");
        match &cfg.input {
            Some(input) => println!("{ok} input: {}", input.display()),
            None => println!("{ok} input: <from command line>"),
        }
        if cfg.start_time.is_some() && cfg.end_time.is_some() {
            println!("{ok} log will be reduced to the configured time window");
        }
    }

    Ok(true)
}

fn print_config_error(err: &ConfigError) {
    eprintln!("{err}");
    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::NotMapping { .. } => Some(
            "The configuration file must be a mapping of keys to values.\n\
             \n\
             Example:\n\
             \n\
             input: logs/server.log\n\
             threshold: 2000\n\
             output_log: slow_operations.log",
        ),

        ConfigError::Parse { .. } => Some(
            "Known keys are: input, threshold, output_log, output_dir, top_n,\n\
             time_format, start_time, end_time, keep_reduced, reopen_policy.",
        ),

        ConfigError::MissingInput => Some("Pass --input or set 'input' in the config file."),

        _ => None,
    }
}
