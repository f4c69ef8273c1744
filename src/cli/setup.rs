//! Setup and initialization functions for CLI
//!
//! Logging initialization and resolution of the effective conversion options
//! from the config file and command-line flags.

use super::args::Cli;
use crate::commands::ConvertOptions;
use crate::config::{load_config, load_config_from_path};
use anyhow::{Context, Result};
use log::LevelFilter;

/// Map the `-v` count to a log level. Warnings are always shown.
pub fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Initialize env_logger. `RUST_LOG` takes precedence over `-v`.
pub fn init_logging(verbose: u8) {
    let default_level = log_level(verbose).to_string().to_lowercase();
    let env = env_logger::Env::default().default_filter_or(default_level);
    // Tests may initialize more than once
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

/// Build conversion options: explicit `--config` file, else the nearest
/// `.covconv.toml`, with command-line flags applied on top.
pub fn resolve_options(cli: &Cli) -> Result<ConvertOptions> {
    let config = match &cli.config {
        Some(path) => load_config_from_path(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            load_config(&cwd)
        }
    };
    Ok(ConvertOptions {
        trim_prefix: cli.trim_prefix.clone().or(config.trim_prefix.clone()),
        import: config.import_options(),
    })
}
