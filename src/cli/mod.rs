//! CLI module for covconv
//!
//! - Argument parsing (`args`)
//! - Runtime setup: logging and configuration (`setup`)

pub mod args;
pub mod setup;

pub use args::Cli;
pub use setup::{init_logging, log_level, resolve_options};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
