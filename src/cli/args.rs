use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "covconv")]
#[command(about = "Convert and merge code coverage files", long_about = None)]
#[command(
    after_help = "Formats are chosen by extension: .gocov (Go cover profile, input only), \
                  .lcov (LCOV, input and output), .json (Codecov JSON, output only)."
)]
#[command(version)]
pub struct Cli {
    /// Input coverage files; counts for the same line are summed across inputs
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Output file
    pub output: PathBuf,

    /// Trim prefix from filenames
    #[arg(long = "trim-prefix", value_name = "PREFIX")]
    pub trim_prefix: Option<String>,

    /// Configuration file (defaults to the nearest .covconv.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
