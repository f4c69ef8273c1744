use anyhow::Result;
use covconv::cli::{self, Cli};
use covconv::commands::convert;

fn main() {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(2);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli::resolve_options(cli)?;
    convert(&cli.inputs, &cli.output, &options)
}
