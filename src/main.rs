use anyhow::Result;
use clap::Parser;
use log::info;
use xtb2csv::cli;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    cli::init_logging(&args);
    info!("Starting xtb2csv v{}", env!("CARGO_PKG_VERSION"));

    cli::run(args)
}
