use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use icon_converter::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, "convert");
    let log = Arc::new(logging::Logger::new("convert"));

    commands::convert::run(&args, &log)
}
