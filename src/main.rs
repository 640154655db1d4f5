//! `themeconf` binary entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use themeconf_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    if matches!(args.command, cli::Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let name = args.command.name();
    logging::init_subscriber(args.verbose, name);
    let log = Arc::new(logging::Logger::new(name));

    match &args.command {
        cli::Command::Set(opts) => commands::set::run(&args.global, opts, &log),
        cli::Command::Status(opts) => commands::status::run(&args.global, opts, &log),
        cli::Command::Version => Ok(()),
    }
}
