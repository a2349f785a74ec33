//! fontdelta CLI - regression checks for font edits

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    match &cli.command {
        Commands::Build(args) => commands::build::run(args)?,
        Commands::Diff(args) => {
            let changed = commands::diff::run(args)?;
            if args.check && changed {
                return Ok(ExitCode::from(1));
            }
        },
        Commands::Batch(args) => commands::batch::run(args)?,
    }
    Ok(ExitCode::SUCCESS)
}
