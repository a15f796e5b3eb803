#![forbid(unsafe_code)]

//! # Retheme CLI
//!
//! Swaps the styles of a design document's selected frames between theme
//! variants.
//!
//! ## Usage
//!
//! ```bash
//! retheme apply design.json            # Retheme the saved selection
//! retheme apply design.json -s 1:0     # Retheme one frame
//! retheme sync design.json             # Remember the document's style keys
//! retheme check "Pro/Night"            # Show how a theme path expands
//! ```

mod cli;
mod commands;
mod config;
mod logging;
mod report;

use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Command};
use config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(commands::EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(cli)?;
    config.validate()?;
    logging::init(config.verbosity);
    colored::control::set_override(config.use_color());
    tracing::debug!(?config, "Configuration resolved");

    match &cli.command {
        Command::Apply(args) => commands::apply(args, &config),
        Command::Sync(args) => commands::sync(args, &config),
        Command::Check(args) => Ok(commands::check(args)),
    }
}
