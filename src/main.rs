//! Registry-gate: pull request gate for a line-delimited library registry.
//!
//! This is the main entry point for the `registry-gate` CLI. It parses
//! arguments, runs the check and maps errors to exit codes. Stdout carries
//! either the JSON report or a single `ERROR:` line.

mod cli;
mod commands;
pub mod access;
pub mod config;
pub mod diff;
pub mod error;
pub mod exit_codes;
pub mod git;
pub mod http;
pub mod logging;
pub mod properties;
pub mod registry;
pub mod registry_url;
pub mod request;
pub mod submission;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match commands::run(&cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // The workflow reads the failure from stdout.
            println!("ERROR: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
