//! Adbrun: locate and run Android SDK command-line tools.
//!
//! This is the main entry point for the `adbrun` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes. Diagnostics go to stderr; stdout carries only command
//! payload (device lists, captured tool output, operation results).

mod cli;
mod commands;
pub mod adb;
pub mod error;
pub mod exit_codes;
pub mod locator;
pub mod ops;
pub mod process;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(code) => ExitCode::from(exit_codes::to_process_exit(code)),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(exit_codes::to_process_exit(err.exit_code()))
        }
    }
}
