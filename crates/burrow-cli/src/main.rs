//! # burrow — unprivileged namespace launcher
//!
//! `burrow run <command> [args...]` starts the command as root of its own
//! UTS, user, mount and PID namespaces, chrooted into the configured
//! directory with a private `/proc`.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

mod commands;

use std::ffi::OsString;
use std::process::ExitCode;

use burrow_common::constants::BIN_NAME;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;

fn main() -> ExitCode {
    let args: Vec<OsString> = std::env::args_os().collect();
    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) if commands::is_unrecognized_command(&e, &args) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{}", commands::noop_message());
            }
            return ExitCode::SUCCESS;
        }
        Err(e) => e.exit(),
    };

    init_tracing(cli.verbose);

    match commands::execute(cli) {
        Ok(code) => u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from),
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("{BIN_NAME}: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr so the target command owns stdout.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
