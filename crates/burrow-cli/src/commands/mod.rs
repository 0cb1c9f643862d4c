//! CLI command definitions and dispatch.

pub mod child;
pub mod run;

use std::ffi::OsString;
use std::path::PathBuf;

use burrow_common::config::LaunchConfig;
use burrow_common::constants::{BIN_NAME, CONFIG_ENV, ROOTFS_ENV};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

/// burrow — run a command inside fresh Linux namespaces without privileges.
#[derive(Parser, Debug)]
#[command(name = "burrow", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Directory that becomes `/` for the command.
    #[arg(long, global = true, env = ROOTFS_ENV)]
    pub rootfs: Option<PathBuf>,

    /// Hostname set inside the isolated UTS namespace.
    #[arg(long, global = true)]
    pub hostname: Option<String>,

    /// JSON configuration file.
    #[arg(long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command inside new UTS, user, mount and PID namespaces.
    Run(run::RunArgs),
    /// Isolated init phase, started by `run` inside the new namespaces.
    #[command(hide = true)]
    Child(child::ChildArgs),
}

/// Dispatches the parsed CLI command, returning the exit status to report.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the launch fails
/// before the target command could run.
pub fn execute(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Command::Run(args) => {
            let config = LaunchConfig::resolve(cli.config.as_deref(), cli.rootfs, cli.hostname)?;
            run::execute(&args, &config)
        }
        Command::Child(args) => {
            // The supervisor forwards resolved values; a config file may not
            // be reachable from inside the new root.
            let config = LaunchConfig::resolve(None, cli.rootfs, cli.hostname)?;
            child::execute(&args, &config)
        }
    }
}

/// Returns `true` for parse errors that should end in the no-op message.
///
/// That covers a missing or unknown command, and any other parse error on a
/// command line (`args`, program name first) that names no subcommand at all,
/// such as `burrow -x`. Errors inside `run` stay usage errors.
#[must_use]
pub fn is_unrecognized_command(error: &clap::Error, args: &[OsString]) -> bool {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => false,
        ErrorKind::InvalidSubcommand
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => true,
        _ => !names_subcommand(args),
    }
}

fn names_subcommand(args: &[OsString]) -> bool {
    let cli = Cli::command();
    args.iter().skip(1).any(|arg| {
        cli.get_subcommands()
            .any(|sub| arg.to_str() == Some(sub.get_name()))
    })
}

/// Message printed when there is nothing to do.
#[must_use]
pub fn noop_message() -> String {
    format!("nothing happened: try `{BIN_NAME} run <command> [args...]`")
}
