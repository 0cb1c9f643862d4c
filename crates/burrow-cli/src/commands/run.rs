//! `burrow run` — Launch a command inside new namespaces.

use anyhow::Context;
use burrow_common::config::LaunchConfig;
use burrow_common::types::LaunchRequest;
use burrow_core::namespace::user::host_identity;
use burrow_runtime::supervisor;
use clap::Args;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Command to run, followed by its arguments.
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Executes the `run` command.
///
/// Clones an isolated child, waits for it, and returns its exit status.
///
/// # Errors
///
/// Returns an error if the isolated child cannot be created.
pub fn execute(args: &RunArgs, config: &LaunchConfig) -> anyhow::Result<i32> {
    let (uid, gid) = host_identity();
    let request = LaunchRequest::new(&args.command, uid, gid, std::process::id())?;
    tracing::info!(
        command = ?request.command_line(),
        uid,
        pid = request.pid(),
        "running command as user in process"
    );

    let outcome = supervisor::launch(&request, config).context("launching isolated child")?;
    Ok(outcome.code())
}
