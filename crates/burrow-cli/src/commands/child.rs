//! `burrow child` — Isolated init, re-executed by `burrow run`.

use anyhow::Context;
use burrow_common::config::LaunchConfig;
use burrow_common::types::LaunchRequest;
use burrow_core::namespace::user::host_identity;
use burrow_runtime::init;
use clap::Args;

/// Arguments for the hidden `child` command.
#[derive(Args, Debug)]
pub struct ChildArgs {
    /// Command to run, followed by its arguments.
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Executes the `child` command.
///
/// # Errors
///
/// Returns an error if filesystem isolation fails; the target command has
/// not run in that case.
pub fn execute(args: &ChildArgs, config: &LaunchConfig) -> anyhow::Result<i32> {
    let (uid, gid) = host_identity();
    let request = LaunchRequest::new(&args.command, uid, gid, std::process::id())?;
    tracing::info!(
        command = ?request.command_line(),
        uid,
        pid = request.pid(),
        "running command as user in process"
    );

    let outcome = init::isolate_and_exec(&request, config).context("isolating child")?;
    Ok(outcome.code())
}
