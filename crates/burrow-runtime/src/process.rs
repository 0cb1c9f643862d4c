//! Waiting on processes and running the target command.

use std::io::ErrorKind;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus};

use burrow_common::constants::{EXIT_COMMAND_NOT_EXECUTABLE, EXIT_COMMAND_NOT_FOUND};
use burrow_common::error::{BurrowError, Result};
use burrow_common::types::ExitOutcome;
use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::Pid;

/// Runs `program` with `args`, inheriting the standard streams, and waits.
///
/// A command that cannot be started is not an error: it is reported the way
/// a shell would, as status 127 (not found) or 126 (not executable).
///
/// # Errors
///
/// Returns an error only if waiting on the started command fails.
pub fn run_command(program: &str, args: &[String]) -> Result<ExitOutcome> {
    let mut child = match Command::new(program).args(args).spawn() {
        Ok(child) => child,
        Err(e) => {
            let code = if e.kind() == ErrorKind::NotFound {
                EXIT_COMMAND_NOT_FOUND
            } else {
                EXIT_COMMAND_NOT_EXECUTABLE
            };
            tracing::warn!(program, error = %e, code, "target command could not be started");
            return Ok(ExitOutcome::Exited(code));
        }
    };
    tracing::debug!(program, pid = child.id(), "target command started");

    let status = child.wait().map_err(|e| BurrowError::Io {
        path: program.into(),
        source: e,
    })?;
    Ok(outcome_of(status))
}

/// Waits until `pid` exits or is killed.
///
/// # Errors
///
/// Returns an error if `waitpid(2)` fails for a reason other than `EINTR`.
pub fn wait_for(pid: Pid) -> Result<ExitOutcome> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ExitOutcome::Exited(code)),
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                return Ok(ExitOutcome::Signaled(signal as i32));
            }
            Ok(status) => tracing::trace!(?status, "ignoring non-terminal wait status"),
            Err(Errno::EINTR) => {}
            Err(e) => {
                return Err(BurrowError::Setup {
                    message: format!("waitpid {pid}: {e}"),
                });
            }
        }
    }
}

fn outcome_of(status: ExitStatus) -> ExitOutcome {
    match (status.code(), status.signal()) {
        (Some(code), _) => ExitOutcome::Exited(code),
        (None, Some(signo)) => ExitOutcome::Signaled(signo),
        (None, None) => ExitOutcome::Exited(EXIT_COMMAND_NOT_EXECUTABLE),
    }
}
