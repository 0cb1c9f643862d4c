//! Isolated init phase: finish isolation, run the target, clean up.
//!
//! Runs as PID 1 of the new PID namespace with namespace-root identity. The
//! steps are strictly ordered and any failure before the target command
//! starts aborts the launch, so user code never runs half-isolated.

use std::path::Path;

use burrow_common::config::LaunchConfig;
use burrow_common::constants::PROC_MOUNT_POINT;
use burrow_common::error::{BurrowError, Result};
use burrow_common::types::{ExitOutcome, LaunchPhase, LaunchRequest};
use burrow_core::filesystem::mount::ProcMount;
use burrow_core::filesystem::root;
use burrow_core::namespace::uts;

use crate::{interrupt, process};

/// Isolates the filesystem view, runs the target command and unmounts `/proc`.
///
/// A failure to unmount `/proc` after the command has finished is logged
/// and otherwise ignored; the command's status is still returned.
///
/// # Errors
///
/// Returns an error if the process is not the namespace init, or if the root
/// change, hostname or `/proc` mount fails. In those cases the target command
/// never runs.
pub fn isolate_and_exec(request: &LaunchRequest, config: &LaunchConfig) -> Result<ExitOutcome> {
    ensure_namespace_init(request)?;
    if let Err(e) = interrupt::install("init") {
        tracing::warn!(error = %e, "continuing without interrupt handler");
    }

    root::change_root(&config.rootfs)?;
    if let Some(hostname) = &config.hostname {
        uts::set_hostname(hostname)?;
    }
    let proc_mount = ProcMount::mount(Path::new(PROC_MOUNT_POINT))?;
    tracing::debug!(
        phase = %LaunchPhase::Isolated,
        rootfs = %config.rootfs.display(),
        "filesystem isolated"
    );

    tracing::debug!(
        phase = %LaunchPhase::Executing,
        program = request.program(),
        "starting target command"
    );
    let result = process::run_command(request.program(), request.args());

    tracing::debug!(phase = %LaunchPhase::Cleanup, "releasing proc mount");
    let outcome = keep_status_after_cleanup(result, proc_mount.unmount())?;
    tracing::debug!(phase = %LaunchPhase::Done, %outcome, "target command finished");
    Ok(outcome)
}

/// Returns the target's result whatever happened during cleanup.
///
/// Cleanup errors are logged at `warn` and dropped.
fn keep_status_after_cleanup(
    result: Result<ExitOutcome>,
    cleanup: Result<()>,
) -> Result<ExitOutcome> {
    if let Err(e) = cleanup {
        tracing::warn!(error = %e, "ignoring cleanup failure after target command finished");
    }
    result
}

/// Refuses to run unless this process is root and PID 1 of its namespaces.
///
/// Catches a direct `child` invocation from a shell, which would otherwise
/// try to change the host process's root.
fn ensure_namespace_init(request: &LaunchRequest) -> Result<()> {
    if request.uid() != 0 || request.gid() != 0 || request.pid() != 1 {
        return Err(BurrowError::Isolation {
            message: format!(
                "not running as namespace init (uid={}, gid={}, pid={}); \
                 the child phase is started by `run`",
                request.uid(),
                request.gid(),
                request.pid()
            ),
        });
    }
    Ok(())
}
