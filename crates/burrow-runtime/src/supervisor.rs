//! Supervisor phase: clone into new namespaces and re-execute as init.
//!
//! Namespaces and identity maps have to exist before the init's code runs,
//! so the child is created with `clone(2)` and parked on a pipe until its
//! `uid_map`/`gid_map` are written. Only then does it `execv` the binary
//! with the `child` subcommand. A second close-on-exec pipe reports an
//! `execv` failure back: a successful exec closes it, anything read from it
//! is the errno of the failed exec.

use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::{Read, Write};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use burrow_common::config::LaunchConfig;
use burrow_common::constants::{CLONE_STACK_SIZE, EXIT_REEXEC_FAILED, SELF_EXE};
use burrow_common::error::{BurrowError, Result};
use burrow_common::types::{ExitOutcome, IdMapping, LaunchPhase, LaunchRequest};
use burrow_core::namespace::NamespaceConfig;
use burrow_core::namespace::user;
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sched::{CloneCb, clone};
use nix::sys::signal::Signal;
use nix::unistd::{Pid, execv, pipe2};

use crate::{interrupt, process, reexec};

/// Launches `request` inside new UTS, user, mount and PID namespaces and
/// waits for it.
///
/// # Errors
///
/// Returns a setup error if the child cannot be cloned, its identity maps
/// cannot be installed, the binary cannot be re-executed, or waiting on it
/// fails.
pub fn launch(request: &LaunchRequest, config: &LaunchConfig) -> Result<ExitOutcome> {
    launch_with(request, config, &NamespaceConfig::default())
}

/// Like [`launch`], with an explicit namespace set.
///
/// # Errors
///
/// See [`launch`].
pub fn launch_with(
    request: &LaunchRequest,
    config: &LaunchConfig,
    namespaces: &NamespaceConfig,
) -> Result<ExitOutcome> {
    supervise(SELF_EXE, request, config, namespaces)
}

/// Runs the supervisor phase, re-executing `exe` as the init.
fn supervise(
    exe: &CStr,
    request: &LaunchRequest,
    config: &LaunchConfig,
    namespaces: &NamespaceConfig,
) -> Result<ExitOutcome> {
    tracing::debug!(phase = %LaunchPhase::Unisolated, "preparing isolated child");
    let argv = reexec::init_argv(config, request)?;

    let (gate_rx, gate_tx) = cloexec_pipe("sync")?;
    let (status_rx, status_tx) = cloexec_pipe("exec status")?;
    let child = spawn_parked(
        exe,
        &argv,
        File::from(gate_rx),
        gate_tx.as_raw_fd(),
        status_tx.as_raw_fd(),
        namespaces,
    )?;
    drop(status_tx);
    tracing::info!(
        phase = %LaunchPhase::NamespacesRequested,
        child = %child,
        namespaces = ?namespaces.enabled(),
        rootfs = %config.rootfs.display(),
        "isolated child cloned"
    );

    if let Err(e) = interrupt::install("supervisor") {
        tracing::warn!(error = %e, "continuing without interrupt handler");
    }

    let released = release(child, request, namespaces, gate_tx)
        .and_then(|()| await_exec(exe, File::from(status_rx)));
    if let Err(e) = released {
        // The child exits on its own: either it saw EOF on the gate or its
        // exec already failed.
        let _ = process::wait_for(child);
        return Err(e);
    }

    let outcome = process::wait_for(child)?;
    tracing::info!(phase = %LaunchPhase::Done, child = %child, %outcome, "isolated child finished");
    Ok(outcome)
}

fn cloexec_pipe(name: &str) -> Result<(OwnedFd, OwnedFd)> {
    pipe2(OFlag::O_CLOEXEC).map_err(|e| BurrowError::Setup {
        message: format!("{name} pipe: {e}"),
    })
}

/// Clones the child into `namespaces`, parked on the read end of the gate.
fn spawn_parked(
    exe: &CStr,
    argv: &[CString],
    gate: File,
    gate_tx: RawFd,
    status_tx: RawFd,
    namespaces: &NamespaceConfig,
) -> Result<Pid> {
    let mut stack = vec![0u8; CLONE_STACK_SIZE];
    let cb: CloneCb<'_> = Box::new(|| parked_child(exe, argv, &gate, gate_tx, status_tx));
    // SAFETY: the callback only closes a descriptor, reads from and writes
    // to pipes and calls execv, all of which are async-signal-safe. `argv`
    // was built before cloning so the child never allocates. Without
    // CLONE_VM the child runs on a private copy of `stack`.
    let child = unsafe {
        clone(
            cb,
            &mut stack,
            namespaces.clone_flags(),
            Some(Signal::SIGCHLD as i32),
        )
    }
    .map_err(|e| BurrowError::Setup {
        message: format!("clone into new namespaces failed: {e}"),
    })?;
    Ok(child)
}

/// Body of the cloned child before it becomes the isolated init.
fn parked_child(
    exe: &CStr,
    argv: &[CString],
    gate: &File,
    gate_tx: RawFd,
    status_tx: RawFd,
) -> isize {
    // SAFETY: `gate_tx` is this process's copy of the write end. Closing it
    // lets the supervisor's copy be the last one, so dropping it reads as EOF.
    let _ = unsafe { libc::close(gate_tx) };

    let mut byte = [0u8; 1];
    let mut reader = gate;
    if !matches!(reader.read(&mut byte), Ok(1)) {
        return EXIT_REEXEC_FAILED as isize;
    }
    let Err(errno) = execv(exe, argv);
    let report = (errno as i32).to_ne_bytes();
    // SAFETY: `status_tx` is this process's copy of the status pipe's write
    // end and `report` outlives the call.
    let _ = unsafe { libc::write(status_tx, report.as_ptr().cast(), report.len()) };
    EXIT_REEXEC_FAILED as isize
}

/// Installs the identity maps of `child`, then opens the gate.
///
/// Maps are only written when a user namespace was requested; without one
/// the child keeps the caller's identity.
fn release(
    child: Pid,
    request: &LaunchRequest,
    namespaces: &NamespaceConfig,
    gate: OwnedFd,
) -> Result<()> {
    let pid = u32::try_from(child.as_raw()).map_err(|_| BurrowError::Setup {
        message: format!("unexpected child pid {child}"),
    })?;
    if namespaces.user {
        user::write_id_maps(
            pid,
            IdMapping::root_to(request.uid()),
            IdMapping::root_to(request.gid()),
        )
        .map_err(|e| BurrowError::Setup {
            message: format!("installing identity maps: {e}"),
        })?;
        tracing::debug!(pid, uid = request.uid(), gid = request.gid(), "identity maps installed");
    }

    let mut gate = File::from(gate);
    gate.write_all(b"1").map_err(|e| BurrowError::Setup {
        message: format!("releasing isolated child: {e}"),
    })?;
    Ok(())
}

/// Waits until the released child has either exec'd `exe` or reported why not.
fn await_exec(exe: &CStr, mut status: File) -> Result<()> {
    let mut report = Vec::with_capacity(4);
    let _ = status.read_to_end(&mut report).map_err(|e| BurrowError::Setup {
        message: format!("reading exec status: {e}"),
    })?;
    if report.is_empty() {
        return Ok(());
    }
    let raw = <[u8; 4]>::try_from(report.as_slice()).map_err(|_| BurrowError::Setup {
        message: format!("truncated exec status ({} bytes)", report.len()),
    })?;
    Err(BurrowError::Setup {
        message: format!(
            "re-executing {} as isolated init failed: {}",
            exe.to_string_lossy(),
            Errno::from_raw(i32::from_ne_bytes(raw))
        ),
    })
}
