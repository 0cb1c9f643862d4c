//! Domain primitive types shared by both launch phases.

use std::fmt;

use crate::constants::SIGNAL_EXIT_BASE;
use crate::error::{BurrowError, Result};

/// A command to launch, together with the identity of whoever asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    program: String,
    args: Vec<String>,
    uid: u32,
    gid: u32,
    pid: u32,
}

impl LaunchRequest {
    /// Builds a request from a command line (`program args...`) and the
    /// invoking process identity.
    ///
    /// The program is not checked for existence; a missing binary only
    /// shows up as the target command's exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if `command` is empty.
    pub fn new(command: &[String], uid: u32, gid: u32, pid: u32) -> Result<Self> {
        let (program, args) = command.split_first().ok_or_else(|| BurrowError::Config {
            message: "no command given".into(),
        })?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            uid,
            gid,
            pid,
        })
    }

    /// Path or name of the target command.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the target command.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program followed by its arguments.
    #[must_use]
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Real UID of the invoking user.
    #[must_use]
    pub const fn uid(&self) -> u32 {
        self.uid
    }

    /// Real GID of the invoking user.
    #[must_use]
    pub const fn gid(&self) -> u32 {
        self.gid
    }

    /// PID of the invoking process.
    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }
}

/// Single-range identity mapping written to `uid_map` / `gid_map`.
///
/// Only namespace id 0 is mapped, and only onto one host id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdMapping {
    inside: u32,
    outside: u32,
    count: u32,
}

impl IdMapping {
    /// Maps namespace root onto `host_id`.
    #[must_use]
    pub const fn root_to(host_id: u32) -> Self {
        Self {
            inside: 0,
            outside: host_id,
            count: 1,
        }
    }
}

impl fmt::Display for IdMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.inside, self.outside, self.count)
    }
}

/// Position in the two-phase launch protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchPhase {
    /// Supervisor running with the caller's identity.
    Unisolated,
    /// Child cloned into new namespaces, id maps being installed.
    NamespacesRequested,
    /// Root changed and `/proc` mounted inside the namespaces.
    Isolated,
    /// Target command running.
    Executing,
    /// Target command finished, releasing mounts.
    Cleanup,
    /// Launch finished.
    Done,
}

impl fmt::Display for LaunchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unisolated => write!(f, "unisolated"),
            Self::NamespacesRequested => write!(f, "namespaces-requested"),
            Self::Isolated => write!(f, "isolated"),
            Self::Executing => write!(f, "executing"),
            Self::Cleanup => write!(f, "cleanup"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// How a waited-for process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitOutcome {
    /// Normal exit with the given status.
    Exited(i32),
    /// Killed by the given signal number.
    Signaled(i32),
}

impl ExitOutcome {
    /// Exit status to propagate, using `128 + signal` for signal deaths.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Exited(code) => code,
            Self::Signaled(signo) => SIGNAL_EXIT_BASE + signo,
        }
    }

    /// Returns `true` for a zero exit status.
    #[must_use]
    pub const fn success(self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exited with status {code}"),
            Self::Signaled(signo) => write!(f, "killed by signal {signo}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(parts: &[&str]) -> Vec<String> {
        parts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn request_splits_program_and_args() {
        let req = LaunchRequest::new(&cmd(&["/bin/echo", "hello", "world"]), 1000, 1000, 42).unwrap();
        assert_eq!(req.program(), "/bin/echo");
        assert_eq!(req.args(), ["hello", "world"]);
        assert_eq!(req.command_line(), cmd(&["/bin/echo", "hello", "world"]));
        assert_eq!((req.uid(), req.gid(), req.pid()), (1000, 1000, 42));
    }

    #[test]
    fn request_keeps_nonexistent_program() {
        let req = LaunchRequest::new(&cmd(&["/nonexistent-binary"]), 1000, 1000, 1).unwrap();
        assert_eq!(req.program(), "/nonexistent-binary");
        assert!(req.args().is_empty());
    }

    #[test]
    fn empty_request_is_rejected() {
        let err = LaunchRequest::new(&[], 1000, 1000, 1).unwrap_err();
        assert!(matches!(err, BurrowError::Config { .. }));
    }

    #[test]
    fn mapping_renders_kernel_line() {
        let map = IdMapping::root_to(1000);
        assert_eq!(map.to_string(), "0 1000 1");
    }

    #[test]
    fn phases_render_as_log_values() {
        assert_eq!(LaunchPhase::NamespacesRequested.to_string(), "namespaces-requested");
        assert_eq!(LaunchPhase::Cleanup.to_string(), "cleanup");
    }

    #[test]
    fn signal_exit_uses_shell_convention() {
        assert_eq!(ExitOutcome::Signaled(9).code(), 137);
        assert_eq!(ExitOutcome::Exited(3).code(), 3);
        assert!(ExitOutcome::Exited(0).success());
        assert!(!ExitOutcome::Signaled(15).success());
    }
}
