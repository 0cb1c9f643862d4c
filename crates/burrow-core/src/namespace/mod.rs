//! Linux namespace management for the isolated child.
//!
//! The namespace set is requested in one `clone(2)` call so the new user
//! namespace owns the UTS, mount and PID namespaces created alongside it.

pub mod user;
pub mod uts;

use nix::sched::CloneFlags;

/// Which namespaces to create for the isolated child.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceConfig {
    /// Isolate PID namespace.
    pub pid: bool,
    /// Isolate mount namespace.
    pub mount: bool,
    /// Isolate user namespace.
    pub user: bool,
    /// Isolate UTS (hostname) namespace.
    pub uts: bool,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            pid: true,
            mount: true,
            user: true,
            uts: true,
        }
    }
}

impl NamespaceConfig {
    /// Returns the `clone(2)` flags for the configured namespaces.
    #[must_use]
    pub fn clone_flags(&self) -> CloneFlags {
        let mut flags = CloneFlags::empty();
        if self.uts {
            flags |= CloneFlags::CLONE_NEWUTS;
        }
        if self.user {
            flags |= CloneFlags::CLONE_NEWUSER;
        }
        if self.mount {
            flags |= CloneFlags::CLONE_NEWNS;
        }
        if self.pid {
            flags |= CloneFlags::CLONE_NEWPID;
        }
        flags
    }

    /// Short names of the enabled namespaces, in clone-flag order.
    #[must_use]
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            (self.uts, "uts"),
            (self.user, "user"),
            (self.mount, "mount"),
            (self.pid, "pid"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}
