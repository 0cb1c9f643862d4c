//! Namespace-private `/proc` mount.
//!
//! The inherited `/proc` describes the host process table. A fresh `proc`
//! instance mounted from inside the new PID namespace only shows the
//! namespace's own processes.

use std::path::{Path, PathBuf};

use burrow_common::error::{BurrowError, Result};
use nix::mount::{MntFlags, MsFlags, mount, umount2};
use nix::sys::stat::stat;

/// A mounted `proc` filesystem that must be released with [`ProcMount::unmount`].
#[derive(Debug)]
#[must_use = "the proc mount has to be released with `unmount`"]
pub struct ProcMount {
    target: PathBuf,
    /// Device of the directory the mount covers.
    covered_dev: u64,
}

impl ProcMount {
    /// Mounts a new `proc` instance at `target`.
    ///
    /// `nosuid`, `nodev` and `noexec` are set as for a standard `/proc`.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` cannot be inspected or the `mount(2)`
    /// syscall fails.
    pub fn mount(target: &Path) -> Result<Self> {
        let covered_dev = device_of(target).map_err(|e| BurrowError::Isolation {
            message: format!("inspect {}: {e}", target.display()),
        })?;
        mount(
            Some("proc"),
            target,
            Some("proc"),
            MsFlags::MS_NOSUID | MsFlags::MS_NODEV | MsFlags::MS_NOEXEC,
            None::<&str>,
        )
        .map_err(|e| BurrowError::Isolation {
            message: format!("mount proc at {}: {e}", target.display()),
        })?;
        tracing::debug!(target = %target.display(), "proc mounted");
        Ok(Self {
            target: target.to_path_buf(),
            covered_dev,
        })
    }

    /// Unmounts the `proc` instance and checks the covered directory is
    /// visible again.
    ///
    /// # Errors
    ///
    /// Returns a cleanup error if the `umount2(2)` syscall fails or the mount
    /// point still belongs to another filesystem afterwards.
    pub fn unmount(self) -> Result<()> {
        umount2(&self.target, MntFlags::empty()).map_err(|e| BurrowError::Cleanup {
            message: format!("unmount {}: {e}", self.target.display()),
        })?;
        self.ensure_uncovered()?;
        tracing::debug!(target = %self.target.display(), "proc unmounted");
        Ok(())
    }

    fn ensure_uncovered(&self) -> Result<()> {
        let dev = device_of(&self.target).map_err(|e| BurrowError::Cleanup {
            message: format!("inspect {}: {e}", self.target.display()),
        })?;
        if dev != self.covered_dev {
            return Err(BurrowError::Cleanup {
                message: format!("{} is still mounted", self.target.display()),
            });
        }
        Ok(())
    }
}

fn device_of(path: &Path) -> nix::Result<u64> {
    stat(path).map(|st| st.st_dev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_on_missing_target_is_an_isolation_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("proc");

        let err = ProcMount::mount(&missing).unwrap_err();
        assert!(matches!(err, BurrowError::Isolation { .. }));
    }

    #[test]
    fn unmount_of_unmounted_target_is_a_cleanup_error() {
        let dir = tempfile::tempdir().unwrap();
        let never_mounted = ProcMount {
            target: dir.path().to_path_buf(),
            covered_dev: device_of(dir.path()).unwrap(),
        };

        let err = never_mounted.unmount().unwrap_err();
        assert!(err.is_cleanup());
    }

    #[test]
    fn uncovered_directory_passes_the_check() {
        let dir = tempfile::tempdir().unwrap();
        let mount = ProcMount {
            target: dir.path().to_path_buf(),
            covered_dev: device_of(dir.path()).unwrap(),
        };
        mount.ensure_uncovered().unwrap();
    }

    #[test]
    fn directory_on_another_device_reads_as_still_mounted() {
        let dir = tempfile::tempdir().unwrap();
        let real = device_of(dir.path()).unwrap();
        let mount = ProcMount {
            target: dir.path().to_path_buf(),
            covered_dev: real.wrapping_add(1),
        };

        let err = mount.ensure_uncovered().unwrap_err();
        assert!(err.is_cleanup());
        assert!(err.to_string().contains("still mounted"));
    }
}
