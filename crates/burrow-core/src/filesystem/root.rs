//! Root filesystem switching via `chroot(2)`.
//!
//! The working directory is reset right after the root change; until then it
//! still refers to a directory outside the new root.

use std::path::Path;

use burrow_common::error::{BurrowError, Result};

/// Makes `new_root` the process's `/` and moves the working directory there.
///
/// # Errors
///
/// Returns an error if `chroot(2)` or `chdir(2)` fails.
pub fn change_root(new_root: &Path) -> Result<()> {
    nix::unistd::chroot(new_root).map_err(|e| BurrowError::Isolation {
        message: format!("chroot {}: {e}", new_root.display()),
    })?;
    nix::unistd::chdir("/").map_err(|e| BurrowError::Isolation {
        message: format!("chdir / after chroot: {e}"),
    })?;
    tracing::info!(new_root = %new_root.display(), "root filesystem changed");
    Ok(())
}
