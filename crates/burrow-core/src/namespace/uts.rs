//! UTS namespace hostname.

use burrow_common::error::{BurrowError, Result};

/// Sets the hostname inside the private UTS namespace.
///
/// # Errors
///
/// Returns an error if `sethostname(2)` fails.
pub fn set_hostname(hostname: &str) -> Result<()> {
    nix::unistd::sethostname(hostname).map_err(|e| BurrowError::Isolation {
        message: format!("sethostname {hostname}: {e}"),
    })?;
    tracing::debug!(hostname, "container hostname set");
    Ok(())
}
