//! Terminal interrupt handling for both launch phases.
//!
//! `Ctrl+C` reaches the whole foreground process group. The supervisor and
//! the isolated init have to outlive the target command so its status is
//! still propagated and `/proc` is still unmounted, so they only log it.

use std::sync::OnceLock;

use burrow_common::error::{BurrowError, Result};

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs the process-wide `SIGINT` handler once; later calls are no-ops.
///
/// # Errors
///
/// Returns an error if the handler cannot be registered.
pub fn install(role: &'static str) -> Result<()> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    ctrlc::set_handler(move || {
        tracing::warn!(role, "interrupt received, waiting for child to exit");
    })
    .map_err(|e| BurrowError::Setup {
        message: format!("failed to set Ctrl+C handler: {e}"),
    })?;
    let _ = INSTALLED.set(());
    Ok(())
}
