//! Command line for re-executing the binary as the isolated init.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;

use burrow_common::config::LaunchConfig;
use burrow_common::constants::{BIN_NAME, INIT_SUBCOMMAND};
use burrow_common::error::{BurrowError, Result};
use burrow_common::types::LaunchRequest;

/// Builds the argument vector for the init phase.
///
/// The resolved configuration is forwarded as explicit flags so the init
/// never depends on files or environment outside its new root. The target
/// command follows a `--` separator, unchanged.
pub fn init_args(config: &LaunchConfig, request: &LaunchRequest) -> Vec<Vec<u8>> {
    let mut args: Vec<Vec<u8>> = vec![
        BIN_NAME.into(),
        "--rootfs".into(),
        config.rootfs.as_os_str().as_bytes().to_vec(),
    ];
    if let Some(hostname) = &config.hostname {
        args.push("--hostname".into());
        args.push(hostname.clone().into_bytes());
    }
    args.push(INIT_SUBCOMMAND.into());
    args.push("--".into());
    args.extend(request.command_line().into_iter().map(String::into_bytes));
    args
}

/// Same as [`init_args`], as the C strings `execv(2)` expects.
///
/// # Errors
///
/// Returns an error if any argument contains an interior NUL byte.
pub fn init_argv(config: &LaunchConfig, request: &LaunchRequest) -> Result<Vec<CString>> {
    init_args(config, request)
        .into_iter()
        .map(|arg| {
            CString::new(arg).map_err(|e| BurrowError::Config {
                message: format!("argument contains a NUL byte: {e}"),
            })
        })
        .collect()
}
