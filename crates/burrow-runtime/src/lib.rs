//! Two-phase launch protocol for the burrow runtime.
//!
//! - [`supervisor`] runs with the caller's identity, clones a child into new
//!   namespaces, installs its identity maps and re-executes the binary.
//! - [`init`] runs inside those namespaces as namespace root, isolates the
//!   filesystem view and runs the target command.

#![allow(unsafe_code)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod init;
pub mod interrupt;
pub mod process;
pub mod reexec;
pub mod supervisor;
