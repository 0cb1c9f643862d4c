//! Filesystem isolation for the isolated init.
//!
//! Provides the root change onto the configured directory and the
//! namespace-private `/proc` mount.

pub mod mount;
pub mod root;
