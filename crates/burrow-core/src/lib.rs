//! # burrow-core
//!
//! Low-level Linux isolation primitives used by the burrow launch phases.
//!
//! This crate provides safe wrappers over:
//! - **Namespaces**: the UTS, user, mount and PID set requested at clone time,
//!   single-entry identity maps, and the in-namespace hostname.
//! - **Filesystem**: root change to the configured directory and the
//!   lifecycle of the namespace-private `/proc` mount.
//!
//! Every wrapper maps `nix` errors onto the shared [`BurrowError`] taxonomy.
//!
//! [`BurrowError`]: burrow_common::error::BurrowError

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod filesystem;
pub mod namespace;
