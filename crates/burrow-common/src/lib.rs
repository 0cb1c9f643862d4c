//! # burrow-common
//!
//! Shared types, error definitions, configuration model, and constants
//! used by both launch phases of burrow.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and performs no system calls of its own.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
