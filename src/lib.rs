//! Daybook CLI - two-way sync for daily markdown journals
//!
//! This crate provides the core functionality for the `daybook` CLI tool:
//! keeping one markdown file per calendar day reconciled with a remote
//! journal service that may be edited independently.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Explicit per-invocation configuration
//! - [`remote`] - Remote journal store and credential collaborators
//! - [`sync`] - Hashing, section merge, state, and the sync engine
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod remote;
pub mod sync;

pub use error::{Error, Result};
