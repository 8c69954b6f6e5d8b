//! # Engine Module
//!
//! Shared plumbing for the preparation pipeline: validated configuration,
//! the aggregated error type every workflow returns, and the progress
//! reporting channel used by front ends.
//!
//! - **Configuration** ([`config`]) - ordering strategy, root subset and export switches
//! - **Error Handling** ([`error`]) - [`error::EngineError`] wrapping each stage's error
//! - **Progress Monitoring** ([`progress`]) - phase and message events for interactive callers

pub mod config;
pub mod error;
pub mod progress;
