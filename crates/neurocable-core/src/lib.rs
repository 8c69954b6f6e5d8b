//! # neurocable Core Library
//!
//! Turns a one-dimensional neuron mesh into the graph a cable-equation solver
//! assembles its matrix from.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three layers throughout:
//!
//! - **[`core`]: The Foundation.** Immutable data models (`Grid`, `NeuronCell`),
//!   the generic `Graph` utility, DoF reorderings, and file I/O for UGX grids,
//!   SWC morphologies and diagnostic tables.
//!
//! - **[`engine`]: Shared Plumbing.** Pipeline configuration, the aggregated
//!   `EngineError`, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** `prepare::run` computes an ordering,
//!   builds the cell with every id in DoF space, and reports the resulting
//!   matrix bandwidth.
//!
//! The ordering is always an explicit value passed to the stages that need
//! it; nothing in the library holds global state.

pub mod core;
pub mod engine;
pub mod workflows;
