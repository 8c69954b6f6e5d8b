//! # Core Module
//!
//! Stateless building blocks of the cable-graph pipeline.
//!
//! - **Models** ([`models`]) - the ingested [`Grid`](models::grid::Grid) and the
//!   solver-ready [`NeuronCell`](models::cell::NeuronCell)
//! - **Graph** ([`graph`]) - generic undirected adjacency-set graph with
//!   stack-based depth-first traversal
//! - **Ordering** ([`ordering`]) - DoF reorderings (identity, depth-first,
//!   Cuthill–McKee) and bandwidth measurement
//! - **File I/O** ([`io`]) - UGX grid files, SWC morphology files, and
//!   diagnostic exports
//! - **Diagnostics** ([`diagnostics`]) - human-readable cell summaries

pub mod diagnostics;
pub mod graph;
pub mod io;
pub mod models;
pub mod ordering;
pub mod utils;
