//! Degree-of-freedom reordering of cable-grid vertices.
//!
//! A [`Reordering`](reordering::Reordering) maps every grid vertex to the
//! index of its unknown in the downstream cable-equation solver. Numbering
//! vertices along the cable (depth-first from the soma) or by Cuthill–McKee
//! keeps connected vertices close together, which narrows the band of the
//! assembled matrix.

pub mod reordering;
pub mod strategy;

pub use reordering::{Reordering, ReorderingError, dof_index, vertex_index};
pub use strategy::{DisconnectedPolicy, OrderingStrategy, compute_ordering, matrix_bandwidth, soma_root};
