//! # Core Models Module
//!
//! Data structures describing a neuron's 1D cable mesh before and after
//! preparation for the solver.
//!
//! - [`grid`] - The ingested mesh: vertices with positions and diameters,
//!   undirected edges, and named subsets such as `"soma"`.
//! - [`cell`] - The finalized [`NeuronCell`](cell::NeuronCell): node and edge
//!   records in DoF numbering, boundary and soma ids, and edge statistics.
//!
//! ```ignore
//! use neurocable::core::models::{cell::NeuronCell, grid::GridBuilder};
//!
//! let mut builder = GridBuilder::new();
//! let a = builder.add_vertex(Point3::origin());
//! let b = builder.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! builder.set_diameter(a, 2.0)?.set_diameter(b, 1.0)?;
//! builder.add_edge(a, b)?;
//! let cell = NeuronCell::build_from_grid(&builder.build(), None)?;
//! ```

pub mod cell;
pub mod grid;
