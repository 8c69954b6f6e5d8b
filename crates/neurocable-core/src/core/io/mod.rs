//! Provides input/output functionality for cable-mesh file formats.
//!
//! [`ugx`] reads and writes UGX grids, [`swc`] reads and writes SWC
//! morphologies directly into a [`NeuronCell`](crate::core::models::cell::NeuronCell),
//! and [`export`] writes diagnostic tables for offline analysis. Both file
//! formats share the [`CableFile`](traits::CableFile) interface.

pub mod export;
pub mod swc;
pub mod traits;
pub mod ugx;
