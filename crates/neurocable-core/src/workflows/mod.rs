//! # Workflows Module
//!
//! Top-level entry points that take a grid (or a path to one) and return a
//! simulation-ready cell.
//!
//! - **Preparation Workflow** ([`prepare`]) - orders the grid's degrees of
//!   freedom, builds the [`NeuronCell`](crate::core::models::cell::NeuronCell)
//!   in DoF space, and compares ordering strategies by matrix bandwidth.

pub mod prepare;
