//! Diagnostic exports for offline analysis of a prepared cell.
//!
//! Nothing in the preparation pipeline calls these functions; callers decide
//! whether and where to write them once a reordering and cell exist.

use crate::core::models::cell::NeuronCell;
use crate::core::models::grid::Grid;
use crate::core::ordering::reordering::{Reordering, dof_index, vertex_index};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Reordering covers {reordering} vertices but the grid has {grid}")]
    ReorderingMismatch { reordering: usize, grid: usize },
}

#[derive(Debug, Serialize)]
struct NodeRecord {
    id: usize,
    radius: f64,
    x: f64,
    y: f64,
    z: f64,
    neighbors: String,
}

#[derive(Debug, Serialize)]
struct EdgeRecord {
    from_id: usize,
    to_id: usize,
    length: f64,
}

#[derive(Debug, Serialize)]
struct PermutationRecord {
    vertex: usize,
    dof: usize,
}

/// Writes the dense symmetric 0/1 adjacency matrix of `grid` in DoF order.
///
/// Entries are comma separated, the diagonal is 1, and every row is followed
/// by an empty line. The output is `N x N` for `N` vertices, so this is only
/// meant for inspecting the sparsity pattern of small and medium cells.
pub fn write_adjacency_matrix(
    writer: &mut impl Write,
    grid: &Grid,
    reordering: Option<&Reordering>,
) -> Result<(), ExportError> {
    let n = grid.vertex_count();
    if let Some(r) = reordering {
        if r.len() != n {
            return Err(ExportError::ReorderingMismatch {
                reordering: r.len(),
                grid: n,
            });
        }
    }

    let mut row = vec![0u8; n];
    for dof in 0..n {
        row.fill(0);
        row[dof] = 1;
        if let Some(vertex) = vertex_index(dof, reordering) {
            for &neighbor in grid.neighbors(vertex) {
                if let Some(col) = dof_index(neighbor, reordering) {
                    row[col] = 1;
                }
            }
        }
        for (col, value) in row.iter().enumerate() {
            if col > 0 {
                write!(writer, ",")?;
            }
            write!(writer, "{}", value)?;
        }
        writeln!(writer)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// File-backed variant of [`write_adjacency_matrix`]. The file is closed
/// before this function returns, on success and on error.
pub fn write_adjacency_matrix_to_path(
    path: &Path,
    grid: &Grid,
    reordering: Option<&Reordering>,
) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_adjacency_matrix(&mut writer, grid, reordering)?;
    writer.flush()?;
    info!(
        "Wrote {}x{} adjacency matrix to {:?}.",
        grid.vertex_count(),
        grid.vertex_count(),
        path
    );
    Ok(())
}

/// Writes one CSV row per node: id, radius, coordinates and `;`-separated neighbor ids.
pub fn write_nodes_csv<W: Write>(writer: W, cell: &NeuronCell) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for node in cell.nodes() {
        csv_writer.serialize(NodeRecord {
            id: node.id,
            radius: node.radius,
            x: node.position.x,
            y: node.position.y,
            z: node.position.z,
            neighbors: node
                .neighbor_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(";"),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_edges_csv<W: Write>(writer: W, cell: &NeuronCell) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for edge in cell.edges() {
        csv_writer.serialize(EdgeRecord {
            from_id: edge.from_id,
            to_id: edge.to_id,
            length: edge.length,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes `vertex,dof` pairs so solver output can be mapped back to mesh vertices.
pub fn write_permutation_csv<W: Write>(writer: W, reordering: &Reordering) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (vertex, dof) in reordering.pairs() {
        csv_writer.serialize(PermutationRecord { vertex, dof })?;
    }
    csv_writer.flush()?;
    Ok(())
}
