use crate::core::models::cell::{EdgeLengthStats, NeuronCell};
use nalgebra::Point3;
use std::fmt;

/// Aggregate figures about a built cell, suitable for logs and terminal reports.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub boundary_count: usize,
    pub soma_count: usize,
    pub branch_count: usize,
    pub edge_lengths: Option<EdgeLengthStats>,
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,
}

impl CellSummary {
    pub fn from_cell(cell: &NeuronCell) -> Self {
        Self {
            node_count: cell.vertex_count(),
            edge_count: cell.edge_count(),
            boundary_count: cell.boundary_ids().len(),
            soma_count: cell.soma_ids().len(),
            branch_count: cell.branch_ids().len(),
            edge_lengths: cell.edge_length_stats().ok(),
            bounds: cell.bounds(),
        }
    }

    pub fn total_cable_length(&self) -> f64 {
        self.edge_lengths.map_or(0.0, |s| s.total)
    }
}

impl fmt::Display for CellSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes:           {}", self.node_count)?;
        writeln!(f, "Edges:           {}", self.edge_count)?;
        writeln!(f, "Boundary nodes:  {}", self.boundary_count)?;
        writeln!(f, "Soma nodes:      {}", self.soma_count)?;
        writeln!(f, "Branch points:   {}", self.branch_count)?;
        match &self.edge_lengths {
            Some(stats) => {
                writeln!(
                    f,
                    "Edge length:     min {:.4}, max {:.4}, mean {:.4}",
                    stats.min, stats.max, stats.mean
                )?;
                writeln!(f, "Cable length:    {:.4}", stats.total)?;
            }
            None => writeln!(f, "Edge length:     n/a (no edges)")?,
        }
        match &self.bounds {
            Some((lo, hi)) => write!(
                f,
                "Bounding box:    ({:.4}, {:.4}, {:.4}) .. ({:.4}, {:.4}, {:.4})",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            ),
            None => write!(f, "Bounding box:    n/a (no nodes)"),
        }
    }
}
