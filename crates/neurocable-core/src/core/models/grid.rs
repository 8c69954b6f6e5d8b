use crate::core::utils::geometry::segment_length;
use nalgebra::Point3;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Name of the subset holding the cell body in UGX cell grids.
pub const SOMA_SUBSET_NAME: &str = "soma";

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("Vertex index {vertex} is out of range (grid has {count} vertices)")]
    VertexOutOfRange { vertex: usize, count: usize },
    #[error("Edge index {edge} is out of range (grid has {count} edges)")]
    EdgeOutOfRange { edge: usize, count: usize },
    #[error("Edge from vertex {vertex} to itself is not allowed")]
    SelfLoop { vertex: usize },
    #[error("Invalid diameter {value} on vertex {vertex}")]
    InvalidDiameter { vertex: usize, value: f64 },
}

/// A sample point of the cable mesh.
///
/// The diameter is carried on the record itself so that vertex data and the
/// per-vertex attachment can never drift out of alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: usize,
    pub position: Point3<f64>,
    pub diameter: Option<f64>,
}

impl Vertex {
    pub fn radius(&self) -> Option<f64> {
        self.diameter.map(|d| d / 2.0)
    }
}

/// Undirected edge between two vertex ids.
///
/// Equality and hashing ignore endpoint order, so `Edge::new(a, b)` and
/// `Edge::new(b, a)` are the same edge.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Edge {
    v0: usize,
    v1: usize,
}

impl Edge {
    pub fn new(v0: usize, v1: usize) -> Self {
        Self { v0, v1 }
    }

    /// Endpoints in the order they were given.
    pub fn endpoints(&self) -> (usize, usize) {
        (self.v0, self.v1)
    }

    fn key(&self) -> (usize, usize) {
        (self.v0.min(self.v1), self.v0.max(self.v1))
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Named selection of vertices (and edges) inside a grid, e.g. `"soma"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subset {
    pub name: String,
    pub vertices: Vec<usize>,
    pub edges: Vec<usize>,
}

/// In-memory 1D cable mesh: vertices, undirected edges and named subsets.
///
/// Relations are expressed purely through indices. The adjacency cache is
/// kept in sync by [`GridBuilder`], the only way to populate a grid.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    subsets: Vec<Subset>,
    adjacency: Vec<Vec<usize>>,
}

impl Grid {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, id: usize) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn subsets(&self) -> &[Subset] {
        &self.subsets
    }

    /// Finds the first subset with the given name.
    pub fn subset(&self, name: &str) -> Option<&Subset> {
        self.subsets.iter().find(|s| s.name == name)
    }

    /// Neighbor ids of a vertex, in edge insertion order.
    ///
    /// Returns an empty slice for unknown vertices.
    pub fn neighbors(&self, id: usize) -> &[usize] {
        self.adjacency.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn degree(&self, id: usize) -> usize {
        self.neighbors(id).len()
    }

    /// Euclidean length of `edge`, or `None` if an endpoint is not in this grid.
    pub fn edge_length(&self, edge: &Edge) -> Option<f64> {
        let (a, b) = edge.endpoints();
        let pa = &self.vertices.get(a)?.position;
        let pb = &self.vertices.get(b)?.position;
        Some(segment_length(pa, pb))
    }
}

#[derive(Debug, Default)]
pub struct GridBuilder {
    grid: Grid,
    edge_index: HashMap<Edge, usize>,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its id.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        let id = self.grid.vertices.len();
        self.grid.vertices.push(Vertex {
            id,
            position,
            diameter: None,
        });
        self.grid.adjacency.push(Vec::new());
        id
    }

    pub fn set_diameter(&mut self, vertex: usize, diameter: f64) -> Result<&mut Self, GridError> {
        let count = self.grid.vertices.len();
        let v = self
            .grid
            .vertices
            .get_mut(vertex)
            .ok_or(GridError::VertexOutOfRange { vertex, count })?;
        if !diameter.is_finite() || diameter < 0.0 {
            return Err(GridError::InvalidDiameter {
                vertex,
                value: diameter,
            });
        }
        v.diameter = Some(diameter);
        Ok(self)
    }

    /// Connects two existing vertices and returns the edge index.
    ///
    /// Adding an edge that already exists (in either direction) returns the
    /// index of the existing edge.
    pub fn add_edge(&mut self, v0: usize, v1: usize) -> Result<usize, GridError> {
        let count = self.grid.vertices.len();
        for vertex in [v0, v1] {
            if vertex >= count {
                return Err(GridError::VertexOutOfRange { vertex, count });
            }
        }
        if v0 == v1 {
            return Err(GridError::SelfLoop { vertex: v0 });
        }

        let edge = Edge::new(v0, v1);
        if let Some(&existing) = self.edge_index.get(&edge) {
            return Ok(existing);
        }

        let index = self.grid.edges.len();
        self.grid.edges.push(edge);
        self.edge_index.insert(edge, index);
        self.grid.adjacency[v0].push(v1);
        self.grid.adjacency[v1].push(v0);
        Ok(index)
    }

    pub fn add_subset(
        &mut self,
        name: &str,
        vertices: Vec<usize>,
        edges: Vec<usize>,
    ) -> Result<&mut Self, GridError> {
        let vertex_count = self.grid.vertices.len();
        if let Some(&vertex) = vertices.iter().find(|&&v| v >= vertex_count) {
            return Err(GridError::VertexOutOfRange {
                vertex,
                count: vertex_count,
            });
        }
        let edge_count = self.grid.edges.len();
        if let Some(&edge) = edges.iter().find(|&&e| e >= edge_count) {
            return Err(GridError::EdgeOutOfRange {
                edge,
                count: edge_count,
            });
        }
        self.grid.subsets.push(Subset {
            name: name.to_string(),
            vertices,
            edges,
        });
        Ok(self)
    }

    pub fn vertex_count(&self) -> usize {
        self.grid.vertices.len()
    }

    pub fn build(self) -> Grid {
        self.grid
    }
}
