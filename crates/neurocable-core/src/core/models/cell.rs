use super::grid::{Grid, SOMA_SUBSET_NAME};
use crate::core::io::swc::{SwcError, SwcFile};
use crate::core::io::traits::CableFile;
use crate::core::ordering::reordering::{Reordering, dof_index};
use crate::core::utils::geometry::{bounding_box, segment_length};
use nalgebra::Point3;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CellError {
    #[error("Cell has no edges; edge length statistics are undefined")]
    EmptyGraph,
    #[error("Vertex {vertex} has no diameter")]
    MissingDiameter { vertex: usize },
    #[error("Reordering covers {reordering} vertices but the grid has {grid}")]
    ReorderingMismatch { reordering: usize, grid: usize },
    #[error("Node id {id} is out of range for a cell with {count} nodes")]
    NodeOutOfRange { id: usize, count: usize },
    #[error("Node {id} cannot be connected to itself")]
    SelfConnection { id: usize },
}

/// One cable compartment as seen by the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: usize,
    pub radius: f64,
    pub position: Point3<f64>,
    pub neighbor_ids: Vec<usize>,
}

impl Node {
    pub fn degree(&self) -> usize {
        self.neighbor_ids.len()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node {:>5}: radius {:.4}, position ({:.4}, {:.4}, {:.4}), neighbors {:?}",
            self.id,
            self.radius,
            self.position.x,
            self.position.y,
            self.position.z,
            self.neighbor_ids
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellEdge {
    pub from_id: usize,
    pub to_id: usize,
    pub length: f64,
}

impl fmt::Display for CellEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Edge {:>5} -> {:>5}: length {:.4}",
            self.from_id, self.to_id, self.length
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLengthStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub total: f64,
}

/// Simulation-ready cable graph of a single neuron.
///
/// Nodes are stored at the index equal to their DoF id, so `nodes()[i].id == i`
/// always holds. Edge lengths are computed from endpoint positions when the
/// cell is built and never change afterwards.
#[derive(Debug, Clone, Default)]
pub struct NeuronCell {
    nodes: Vec<Node>,
    edges: Vec<CellEdge>,
    boundary_ids: Vec<usize>,
    soma_ids: Vec<usize>,
}

impl NeuronCell {
    /// Builds the cell from a grid, reading soma ids from the `"soma"` subset.
    pub fn build_from_grid(grid: &Grid, reordering: Option<&Reordering>) -> Result<Self, CellError> {
        Self::build_from_grid_with_soma(grid, reordering, SOMA_SUBSET_NAME)
    }

    /// Builds the cell from a grid with every id expressed in DoF space.
    ///
    /// Node, neighbor, edge, boundary and soma ids all go through
    /// `reordering`; `None` keeps the native vertex numbering. A grid without
    /// the soma subset yields a cell with no soma ids.
    pub fn build_from_grid_with_soma(
        grid: &Grid,
        reordering: Option<&Reordering>,
        soma_subset: &str,
    ) -> Result<Self, CellError> {
        let count = grid.vertex_count();
        if let Some(r) = reordering {
            if r.len() != count {
                return Err(CellError::ReorderingMismatch {
                    reordering: r.len(),
                    grid: count,
                });
            }
        }
        let dof = |vertex: usize| {
            dof_index(vertex, reordering).ok_or(CellError::NodeOutOfRange { id: vertex, count })
        };

        let mut slots: Vec<Option<Node>> = (0..count).map(|_| None).collect();
        let mut boundary_ids = Vec::new();
        for vertex in grid.vertices() {
            let diameter = vertex
                .diameter
                .ok_or(CellError::MissingDiameter { vertex: vertex.id })?;
            let id = dof(vertex.id)?;
            let neighbor_ids = grid
                .neighbors(vertex.id)
                .iter()
                .map(|&n| dof(n))
                .collect::<Result<Vec<_>, _>>()?;
            if neighbor_ids.len() == 1 {
                boundary_ids.push(id);
            }
            slots[id] = Some(Node {
                id,
                radius: diameter / 2.0,
                position: vertex.position,
                neighbor_ids,
            });
        }
        let nodes: Vec<Node> = slots.into_iter().flatten().collect();
        boundary_ids.sort_unstable();

        let mut edges = Vec::with_capacity(grid.edge_count());
        for edge in grid.edges() {
            let (a, b) = edge.endpoints();
            let length = grid
                .edge_length(edge)
                .ok_or(CellError::NodeOutOfRange { id: a.max(b), count })?;
            edges.push(CellEdge {
                from_id: dof(a)?,
                to_id: dof(b)?,
                length,
            });
        }

        let soma_ids = match grid.subset(soma_subset) {
            Some(subset) => subset
                .vertices
                .iter()
                .map(|&v| dof(v))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            nodes,
            edges,
            boundary_ids,
            soma_ids,
        })
    }

    /// Reads an SWC morphology. Ids come straight from the file (shifted to
    /// start at 0); no reordering is applied.
    pub fn build_from_swc<P: AsRef<Path>>(path: P) -> Result<Self, SwcError> {
        SwcFile::read_from_path(path)
    }

    pub fn vertex_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edges(&self) -> &[CellEdge] {
        &self.edges
    }

    /// Ids of cable terminals (nodes with exactly one neighbor), ascending.
    pub fn boundary_ids(&self) -> &[usize] {
        &self.boundary_ids
    }

    pub fn soma_ids(&self) -> &[usize] {
        &self.soma_ids
    }

    /// Ids of nodes where the cable splits (three or more neighbors).
    pub fn branch_ids(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|n| n.degree() >= 3)
            .map(|n| n.id)
            .collect()
    }

    pub fn edge_length_stats(&self) -> Result<EdgeLengthStats, CellError> {
        let first = self.edges.first().ok_or(CellError::EmptyGraph)?.length;
        let (min, max, total) = self.edges.iter().fold(
            (first, first, 0.0),
            |(min, max, total), e| (min.min(e.length), max.max(e.length), total + e.length),
        );
        Ok(EdgeLengthStats {
            min,
            max,
            mean: total / self.edges.len() as f64,
            total,
        })
    }

    pub fn min_edge_length(&self) -> Result<f64, CellError> {
        self.edge_length_stats().map(|s| s.min)
    }

    pub fn max_edge_length(&self) -> Result<f64, CellError> {
        self.edge_length_stats().map(|s| s.max)
    }

    pub fn average_edge_length(&self) -> Result<f64, CellError> {
        self.edge_length_stats().map(|s| s.mean)
    }

    /// Sum of all edge lengths; zero for a cell without edges.
    pub fn total_cable_length(&self) -> f64 {
        self.edges.iter().map(|e| e.length).sum()
    }

    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        bounding_box(self.nodes.iter().map(|n| &n.position))
    }
}

/// Incremental construction of a [`NeuronCell`] for readers that produce
/// nodes row by row.
#[derive(Debug, Default)]
pub struct NeuronCellBuilder {
    nodes: Vec<Node>,
    edges: Vec<CellEdge>,
    soma_ids: Vec<usize>,
}

impl NeuronCellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an unconnected node and returns its id.
    pub fn push_node(&mut self, radius: f64, position: Point3<f64>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            radius,
            position,
            neighbor_ids: Vec::new(),
        });
        id
    }

    /// Connects two existing nodes; the edge length is taken from their positions.
    pub fn connect(&mut self, from_id: usize, to_id: usize) -> Result<&mut Self, CellError> {
        let count = self.nodes.len();
        for id in [from_id, to_id] {
            if id >= count {
                return Err(CellError::NodeOutOfRange { id, count });
            }
        }
        if from_id == to_id {
            return Err(CellError::SelfConnection { id: from_id });
        }
        let length = segment_length(&self.nodes[from_id].position, &self.nodes[to_id].position);
        self.edges.push(CellEdge {
            from_id,
            to_id,
            length,
        });
        self.nodes[from_id].neighbor_ids.push(to_id);
        self.nodes[to_id].neighbor_ids.push(from_id);
        Ok(self)
    }

    pub fn mark_soma(&mut self, id: usize) -> Result<&mut Self, CellError> {
        if id >= self.nodes.len() {
            return Err(CellError::NodeOutOfRange {
                id,
                count: self.nodes.len(),
            });
        }
        self.soma_ids.push(id);
        Ok(self)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn build(self) -> NeuronCell {
        let boundary_ids = self
            .nodes
            .iter()
            .filter(|n| n.degree() == 1)
            .map(|n| n.id)
            .collect();
        NeuronCell {
            nodes: self.nodes,
            edges: self.edges,
            boundary_ids,
            soma_ids: self.soma_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::grid::GridBuilder;
    use crate::core::models::grid::test_grids::*;
    use crate::core::ordering::strategy::{DisconnectedPolicy, OrderingStrategy, compute_ordering};

    fn dfs_from_soma(grid: &Grid) -> Reordering {
        let root = grid.subset(SOMA_SUBSET_NAME).unwrap().vertices[0];
        compute_ordering(grid, OrderingStrategy::DepthFirst, root, DisconnectedPolicy::Fail).unwrap()
    }

    #[test]
    fn path_cell_matches_expected_scenario() {
        let grid = path_grid();
        let reordering = dfs_from_soma(&grid);
        let cell = NeuronCell::build_from_grid(&grid, Some(&reordering)).unwrap();

        assert_eq!(cell.vertex_count(), 4);
        assert_eq!(cell.edge_count(), 3);
        assert_eq!(cell.boundary_ids(), &[0, 3]);
        assert_eq!(cell.soma_ids(), &[0]);
        assert_eq!(cell.min_edge_length().unwrap(), 1.0);
        assert_eq!(cell.max_edge_length().unwrap(), 1.0);
        assert_eq!(cell.average_edge_length().unwrap(), 1.0);
        assert_eq!(cell.node(1).unwrap().neighbor_ids, vec![0, 2]);
        assert_eq!(cell.node(2).unwrap().radius, 1.0);
    }

    #[test]
    fn identity_and_no_reordering_keep_native_order() {
        let grid = branched_grid();
        let identity = Reordering::identity(grid.vertex_count());
        let with_identity = NeuronCell::build_from_grid(&grid, Some(&identity)).unwrap();
        let without = NeuronCell::build_from_grid(&grid, None).unwrap();

        assert_eq!(with_identity.nodes(), without.nodes());
        for (vertex, node) in grid.vertices().iter().zip(without.nodes()) {
            assert_eq!(node.id, vertex.id);
            assert_eq!(node.position, vertex.position);
        }
    }

    #[test]
    fn nodes_are_stored_at_their_dof_index() {
        let grid = branched_grid();
        let reordering = dfs_from_soma(&grid);
        let cell = NeuronCell::build_from_grid(&grid, Some(&reordering)).unwrap();

        for (index, node) in cell.nodes().iter().enumerate() {
            assert_eq!(node.id, index);
            let vertex = reordering.vertex_of(index).unwrap();
            assert_eq!(node.position, grid.vertex(vertex).unwrap().position);
            assert_eq!(node.radius, grid.vertex(vertex).unwrap().radius().unwrap());
        }
    }

    #[test]
    fn edge_lengths_are_invariant_under_reordering() {
        let grid = branched_grid();
        let reordering = dfs_from_soma(&grid);
        let native = NeuronCell::build_from_grid(&grid, None).unwrap();
        let reordered = NeuronCell::build_from_grid(&grid, Some(&reordering)).unwrap();

        for (a, b) in native.edges().iter().zip(reordered.edges()) {
            assert_eq!(a.length, b.length);
            assert_eq!(reordering.dof_of(a.from_id), Some(b.from_id));
            assert_eq!(reordering.dof_of(a.to_id), Some(b.to_id));
        }
        for e in reordered.edges() {
            let pa = reordered.node(e.from_id).unwrap().position;
            let pb = reordered.node(e.to_id).unwrap().position;
            assert_eq!(e.length, nalgebra::distance(&pa, &pb));
        }
    }

    #[test]
    fn boundary_nodes_are_exactly_degree_one_vertices() {
        let grid = branched_grid();
        let reordering = dfs_from_soma(&grid);
        let cell = NeuronCell::build_from_grid(&grid, Some(&reordering)).unwrap();

        let mut expected: Vec<usize> = (0..grid.vertex_count())
            .filter(|&v| grid.degree(v) == 1)
            .map(|v| reordering.dof_of(v).unwrap())
            .collect();
        expected.sort_unstable();
        assert_eq!(cell.boundary_ids(), expected.as_slice());
        assert_eq!(cell.branch_ids(), vec![0]);
    }

    #[test]
    fn soma_ids_are_translated_into_dof_space() {
        let grid = branched_grid();
        let reordering = dfs_from_soma(&grid);

        let native = NeuronCell::build_from_grid(&grid, None).unwrap();
        assert_eq!(native.soma_ids(), &[2]);

        let reordered = NeuronCell::build_from_grid(&grid, Some(&reordering)).unwrap();
        assert_eq!(reordered.soma_ids(), &[0]);
    }

    #[test]
    fn missing_soma_subset_yields_empty_soma_list() {
        let grid = branched_grid();
        let cell = NeuronCell::build_from_grid_with_soma(&grid, None, "cell-body").unwrap();
        assert!(cell.soma_ids().is_empty());
    }

    #[test]
    fn missing_diameter_is_reported() {
        let mut builder = GridBuilder::new();
        builder.add_vertex(Point3::origin());
        builder.add_vertex(Point3::new(1.0, 0.0, 0.0));
        builder.set_diameter(0, 1.0).unwrap();
        builder.add_edge(0, 1).unwrap();
        let result = NeuronCell::build_from_grid(&builder.build(), None);
        assert_eq!(result.unwrap_err(), CellError::MissingDiameter { vertex: 1 });
    }

    #[test]
    fn reordering_of_wrong_size_is_rejected() {
        let grid = path_grid();
        let result = NeuronCell::build_from_grid(&grid, Some(&Reordering::identity(3)));
        assert_eq!(
            result.unwrap_err(),
            CellError::ReorderingMismatch {
                reordering: 3,
                grid: 4
            }
        );
    }

    #[test]
    fn statistics_on_edgeless_cell_fail_with_empty_graph() {
        let mut builder = GridBuilder::new();
        let id = builder.add_vertex(Point3::origin());
        builder.set_diameter(id, 1.0).unwrap();
        let cell = NeuronCell::build_from_grid(&builder.build(), None).unwrap();

        assert_eq!(cell.average_edge_length(), Err(CellError::EmptyGraph));
        assert_eq!(cell.min_edge_length(), Err(CellError::EmptyGraph));
        assert_eq!(cell.total_cable_length(), 0.0);
    }

    #[test]
    fn edge_length_stats_aggregate_all_edges() {
        let cell = NeuronCell::build_from_grid(&branched_grid(), None).unwrap();
        let stats = cell.edge_length_stats().unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 1.0);
        assert_eq!(stats.total, 6.0);
        assert_eq!(cell.total_cable_length(), 6.0);
        let (lo, hi) = cell.bounds().unwrap();
        assert_eq!(lo, Point3::new(-1.0, 0.0, 0.0));
        assert_eq!(hi, Point3::new(3.0, 2.0, 0.0));
    }

    #[test]
    fn builder_connects_nodes_and_derives_boundaries() {
        let mut builder = NeuronCellBuilder::new();
        let a = builder.push_node(1.0, Point3::origin());
        let b = builder.push_node(0.5, Point3::new(0.0, 3.0, 4.0));
        let c = builder.push_node(0.5, Point3::new(0.0, 3.0, 5.0));
        builder.connect(b, a).unwrap().connect(c, b).unwrap();
        builder.mark_soma(a).unwrap();
        assert!(builder.connect(a, 9).is_err());
        assert!(builder.connect(a, a).is_err());
        assert!(builder.mark_soma(9).is_err());

        let cell = builder.build();
        assert_eq!(cell.edges()[0].length, 5.0);
        assert_eq!(cell.boundary_ids(), &[0, 2]);
        assert_eq!(cell.soma_ids(), &[0]);
        assert_eq!(cell.node(1).unwrap().neighbor_ids, vec![0, 2]);
    }

    #[test]
    fn swc_file_builds_cell_without_reordering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cell.swc");
        std::fs::write(&path, "1 1 0 0 0 1 -1\n2 3 0 0 3 0.5 1\n3 3 0 4 0 0.5 1\n").unwrap();

        let cell = NeuronCell::build_from_swc(&path).unwrap();
        assert_eq!(cell.vertex_count(), 3);
        assert_eq!(cell.soma_ids(), &[0]);
        assert_eq!(cell.boundary_ids(), &[1, 2]);
        assert_eq!(cell.max_edge_length().unwrap(), 4.0);

        let missing = NeuronCell::build_from_swc(dir.path().join("absent.swc"));
        assert!(matches!(missing, Err(SwcError::NotFound(_))));
    }

    #[test]
    fn display_formats_records() {
        let node = Node {
            id: 3,
            radius: 0.5,
            position: Point3::new(1.0, 2.0, 3.0),
            neighbor_ids: vec![2, 4],
        };
        assert_eq!(
            node.to_string(),
            "Node     3: radius 0.5000, position (1.0000, 2.0000, 3.0000), neighbors [2, 4]"
        );
        let edge = CellEdge {
            from_id: 1,
            to_id: 2,
            length: 1.25,
        };
        assert_eq!(edge.to_string(), "Edge     1 ->     2: length 1.2500");
    }
}
