use super::reordering::{Reordering, ReorderingError, dof_index};
use crate::core::graph::Graph;
use crate::core::models::grid::Grid;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderingStrategy {
    /// Keep the grid's native vertex numbering.
    #[serde(rename = "identity")]
    Identity,
    /// Number vertices in depth-first preorder from the root.
    #[default]
    #[serde(rename = "depth-first")]
    DepthFirst,
    /// Breadth-first from the root, visiting low-degree neighbors first.
    #[serde(rename = "cuthill-mckee")]
    CuthillMcKee,
}

impl OrderingStrategy {
    pub const ALL: [OrderingStrategy; 3] = [
        OrderingStrategy::Identity,
        OrderingStrategy::DepthFirst,
        OrderingStrategy::CuthillMcKee,
    ];
}

#[derive(Debug, Error)]
#[error("Invalid ordering strategy '{0}' (expected identity, depth-first or cuthill-mckee)")]
pub struct ParseOrderingStrategyError(String);

impl FromStr for OrderingStrategy {
    type Err = ParseOrderingStrategyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "identity" | "none" => Ok(Self::Identity),
            "depth-first" | "dfs" => Ok(Self::DepthFirst),
            "cuthill-mckee" | "cm" => Ok(Self::CuthillMcKee),
            _ => Err(ParseOrderingStrategyError(s.to_string())),
        }
    }
}

impl fmt::Display for OrderingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Identity => "identity",
                Self::DepthFirst => "depth-first",
                Self::CuthillMcKee => "cuthill-mckee",
            }
        )
    }
}

/// What to do with vertices the traversal from the root cannot reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisconnectedPolicy {
    /// Refuse to produce a partial numbering.
    #[default]
    Fail,
    /// Continue from the smallest unnumbered vertex until every vertex is numbered.
    PerComponent,
}

/// First vertex of the named subset, used as traversal root.
pub fn soma_root(grid: &Grid, subset_name: &str) -> Result<usize, ReorderingError> {
    grid.subset(subset_name)
        .and_then(|s| s.vertices.first().copied())
        .ok_or_else(|| ReorderingError::MissingRoot {
            subset: subset_name.to_string(),
        })
}

#[instrument(skip_all, name = "compute_ordering", fields(strategy = %strategy, root = root))]
pub fn compute_ordering(
    grid: &Grid,
    strategy: OrderingStrategy,
    root: usize,
    policy: DisconnectedPolicy,
) -> Result<Reordering, ReorderingError> {
    let count = grid.vertex_count();
    if strategy == OrderingStrategy::Identity {
        return Ok(Reordering::identity(count));
    }
    if root >= count {
        return Err(ReorderingError::RootOutOfRange { root, count });
    }

    let graph = (strategy == OrderingStrategy::DepthFirst).then(|| vertex_graph(grid));
    let traverse = |start: usize| match &graph {
        Some(graph) => graph.depth_first_order(&start),
        None => cuthill_mckee_order(grid, start),
    };

    let mut order = traverse(root);
    if order.len() < count {
        match policy {
            DisconnectedPolicy::Fail => {
                return Err(ReorderingError::Permutation {
                    reached: order.len(),
                    total: count,
                });
            }
            DisconnectedPolicy::PerComponent => {
                warn!(
                    "Grid is disconnected: root component covers {} of {} vertices; numbering remaining components.",
                    order.len(),
                    count
                );
                let mut numbered = vec![false; count];
                for &v in &order {
                    numbered[v] = true;
                }
                for start in 0..count {
                    if numbered[start] {
                        continue;
                    }
                    let component = traverse(start);
                    for &v in &component {
                        numbered[v] = true;
                    }
                    order.extend(component);
                }
            }
        }
    }

    let reordering = Reordering::from_order(order)?;
    debug!(
        "Computed {} ordering over {} vertices (bandwidth {}).",
        strategy,
        count,
        matrix_bandwidth(grid, Some(&reordering))
    );
    Ok(reordering)
}

/// Largest `|dof(a) - dof(b)|` over all grid edges.
///
/// Edges whose endpoints are not covered by `reordering` are skipped.
pub fn matrix_bandwidth(grid: &Grid, reordering: Option<&Reordering>) -> usize {
    grid.edges()
        .iter()
        .filter_map(|edge| {
            let (a, b) = edge.endpoints();
            let da = dof_index(a, reordering)?;
            let db = dof_index(b, reordering)?;
            Some(da.abs_diff(db))
        })
        .max()
        .unwrap_or(0)
}

fn vertex_graph(grid: &Grid) -> Graph<usize> {
    let mut graph = Graph::new();
    for vertex in grid.vertices() {
        graph.add_vertex(vertex.id);
    }
    for edge in grid.edges() {
        let (a, b) = edge.endpoints();
        graph.add_edge(a, b);
    }
    graph
}

fn cuthill_mckee_order(grid: &Grid, start: usize) -> Vec<usize> {
    let mut visited = vec![false; grid.vertex_count()];
    let mut order = Vec::new();
    let mut queue = VecDeque::from([start]);
    visited[start] = true;

    while let Some(vertex) = queue.pop_front() {
        order.push(vertex);
        let mut next: Vec<usize> = grid
            .neighbors(vertex)
            .iter()
            .copied()
            .filter(|&n| !visited[n])
            .collect();
        next.sort_unstable_by_key(|&n| (grid.degree(n), n));
        for n in next {
            visited[n] = true;
            queue.push_back(n);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::grid::test_grids::*;
    use crate::core::models::grid::{GridBuilder, SOMA_SUBSET_NAME};
    use nalgebra::Point3;

    fn assert_is_permutation(r: &Reordering, n: usize) {
        let mut dofs: Vec<usize> = (0..n).map(|v| r.dof_of(v).unwrap()).collect();
        dofs.sort_unstable();
        assert_eq!(dofs, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn identity_strategy_ignores_root() {
        let grid = path_grid();
        let r = compute_ordering(&grid, OrderingStrategy::Identity, 99, DisconnectedPolicy::Fail)
            .unwrap();
        assert!(r.is_identity());
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn depth_first_on_path_from_soma_is_identity() {
        let grid = path_grid();
        let root = soma_root(&grid, SOMA_SUBSET_NAME).unwrap();
        assert_eq!(root, 0);
        let r = compute_ordering(&grid, OrderingStrategy::DepthFirst, root, DisconnectedPolicy::Fail)
            .unwrap();
        for v in 0..4 {
            assert_eq!(r.dof_of(v), Some(v));
        }
    }

    #[test]
    fn depth_first_numbers_whole_branches_contiguously() {
        let grid = branched_grid();
        let root = soma_root(&grid, SOMA_SUBSET_NAME).unwrap();
        let r = compute_ordering(&grid, OrderingStrategy::DepthFirst, root, DisconnectedPolicy::Fail)
            .unwrap();
        assert_eq!(r.order(), &[2, 0, 1, 4, 3, 5, 6]);
        assert_is_permutation(&r, grid.vertex_count());
    }

    #[test]
    fn cuthill_mckee_visits_by_level_and_degree() {
        let grid = branched_grid();
        let r = compute_ordering(&grid, OrderingStrategy::CuthillMcKee, 2, DisconnectedPolicy::Fail)
            .unwrap();
        // Level 1: 0 (degree 1) before 1 and 3 (degree 2, tie broken by id).
        assert_eq!(r.order(), &[2, 0, 1, 3, 4, 5, 6]);
        assert_is_permutation(&r, grid.vertex_count());
    }

    #[test]
    fn cuthill_mckee_narrows_bandwidth_of_scrambled_star() {
        // Center 0 with four two-vertex arms labelled to interleave arms.
        let mut builder = GridBuilder::new();
        for i in 0..9 {
            builder.add_vertex(Point3::new(i as f64, 0.0, 0.0));
        }
        for (a, b) in [(0, 1), (0, 2), (0, 3), (0, 4), (1, 8), (2, 7), (3, 6), (4, 5)] {
            builder.add_edge(a, b).unwrap();
        }
        let grid = builder.build();

        let identity = matrix_bandwidth(&grid, None);
        let r = compute_ordering(&grid, OrderingStrategy::CuthillMcKee, 0, DisconnectedPolicy::Fail)
            .unwrap();
        assert_eq!(identity, 7);
        assert_eq!(matrix_bandwidth(&grid, Some(&r)), 4);
    }

    #[test]
    fn disconnected_grid_fails_by_default() {
        let grid = disconnected_grid();
        for strategy in [OrderingStrategy::DepthFirst, OrderingStrategy::CuthillMcKee] {
            let result = compute_ordering(&grid, strategy, 0, DisconnectedPolicy::Fail);
            assert_eq!(
                result,
                Err(ReorderingError::Permutation {
                    reached: 3,
                    total: 5
                })
            );
        }
    }

    #[test]
    fn disconnected_grid_numbered_per_component_when_allowed() {
        let grid = disconnected_grid();
        let r = compute_ordering(
            &grid,
            OrderingStrategy::DepthFirst,
            0,
            DisconnectedPolicy::PerComponent,
        )
        .unwrap();
        assert_eq!(r.order(), &[0, 1, 2, 3, 4]);
        assert_is_permutation(&r, 5);

        let r = compute_ordering(
            &grid,
            OrderingStrategy::DepthFirst,
            4,
            DisconnectedPolicy::PerComponent,
        )
        .unwrap();
        assert_eq!(r.order(), &[4, 3, 0, 1, 2]);
    }

    #[test]
    fn missing_or_out_of_range_root_is_an_error() {
        let grid = path_grid();
        assert_eq!(
            soma_root(&grid, "axon"),
            Err(ReorderingError::MissingRoot {
                subset: "axon".into()
            })
        );
        assert_eq!(
            compute_ordering(&grid, OrderingStrategy::DepthFirst, 4, DisconnectedPolicy::Fail),
            Err(ReorderingError::RootOutOfRange { root: 4, count: 4 })
        );
    }

    #[test]
    fn empty_subset_has_no_root() {
        let mut builder = GridBuilder::new();
        builder.add_vertex(Point3::origin());
        builder.add_subset(SOMA_SUBSET_NAME, vec![], vec![]).unwrap();
        assert!(soma_root(&builder.build(), SOMA_SUBSET_NAME).is_err());
    }

    #[test]
    fn strategy_parses_and_displays() {
        for strategy in OrderingStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<OrderingStrategy>().unwrap(), strategy);
        }
        assert_eq!("DFS".parse::<OrderingStrategy>().unwrap(), OrderingStrategy::DepthFirst);
        assert!("random".parse::<OrderingStrategy>().is_err());
    }

    #[test]
    fn bandwidth_of_path_is_one() {
        assert_eq!(matrix_bandwidth(&path_grid(), None), 1);
    }
}
