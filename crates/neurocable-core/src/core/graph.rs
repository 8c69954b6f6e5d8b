//! Generic undirected graph over hashable vertex ids.
//!
//! Edges are only recorded between vertices that were registered beforehand;
//! an edge naming an unknown vertex is ignored rather than creating that
//! vertex implicitly. Traversals use an explicit stack so that long cable
//! branches cannot exhaust the call stack.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct Graph<V> {
    adjacency: HashMap<V, HashSet<V>>,
}

impl<V> Default for Graph<V> {
    fn default() -> Self {
        Self {
            adjacency: HashMap::new(),
        }
    }
}

impl<V: Eq + Hash + Clone> Graph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an isolated vertex. Registering it again has no effect.
    pub fn add_vertex(&mut self, id: V) {
        self.adjacency.entry(id).or_default();
    }

    /// Records the undirected edge `a - b`.
    ///
    /// Returns `false` and leaves the graph untouched when either endpoint
    /// has not been registered with [`Graph::add_vertex`].
    pub fn add_edge(&mut self, a: V, b: V) -> bool {
        if !self.adjacency.contains_key(&a) || !self.adjacency.contains_key(&b) {
            return false;
        }
        if let Some(neighbors) = self.adjacency.get_mut(&a) {
            neighbors.insert(b.clone());
        }
        if let Some(neighbors) = self.adjacency.get_mut(&b) {
            neighbors.insert(a);
        }
        true
    }

    pub fn contains(&self, id: &V) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn neighbors(&self, id: &V) -> Option<&HashSet<V>> {
        self.adjacency.get(id)
    }

    pub fn degree(&self, id: &V) -> usize {
        self.adjacency.get(id).map_or(0, HashSet::len)
    }

    /// Set of vertices reachable from `start`, including `start` itself.
    ///
    /// An unregistered `start` yields the empty set.
    pub fn depth_first_search(&self, start: &V) -> HashSet<V> {
        let mut visited = HashSet::new();
        if !self.contains(start) {
            return visited;
        }

        let mut stack = vec![start.clone()];
        while let Some(vertex) = stack.pop() {
            if !visited.insert(vertex.clone()) {
                continue;
            }
            if let Some(neighbors) = self.adjacency.get(&vertex) {
                stack.extend(neighbors.iter().filter(|n| !visited.contains(*n)).cloned());
            }
        }
        visited
    }
}

impl<V: Eq + Hash + Clone + Ord> Graph<V> {
    /// Preorder of a depth-first traversal from `start`.
    ///
    /// Siblings are visited in ascending id order, which makes the result
    /// independent of hash iteration order.
    pub fn depth_first_order(&self, start: &V) -> Vec<V> {
        let mut order = Vec::new();
        if !self.contains(start) {
            return order;
        }

        let mut visited = HashSet::new();
        let mut stack = vec![start.clone()];
        while let Some(vertex) = stack.pop() {
            if !visited.insert(vertex.clone()) {
                continue;
            }
            if let Some(neighbors) = self.adjacency.get(&vertex) {
                let mut pending: Vec<&V> =
                    neighbors.iter().filter(|n| !visited.contains(*n)).collect();
                // Largest first so the smallest id is popped next.
                pending.sort_unstable_by(|a, b| b.cmp(a));
                stack.extend(pending.into_iter().cloned());
            }
            order.push(vertex);
        }
        order
    }
}
