use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderingError {
    #[error("Root subset '{subset}' is missing or empty")]
    MissingRoot { subset: String },

    #[error("Root vertex {root} is out of range (grid has {count} vertices)")]
    RootOutOfRange { root: usize, count: usize },

    #[error("Traversal reached {reached} of {total} vertices; the grid is disconnected")]
    Permutation { reached: usize, total: usize },

    #[error("Order is not a permutation of 0..{len}: {reason}")]
    NotBijective { len: usize, reason: String },
}

/// Bijection between grid vertex ids and solver DoF indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reordering {
    to_dof: Vec<usize>,
    to_vertex: Vec<usize>,
}

impl Reordering {
    pub fn identity(len: usize) -> Self {
        Self {
            to_dof: (0..len).collect(),
            to_vertex: (0..len).collect(),
        }
    }

    /// Builds a reordering from vertex ids listed in DoF order, i.e.
    /// `order[dof] == vertex`.
    pub fn from_order(order: Vec<usize>) -> Result<Self, ReorderingError> {
        let len = order.len();
        let mut to_dof = vec![usize::MAX; len];
        for (dof, &vertex) in order.iter().enumerate() {
            let slot = to_dof
                .get_mut(vertex)
                .ok_or_else(|| ReorderingError::NotBijective {
                    len,
                    reason: format!("vertex {} is out of range", vertex),
                })?;
            if *slot != usize::MAX {
                return Err(ReorderingError::NotBijective {
                    len,
                    reason: format!("vertex {} appears more than once", vertex),
                });
            }
            *slot = dof;
        }
        Ok(Self {
            to_dof,
            to_vertex: order,
        })
    }

    pub fn len(&self) -> usize {
        self.to_dof.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_dof.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.to_dof.iter().enumerate().all(|(i, &d)| i == d)
    }

    pub fn dof_of(&self, vertex: usize) -> Option<usize> {
        self.to_dof.get(vertex).copied()
    }

    pub fn vertex_of(&self, dof: usize) -> Option<usize> {
        self.to_vertex.get(dof).copied()
    }

    /// Vertex ids in DoF order.
    pub fn order(&self) -> &[usize] {
        &self.to_vertex
    }

    /// `(vertex, dof)` pairs in vertex order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.to_dof.iter().copied().enumerate()
    }
}

/// DoF index of `vertex`. Without a reordering the index is unchanged.
pub fn dof_index(vertex: usize, reordering: Option<&Reordering>) -> Option<usize> {
    match reordering {
        Some(r) => r.dof_of(vertex),
        None => Some(vertex),
    }
}

/// Vertex id owning `dof`. Without a reordering the index is unchanged.
pub fn vertex_index(dof: usize, reordering: Option<&Reordering>) -> Option<usize> {
    match reordering {
        Some(r) => r.vertex_of(dof),
        None => Some(dof),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_maps_every_index_to_itself() {
        let r = Reordering::identity(4);
        assert!(r.is_identity());
        assert_eq!(r.len(), 4);
        for i in 0..4 {
            assert_eq!(r.dof_of(i), Some(i));
            assert_eq!(r.vertex_of(i), Some(i));
        }
        assert_eq!(r.dof_of(4), None);
    }

    #[test]
    fn from_order_builds_inverse_mapping() {
        let r = Reordering::from_order(vec![2, 0, 3, 1]).unwrap();
        assert_eq!(r.dof_of(2), Some(0));
        assert_eq!(r.dof_of(0), Some(1));
        assert_eq!(r.dof_of(3), Some(2));
        assert_eq!(r.dof_of(1), Some(3));
        assert_eq!(r.vertex_of(0), Some(2));
        assert_eq!(r.order(), &[2, 0, 3, 1]);
        assert!(!r.is_identity());
        assert_eq!(r.pairs().collect::<Vec<_>>(), vec![(0, 1), (1, 3), (2, 0), (3, 2)]);
    }

    #[test]
    fn from_order_rejects_duplicates_and_out_of_range() {
        assert!(matches!(
            Reordering::from_order(vec![0, 0, 1]),
            Err(ReorderingError::NotBijective { len: 3, .. })
        ));
        assert!(matches!(
            Reordering::from_order(vec![0, 5]),
            Err(ReorderingError::NotBijective { len: 2, .. })
        ));
    }

    #[test]
    fn lookups_without_reordering_match_identity() {
        let identity = Reordering::identity(5);
        for i in 0..5 {
            assert_eq!(dof_index(i, None), dof_index(i, Some(&identity)));
            assert_eq!(vertex_index(i, None), vertex_index(i, Some(&identity)));
        }
    }

    #[test]
    fn lookups_go_through_supplied_reordering() {
        let r = Reordering::from_order(vec![1, 0]).unwrap();
        assert_eq!(dof_index(0, Some(&r)), Some(1));
        assert_eq!(vertex_index(0, Some(&r)), Some(1));
        assert_eq!(dof_index(7, Some(&r)), None);
    }
}
