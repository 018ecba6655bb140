//! Directed weighted graph stored as per-vertex adjacency lists.
use crate::error::{Result, SsspError};

pub type Node = usize;
pub type Weight = f64;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    pub adj: Vec<Vec<(Node, Weight)>>,
}

impl Graph {
    pub fn new(n: usize) -> Self { Self { adj: vec![Vec::new(); n] } }
    pub fn from_adjacency(adj: Vec<Vec<(Node, Weight)>>) -> Self { Self { adj } }
    pub fn len(&self) -> usize { self.adj.len() }
    pub fn is_empty(&self) -> bool { self.adj.is_empty() }
    pub fn edge_count(&self) -> usize { self.adj.iter().map(|v| v.len()).sum() }
    /// Panics if `u` is not a vertex; targets and weights are checked by [`Graph::validate`].
    pub fn add_edge(&mut self, u: Node, v: Node, w: Weight) { self.adj[u].push((v,w)); }
    pub fn add_undirected_edge(&mut self, u: Node, v: Node, w: Weight) {
        self.add_edge(u,v,w); self.add_edge(v,u,w);
    }

    /// Checks that every edge targets a vertex of the graph and carries a
    /// finite, non-negative weight.
    pub fn validate(&self) -> Result<()> {
        let n = self.len();
        for (from, edges) in self.adj.iter().enumerate() {
            for &(to, weight) in edges {
                if to >= n {
                    return Err(SsspError::TargetOutOfRange { from, to, vertex_count: n });
                }
                if !weight.is_finite() || weight < 0.0 {
                    return Err(SsspError::InvalidWeight { from, to, weight });
                }
            }
        }
        Ok(())
    }

    /// Validates the graph and the query origin together.
    pub fn validate_query(&self, source: Node) -> Result<()> {
        if source >= self.len() {
            return Err(SsspError::SourceOutOfRange { vertex: source, vertex_count: self.len() });
        }
        self.validate()
    }

    pub fn memory_estimate_bytes(&self) -> usize {
        let n = self.adj.len();
        let m = self.edge_count();
        let edge_bytes = m * (std::mem::size_of::<usize>() + std::mem::size_of::<Weight>());
        let vec_headers = n * 3 * std::mem::size_of::<usize>();
        let outer_vec_header = 3 * std::mem::size_of::<usize>();
        let dist_bytes = n * std::mem::size_of::<Weight>();
        let pred_bytes = n * std::mem::size_of::<Option<Node>>();
        edge_bytes + vec_headers + outer_vec_header + dist_bytes + pred_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_estimate() {
        let mut g = Graph::new(5);
        g.add_undirected_edge(0,1,1.0);
        g.add_undirected_edge(1,2,1.0);
        g.add_undirected_edge(2,3,1.0);
        g.add_undirected_edge(3,4,1.0);
        assert_eq!(g.edge_count(), 8);
        assert!(g.memory_estimate_bytes() > 0);
    }

    #[test]
    fn validate_rejects_out_of_range_target() {
        let g = Graph::from_adjacency(vec![vec![(1, 1.0)], vec![(5, 2.0)]]);
        assert_eq!(
            g.validate(),
            Err(SsspError::TargetOutOfRange { from: 1, to: 5, vertex_count: 2 })
        );
    }

    #[test]
    fn validate_rejects_bad_weights() {
        let mut g = Graph::new(2);
        g.add_edge(0, 1, -0.5);
        assert!(matches!(g.validate(), Err(SsspError::InvalidWeight { from: 0, to: 1, .. })));

        let mut g = Graph::new(2);
        g.add_edge(1, 0, f64::NAN);
        assert!(matches!(g.validate(), Err(SsspError::InvalidWeight { from: 1, to: 0, .. })));
    }

    #[test]
    fn validate_query_checks_source_first() {
        let g = Graph::new(3);
        assert_eq!(
            g.validate_query(3),
            Err(SsspError::SourceOutOfRange { vertex: 3, vertex_count: 3 })
        );
        assert!(g.validate_query(2).is_ok());
        assert!(Graph::new(0).validate_query(0).is_err());
    }

    #[test]
    fn zero_weights_are_allowed() {
        let mut g = Graph::new(2);
        g.add_edge(0, 1, 0.0);
        assert!(g.validate().is_ok());
    }
}
