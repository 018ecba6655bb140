use serde::Serialize;

use crate::graph::{Node, Weight};

/// Distances and predecessors from one source, indexed by original vertex.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShortestPathTree {
    source: Node,
    dist: Vec<Weight>,
    pred: Vec<Option<Node>>,
}

impl ShortestPathTree {
    pub(crate) fn new(source: Node, dist: Vec<Weight>, pred: Vec<Option<Node>>) -> Self {
        debug_assert_eq!(dist.len(), pred.len());
        Self { source, dist, pred }
    }

    pub fn source(&self) -> Node { self.source }
    pub fn len(&self) -> usize { self.dist.len() }
    pub fn is_empty(&self) -> bool { self.dist.is_empty() }
    pub fn distances(&self) -> &[Weight] { &self.dist }
    pub fn into_distances(self) -> Vec<Weight> { self.dist }
    pub fn distance(&self, v: Node) -> Weight { self.dist[v] }
    pub fn predecessor(&self, v: Node) -> Option<Node> { self.pred[v] }
    pub fn is_reachable(&self, v: Node) -> bool { self.dist[v].is_finite() }
    pub fn reachable_count(&self) -> usize { self.dist.iter().filter(|d| d.is_finite()).count() }

    /// Vertices from the source to `v`, or `None` when `v` is unreachable.
    pub fn path_to(&self, v: Node) -> Option<Vec<Node>> {
        if !self.is_reachable(v) {
            return None;
        }
        let mut path = vec![v];
        let mut cur = v;
        while cur != self.source {
            cur = self.pred[cur]?;
            path.push(cur);
            if path.len() > self.dist.len() {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_reconstruction() {
        let inf = Weight::INFINITY;
        let tree = ShortestPathTree::new(
            0,
            vec![0.0, 1.0, 3.0, inf],
            vec![None, Some(0), Some(1), None],
        );
        assert_eq!(tree.path_to(2), Some(vec![0, 1, 2]));
        assert_eq!(tree.path_to(0), Some(vec![0]));
        assert_eq!(tree.path_to(3), None);
        assert_eq!(tree.reachable_count(), 3);
    }
}
