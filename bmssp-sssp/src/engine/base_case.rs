use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::graph::Node;
use crate::labels::Key;

use super::Engine;

impl Engine<'_> {
    /// Dijkstra from `root` below `bound`, stopped once `k + 1` vertices are
    /// settled. If it stops early the largest settled key becomes the new
    /// bound and that vertex is given back.
    pub(crate) fn base_case(&mut self, bound: Key, root: Node) -> (Key, Vec<Node>) {
        let k = self.params.k;
        let graph = self.graph;
        let mut settled: Vec<Node> = Vec::new();
        let mut done: HashSet<Node> = HashSet::new();
        let mut heap = BinaryHeap::new();
        heap.push(Reverse(self.table.key(root)));

        while settled.len() <= k {
            let Some(Reverse(key)) = heap.pop() else { break };
            let u = key.vertex;
            if key != self.table.key(u) || !done.insert(u) {
                continue;
            }
            settled.push(u);
            for &(v, w) in &graph.adj[u] {
                if let Some(next) = self.table.relax_below(u, v, w, bound) {
                    if !done.contains(&v) {
                        heap.push(Reverse(next));
                    }
                }
            }
        }

        if settled.len() <= k {
            return (bound, settled);
        }
        let Some(cut) = settled.iter().map(|&v| self.table.key(v)).max() else {
            return (bound, settled);
        };
        settled.retain(|&v| self.table.key(v) < cut);
        (cut, settled)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Params;
    use crate::engine::Engine;
    use crate::graph::Graph;
    use crate::labels::{DistanceTable, Key};

    fn chain(n: usize) -> Graph {
        let mut g = Graph::new(n);
        for i in 0..n - 1 {
            g.add_edge(i, i + 1, 1.0);
        }
        g
    }

    #[test]
    fn stops_after_k_plus_one_and_gives_back_the_last() {
        let g = chain(6);
        let mut engine = Engine::new(&g, DistanceTable::new(6, 0), Params { k: 2, t: 1, level: 1 });
        let (bound, settled) = engine.base_case(Key::INFINITY, 0);
        assert_eq!(settled, vec![0, 1]);
        assert_eq!(bound, engine.table().key(2));
        assert_eq!(engine.table().dist(3), 3.0);
    }

    #[test]
    fn small_component_keeps_the_bound() {
        let g = chain(3);
        let mut engine = Engine::new(&g, DistanceTable::new(3, 0), Params { k: 5, t: 1, level: 1 });
        let bound = Key { dist: 10.0, hops: 0, vertex: 0 };
        let (b, settled) = engine.base_case(bound, 0);
        assert_eq!(b, bound);
        assert_eq!(settled, vec![0, 1, 2]);
    }

    #[test]
    fn edges_at_or_above_the_bound_are_not_relaxed() {
        let g = chain(4);
        let mut engine = Engine::new(&g, DistanceTable::new(4, 0), Params { k: 5, t: 1, level: 1 });
        let bound = Key { dist: 2.0, hops: 0, vertex: 0 };
        let (b, settled) = engine.base_case(bound, 0);
        assert_eq!(b, bound);
        assert_eq!(settled, vec![0, 1]);
        assert!(engine.table().dist(2).is_infinite());
    }
}
