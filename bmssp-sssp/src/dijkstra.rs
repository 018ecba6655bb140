//! Binary-heap Dijkstra with lazy deletion. Answers queries on small graphs
//! and serves as the reference the recursive solver is checked against.
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::error::Result;
use crate::graph::{Graph, Node, Weight};
use crate::tree::ShortestPathTree;

#[derive(Copy, Clone, Debug)]
struct Entry { d: Weight, v: Node }
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.d.total_cmp(&other.d).then(self.v.cmp(&other.v))
    }
}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}
impl Eq for Entry {}

/// Plain single-source Dijkstra over the whole graph.
pub fn dijkstra(g: &Graph, source: Node) -> Result<ShortestPathTree> {
    g.validate_query(source)?;
    let n = g.len();
    let mut dist = vec![Weight::INFINITY; n];
    let mut pred = vec![None; n];
    let mut heap: BinaryHeap<Reverse<Entry>> = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(Reverse(Entry { d: 0.0, v: source }));

    let mut settled: usize = 0;
    while let Some(Reverse(Entry { d, v })) = heap.pop() {
        if d != dist[v] { continue; }
        settled += 1;
        for &(to, w) in &g.adj[v] {
            let nd = d + w;
            if nd < dist[to] {
                dist[to] = nd;
                pred[to] = Some(v);
                heap.push(Reverse(Entry { d: nd, v: to }));
            }
        }
    }
    tracing::trace!(source, settled, "dijkstra finished");
    Ok(ShortestPathTree::new(source, dist, pred))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SsspError;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn line_graph(n: usize, w: Weight) -> Graph {
        let mut g = Graph::new(n);
        for i in 0..n-1 {
            g.add_edge(i, i+1, w);
            g.add_edge(i+1, i, w);
        }
        g
    }

    fn random_graph_er(n: usize, p: f64, maxw: u32, seed: u64) -> Graph {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut g = Graph::new(n);
        for u in 0..n {
            for v in 0..n {
                if u == v { continue; }
                if rng.gen::<f64>() < p {
                    let w = rng.gen_range(1..=maxw) as f64;
                    g.add_edge(u, v, w);
                }
            }
        }
        g
    }

    #[test]
    fn line_graph_distances() {
        let g = line_graph(6, 3.0);
        let tree = dijkstra(&g, 2).unwrap();
        assert_eq!(tree.distances(), &[6.0, 3.0, 0.0, 3.0, 6.0, 9.0]);
        assert_eq!(tree.path_to(5), Some(vec![2, 3, 4, 5]));
    }

    #[test]
    fn unreachable_vertices_stay_infinite() {
        let mut g = Graph::new(4);
        g.add_edge(0,1,5.0);
        g.add_edge(1,2,2.0);
        g.add_edge(3,0,1.0);
        let tree = dijkstra(&g, 0).unwrap();
        assert_eq!(tree.distance(2), 7.0);
        assert!(!tree.is_reachable(3));
        assert_eq!(tree.predecessor(3), None);
    }

    #[test]
    fn predecessors_are_tight() {
        let g = random_graph_er(120, 0.04, 9, 99);
        let tree = dijkstra(&g, 3).unwrap();
        assert_eq!(tree.distance(3), 0.0);
        assert_eq!(tree.predecessor(3), None);
        for v in 0..g.len() {
            if let Some(u) = tree.predecessor(v) {
                assert!(g.adj[u].iter().any(|&(x, w)| x == v && tree.distance(u) + w == tree.distance(v)));
            } else if v != 3 {
                assert!(!tree.is_reachable(v));
            }
        }
    }

    #[test]
    fn rejects_bad_source() {
        let g = line_graph(3, 1.0);
        assert_eq!(
            dijkstra(&g, 3).unwrap_err(),
            SsspError::SourceOutOfRange { vertex: 3, vertex_count: 3 }
        );
    }
}
