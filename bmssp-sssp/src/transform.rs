//! Degree-bounding transform.
//!
//! Every vertex `v` is replaced by one proxy per distinct neighbour (in- or
//! out-), the proxies of `v` form a zero-weight cycle, and an original edge
//! `u -> v` becomes an edge from proxy `(u, v)` to proxy `(v, u)`. On a graph
//! without parallel edges each proxy then has in- and out-degree at most 2,
//! and distances between proxies of different vertices equal the original
//! distances.
use crate::graph::{Graph, Node};

#[derive(Clone, Debug)]
pub struct DegreeBoundedGraph {
    pub graph: Graph,
    /// Original vertex -> its first proxy.
    pub representative: Vec<Node>,
    /// Proxy -> original vertex.
    pub owner: Vec<Node>,
}

impl DegreeBoundedGraph {
    pub fn proxy_count(&self) -> usize { self.graph.len() }

    /// Reads per-proxy values back onto original vertices.
    pub fn project<T: Copy>(&self, values: &[T]) -> Vec<T> {
        self.representative.iter().map(|&x| values[x]).collect()
    }

    /// Original predecessor of `v` given predecessors over proxies: walk back
    /// from `representative[v]` along `v`'s own cycle until a proxy owned by
    /// another vertex appears.
    pub fn original_predecessor(&self, pred: &[Option<Node>], v: Node) -> Option<Node> {
        let mut x = self.representative[v];
        for _ in 0..pred.len() {
            let p = pred[x]?;
            if self.owner[p] != v {
                return Some(self.owner[p]);
            }
            x = p;
        }
        None
    }
}

/// Builds the bounded-degree proxy graph. Expects a validated graph.
pub fn bound_degrees(g: &Graph) -> DegreeBoundedGraph {
    let n = g.len();
    let mut neighbors: Vec<Vec<Node>> = vec![Vec::new(); n];
    for (u, edges) in g.adj.iter().enumerate() {
        for &(v, _) in edges {
            neighbors[u].push(v);
            neighbors[v].push(u);
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
        list.dedup();
    }

    let mut representative = Vec::with_capacity(n);
    let mut total = 0usize;
    for list in &neighbors {
        representative.push(total);
        total += list.len().max(1);
    }

    let mut graph = Graph::new(total);
    let mut owner = vec![0; total];
    for (v, list) in neighbors.iter().enumerate() {
        let base = representative[v];
        let deg = list.len();
        owner[base..base + deg.max(1)].fill(v);
        if deg > 1 {
            for i in 0..deg {
                graph.add_edge(base + i, base + (i + 1) % deg, 0.0);
            }
        }
    }

    let proxy = |v: Node, w: Node| -> Option<Node> {
        neighbors[v].binary_search(&w).ok().map(|i| representative[v] + i)
    };
    for (u, edges) in g.adj.iter().enumerate() {
        for &(v, w) in edges {
            if let (Some(from), Some(to)) = (proxy(u, v), proxy(v, u)) {
                graph.add_edge(from, to, w);
            }
        }
    }

    DegreeBoundedGraph { graph, representative, owner }
}
