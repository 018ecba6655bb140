//! Recursive bounded multi-source shortest paths over a degree-bounded graph.
//!
//! `bmssp(level, B, S)` settles every vertex whose shortest path below `B`
//! passes through `S`, or returns a tighter bound `B'` together with the
//! vertices it completed below `B'`. Level 0 is a capped Dijkstra; higher
//! levels shrink `S` to pivots and split the work through a [`FrontierQueue`].
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use serde::Serialize;

use crate::config::Params;
use crate::frontier::FrontierQueue;
use crate::graph::{Graph, Node};
use crate::labels::{DistanceTable, Key};

mod base_case;
mod pivots;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub recursive_calls: u64,
    pub base_cases: u64,
    pub pulls: u64,
    pub sweep_corrections: u64,
}

pub(crate) struct Engine<'g> {
    graph: &'g Graph,
    table: DistanceTable,
    params: Params,
    stats: EngineStats,
}

impl<'g> Engine<'g> {
    pub(crate) fn new(graph: &'g Graph, table: DistanceTable, params: Params) -> Self {
        Self { graph, table, params, stats: EngineStats::default() }
    }

    pub(crate) fn stats(&self) -> EngineStats { self.stats }
    pub(crate) fn table(&self) -> &DistanceTable { &self.table }

    pub(crate) fn into_table(self) -> DistanceTable { self.table }

    /// Returns `(B', U)`: a bound no larger than `bound` and the vertices
    /// settled below it.
    pub(crate) fn bmssp(&mut self, level: usize, bound: Key, sources: Vec<Node>) -> (Key, Vec<Node>) {
        self.stats.recursive_calls += 1;
        let Some(&root) = sources.first() else {
            return (bound, Vec::new());
        };
        if level == 0 {
            self.stats.base_cases += 1;
            return self.base_case(bound, root);
        }

        let (pivots, witnesses) = self.find_pivots(bound, &sources);
        let mut queue = FrontierQueue::new(self.params.block_capacity(level), bound);
        for &p in &pivots {
            queue.insert(p, self.table.key(p));
        }
        let mut last_bound = pivots.iter().map(|&p| self.table.key(p)).min().unwrap_or(bound);

        let budget = self.params.settle_budget(level);
        let mut settled = Vec::new();
        let mut in_settled = HashSet::new();
        let graph = self.graph;

        while settled.len() < budget && !queue.is_empty() {
            self.stats.pulls += 1;
            let (pull_bound, pulled) = queue.pull();
            let (sub_bound, completed) = self.bmssp(level - 1, pull_bound, pulled.clone());
            last_bound = sub_bound;

            for &u in &completed {
                if in_settled.insert(u) {
                    settled.push(u);
                }
            }

            let mut batch = Vec::new();
            for &u in &completed {
                for &(v, w) in &graph.adj[u] {
                    if let Some(key) = self.table.relax(u, v, w) {
                        if key >= pull_bound && key < bound {
                            queue.insert(v, key);
                        } else if key >= sub_bound && key < pull_bound {
                            batch.push((v, key));
                        }
                    }
                }
                self.table.mark_scanned(u);
            }
            for &x in &pulled {
                let key = self.table.key(x);
                if key >= sub_bound && key < pull_bound {
                    batch.push((x, key));
                }
            }
            queue.batch_prepend(batch);
        }

        let final_bound = last_bound.min(bound);
        for &x in &witnesses {
            if self.table.key(x) < final_bound && in_settled.insert(x) {
                settled.push(x);
            }
        }
        tracing::trace!(
            level,
            sources = sources.len(),
            pivots = pivots.len(),
            settled = settled.len(),
            partial = final_bound < bound,
            "bmssp call finished"
        );
        (final_bound, settled)
    }

    /// Label-correcting pass from every vertex whose out-edges were not
    /// relaxed at its current label. Returns how many distances went down.
    pub(crate) fn sweep(&mut self) -> u64 {
        let mut heap: BinaryHeap<Reverse<Key>> =
            self.table.stale_vertices().map(|v| Reverse(self.table.key(v))).collect();
        let graph = self.graph;
        let mut corrections = 0;
        while let Some(Reverse(key)) = heap.pop() {
            let u = key.vertex;
            if key != self.table.key(u) || !self.table.is_stale(u) {
                continue;
            }
            for &(v, w) in &graph.adj[u] {
                if let Some((next, shorter)) = self.table.improve(u, v, w) {
                    if shorter {
                        corrections += 1;
                    }
                    heap.push(Reverse(next));
                }
            }
            self.table.mark_scanned(u);
        }
        self.stats.sweep_corrections += corrections;
        corrections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::dijkstra;
    use crate::transform::{bound_degrees, DegreeBoundedGraph};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn run(g: &Graph, source: Node, params: Params) -> (Vec<f64>, EngineStats) {
        let mut engine = Engine::new(g, DistanceTable::new(g.len(), source), params);
        engine.bmssp(params.level, Key::INFINITY, vec![source]);
        engine.sweep();
        let stats = engine.stats();
        let (labels, _) = engine.into_table().into_parts();
        (labels.iter().map(|l| l.dist).collect(), stats)
    }

    #[test]
    fn chain_is_settled_without_corrections() {
        let mut g = Graph::new(4);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 2.0);
        g.add_edge(2, 3, 3.0);
        let (dist, stats) = run(&g, 0, Params { k: 1, t: 1, level: 2 });
        assert_eq!(dist, vec![0.0, 1.0, 3.0, 6.0]);
        assert_eq!(stats.sweep_corrections, 0);
        assert!(stats.base_cases >= 1);
    }

    #[test]
    fn empty_source_set_returns_bound() {
        let g = Graph::new(2);
        let mut engine = Engine::new(&g, DistanceTable::new(2, 0), Params { k: 1, t: 1, level: 1 });
        let (b, u) = engine.bmssp(1, Key::INFINITY, Vec::new());
        assert_eq!(b, Key::INFINITY);
        assert!(u.is_empty());
    }

    fn random_bounded_graph(n: usize, m: usize, seed: u64) -> DegreeBoundedGraph {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut g = Graph::new(n);
        for _ in 0..m {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            g.add_edge(u, v, rng.gen_range(0..6) as f64);
        }
        bound_degrees(&g)
    }

    #[test]
    fn matches_dijkstra_on_transformed_random_graphs() {
        for seed in 0..6u64 {
            // 80 vertices give a top-level budget of 512 settles, above the proxy count.
            let t = random_bounded_graph(80, 240, 0xB055 + seed);
            let root = t.representative[0];
            let params = Params::for_vertex_count(80);
            assert!(params.settle_budget(params.level) > t.proxy_count());
            let (dist, stats) = run(&t.graph, root, params);
            let expected = dijkstra(&t.graph, root).unwrap();
            assert_eq!(dist, expected.distances(), "seed={seed}");
            assert_eq!(stats.sweep_corrections, 0, "seed={seed}");
        }
    }

    #[test]
    fn settled_vertices_are_exact_before_the_sweep() {
        for seed in 0..6u64 {
            let t = random_bounded_graph(80, 240, 0x5E77 + seed);
            let root = t.representative[3];
            let params = Params::for_vertex_count(80);
            let expected = dijkstra(&t.graph, root).unwrap();

            let mut engine = Engine::new(&t.graph, DistanceTable::new(t.proxy_count(), root), params);
            let (bound, settled) = engine.bmssp(params.level, Key::INFINITY, vec![root]);
            assert_eq!(bound, Key::INFINITY, "seed={seed}");
            assert!(settled.contains(&root));
            for &x in &settled {
                assert_eq!(engine.table().dist(x), expected.distance(x), "seed={seed} proxy {x}");
            }
            assert_eq!(engine.sweep(), 0, "seed={seed}");
        }
    }

    #[test]
    fn sweep_repairs_stale_labels() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        let mut engine = Engine::new(&g, DistanceTable::new(3, 0), Params { k: 1, t: 1, level: 1 });
        assert_eq!(engine.sweep(), 2);
        assert_eq!(engine.table().dist(2), 2.0);
        assert_eq!(engine.sweep(), 0);
    }
}
