//! Query entry points: validation, small-graph fallback, and the recursive
//! solver run over the degree-bounded graph.
use serde::Serialize;

use crate::config::{Params, SolverConfig};
use crate::dijkstra::dijkstra;
use crate::engine::{Engine, EngineStats};
use crate::error::Result;
use crate::graph::{Graph, Node, Weight};
use crate::labels::{DistanceTable, Key};
use crate::transform::bound_degrees;
use crate::tree::ShortestPathTree;

/// Counters describing how a query was answered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SolveStats {
    pub used_fallback: bool,
    pub params: Option<Params>,
    pub transformed_vertices: usize,
    pub transformed_edges: usize,
    pub recursive_calls: u64,
    pub base_cases: u64,
    pub pulls: u64,
    pub relaxations: u64,
    pub sweep_corrections: u64,
    /// Vertices (proxies) returned by the top-level recursive call.
    pub engine_settled: usize,
    /// The top-level call drained its queue (`B' = +inf`) before the sweep.
    pub engine_complete: bool,
}

#[derive(Clone, Debug)]
pub struct Solution {
    pub tree: ShortestPathTree,
    pub stats: SolveStats,
}

/// Shortest distances from `source` with the default configuration.
/// Unreachable vertices are `+inf`.
pub fn shortest_paths(graph: &Graph, source: Node) -> Result<Vec<Weight>> {
    solve(graph, source, &SolverConfig::default()).map(|s| s.tree.into_distances())
}

pub fn shortest_paths_with_threshold(graph: &Graph, source: Node, threshold: usize) -> Result<Vec<Weight>> {
    let config = SolverConfig::with_small_graph_threshold(threshold);
    solve(graph, source, &config).map(|s| s.tree.into_distances())
}

/// Full query: distances, predecessors and statistics.
pub fn solve(graph: &Graph, source: Node, config: &SolverConfig) -> Result<Solution> {
    graph.validate_query(source)?;
    let n = graph.len();

    if n <= config.small_graph_threshold {
        tracing::debug!(n, threshold = config.small_graph_threshold, "small graph, using dijkstra");
        let tree = dijkstra(graph, source)?;
        let stats = SolveStats { used_fallback: true, ..SolveStats::default() };
        return Ok(Solution { tree, stats });
    }

    let params = Params::for_vertex_count(n);
    let bounded = bound_degrees(graph);
    let root = bounded.representative[source];
    tracing::debug!(
        n,
        m = graph.edge_count(),
        proxies = bounded.proxy_count(),
        k = params.k,
        t = params.t,
        level = params.level,
        "running bmssp"
    );

    let mut engine = Engine::new(&bounded.graph, DistanceTable::new(bounded.proxy_count(), root), params);
    let (top_bound, settled) = engine.bmssp(params.level, Key::INFINITY, vec![root]);
    let engine_complete = top_bound == Key::INFINITY;
    let corrections = engine.sweep();
    if corrections > 0 {
        tracing::debug!(corrections, settled = settled.len(), engine_complete, "sweep lowered distances");
    }

    let EngineStats { recursive_calls, base_cases, pulls, sweep_corrections } = engine.stats();
    let relaxations = engine.table().relaxations();
    let (labels, pred) = engine.into_table().into_parts();
    let dist: Vec<Weight> = bounded.project(&labels).into_iter().map(|l| l.dist).collect();
    let original_pred = (0..n).map(|v| bounded.original_predecessor(&pred, v)).collect();

    let stats = SolveStats {
        used_fallback: false,
        params: Some(params),
        transformed_vertices: bounded.proxy_count(),
        transformed_edges: bounded.graph.edge_count(),
        recursive_calls,
        base_cases,
        pulls,
        relaxations,
        sweep_corrections,
        engine_settled: settled.len(),
        engine_complete,
    };
    Ok(Solution { tree: ShortestPathTree::new(source, dist, original_pred), stats })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_reported() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, 1.0);
        let s = solve(&g, 0, &SolverConfig::default()).unwrap();
        assert!(s.stats.used_fallback);
        assert_eq!(s.stats.params, None);

        let s = solve(&g, 0, &SolverConfig::with_small_graph_threshold(0)).unwrap();
        assert!(!s.stats.used_fallback);
        assert_eq!(s.stats.transformed_vertices, 3);
        assert!(s.stats.recursive_calls >= 1);
        assert!(s.stats.engine_complete);
        assert_eq!(s.stats.sweep_corrections, 0);
        assert_eq!(s.tree.distances(), &[0.0, 1.0, f64::INFINITY]);
    }

    #[test]
    fn stats_serialize_to_json() {
        let mut g = Graph::new(2);
        g.add_edge(0, 1, 2.0);
        let s = solve(&g, 0, &SolverConfig::with_small_graph_threshold(0)).unwrap();
        let json = serde_json::to_value(s.stats).unwrap();
        assert_eq!(json["used_fallback"], false);
        assert_eq!(json["params"]["k"], 1);
        assert_eq!(json["engine_complete"], true);
        assert_eq!(json["engine_settled"], 2);
    }
}
