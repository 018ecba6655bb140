//! Solver configuration and the recursion parameters derived from graph size.
use serde::{Deserialize, Serialize};

/// Graphs with at most this many vertices go straight to plain Dijkstra.
pub const DEFAULT_SMALL_GRAPH_THRESHOLD: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub small_graph_threshold: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { small_graph_threshold: DEFAULT_SMALL_GRAPH_THRESHOLD }
    }
}

impl SolverConfig {
    pub fn with_small_graph_threshold(threshold: usize) -> Self {
        Self { small_graph_threshold: threshold }
    }

    /// Signed thresholds (e.g. from the command line) are clamped at zero.
    pub fn from_signed_threshold(threshold: i64) -> Self {
        Self::with_small_graph_threshold(usize::try_from(threshold.max(0)).unwrap_or(usize::MAX))
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Recursion parameters: `k` bounds pivot rounds and base-case size, `t`
/// sets the block-capacity growth per level, `level` is the top recursion level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub k: usize,
    pub t: usize,
    pub level: usize,
}

impl Params {
    /// `k = ⌊log₂n^(1/3)⌋`, `t = ⌊log₂n^(2/3)⌋`, `level = ⌈log₂n / t⌉`, each at least 1.
    pub fn for_vertex_count(n: usize) -> Self {
        let log2n = (n.max(1) as f64).log2();
        let k = (log2n.powf(1.0 / 3.0).floor() as usize).max(1);
        let t = (log2n.powf(2.0 / 3.0).floor() as usize).max(1);
        let level = ((log2n / t as f64).ceil() as usize).max(1);
        Self { k, t, level }
    }

    /// Block capacity `M = 2^((level-1)·t)` of the frontier queue at `level`.
    pub fn block_capacity(&self, level: usize) -> usize {
        pow2(level.saturating_sub(1).saturating_mul(self.t))
    }

    /// Settle budget `k·2^(level·t)` of a call at `level`.
    pub fn settle_budget(&self, level: usize) -> usize {
        self.k.saturating_mul(pow2(level.saturating_mul(self.t)))
    }
}

fn pow2(exp: usize) -> usize {
    u32::try_from(exp)
        .ok()
        .and_then(|e| 1usize.checked_shl(e))
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_follow_log_formulas() {
        // log2(2^20) = 20: k = ⌊2.71⌋, t = ⌊7.37⌋, level = ⌈20/7⌉
        assert_eq!(Params::for_vertex_count(1 << 20), Params { k: 2, t: 7, level: 3 });
        // log2(1000) ≈ 9.97: k = 2, t = 4, level = 3
        assert_eq!(Params::for_vertex_count(1000), Params { k: 2, t: 4, level: 3 });
    }

    #[test]
    fn params_are_clamped_for_tiny_graphs() {
        for n in 0..4 {
            let p = Params::for_vertex_count(n);
            assert!(p.k >= 1 && p.t >= 1 && p.level >= 1, "n={n} {p:?}");
        }
    }

    #[test]
    fn capacities_saturate() {
        let p = Params { k: 3, t: 40, level: 4 };
        assert_eq!(p.block_capacity(1), 1);
        assert_eq!(p.block_capacity(2), 1 << 40);
        assert_eq!(p.block_capacity(4), usize::MAX);
        assert_eq!(p.settle_budget(0), 3);
        assert_eq!(p.settle_budget(2), usize::MAX);
    }

    #[test]
    fn config_defaults_and_clamping() {
        assert_eq!(SolverConfig::default().small_graph_threshold, 64);
        assert_eq!(SolverConfig::from_signed_threshold(-5).small_graph_threshold, 0);
        assert_eq!(SolverConfig::from_signed_threshold(10).small_graph_threshold, 10);
        let cfg = SolverConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SolverConfig::default());
        let cfg = SolverConfig::from_json(r#"{"small_graph_threshold": 0}"#).unwrap();
        assert_eq!(cfg.small_graph_threshold, 0);
    }
}
