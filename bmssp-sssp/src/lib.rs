//! bmssp-sssp: single-source shortest paths on directed graphs with
//! non-negative real weights.
//!
//! Large graphs are rewritten to bounded degree and solved by bounded
//! multi-source recursion over a block-structured frontier queue; small
//! graphs go straight to binary-heap Dijkstra.
//!
//! ```
//! use bmssp_sssp::{shortest_paths, Graph};
//!
//! let mut g = Graph::new(4);
//! g.add_edge(0, 1, 1.0);
//! g.add_edge(1, 2, 2.0);
//! g.add_edge(2, 3, 3.0);
//! assert_eq!(shortest_paths(&g, 0).unwrap(), vec![0.0, 1.0, 3.0, 6.0]);
//! ```
pub mod config;
pub mod dijkstra;
mod engine;
pub mod error;
pub mod frontier;
pub mod graph;
mod labels;
pub mod solver;
pub mod transform;
pub mod tree;

pub use config::{Params, SolverConfig, DEFAULT_SMALL_GRAPH_THRESHOLD};
pub use dijkstra::dijkstra;
pub use error::{Result, SsspError};
pub use frontier::FrontierQueue;
pub use graph::{Graph, Node, Weight};
pub use solver::{shortest_paths, shortest_paths_with_threshold, solve, SolveStats, Solution};
pub use transform::{bound_degrees, DegreeBoundedGraph};
pub use tree::ShortestPathTree;
