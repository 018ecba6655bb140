//! Caller contract violations.
//!
//! The solver has no recoverable runtime failures; everything here is
//! detected by validation before any distance is computed.

use thiserror::Error;

use crate::graph::{Node, Weight};

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SsspError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SsspError {
    /// The query origin is not a vertex of the graph.
    #[error("source vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    SourceOutOfRange { vertex: Node, vertex_count: usize },

    /// An adjacency entry names a vertex outside `[0, n)`.
    #[error("edge {from} -> {to} targets a vertex outside [0, {vertex_count})")]
    TargetOutOfRange {
        from: Node,
        to: Node,
        vertex_count: usize,
    },

    /// Weights must be finite and non-negative.
    #[error("edge {from} -> {to} has weight {weight}; weights must be finite and non-negative")]
    InvalidWeight { from: Node, to: Node, weight: Weight },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_edge() {
        let err = SsspError::InvalidWeight { from: 3, to: 7, weight: -1.5 };
        assert_eq!(
            err.to_string(),
            "edge 3 -> 7 has weight -1.5; weights must be finite and non-negative"
        );
        let err = SsspError::SourceOutOfRange { vertex: 9, vertex_count: 4 };
        assert!(err.to_string().contains("source vertex 9"));
    }
}
