use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetformError {
    #[error("node {node} out of range for {num_nodes} nodes")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    #[error("number of nodes must be positive, got {0}")]
    InvalidNodeCount(usize),

    #[error("number of edges must be in 1..{max}, got {edges}")]
    InvalidEdgeCount { edges: usize, max: usize },

    #[error("immunization probability must be in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("{name} must be a non-negative finite number, got {value}")]
    NegativeCost { name: &'static str, value: f64 },

    #[error("invalid strategy for player {player}: {reason}")]
    InvalidStrategy { player: usize, reason: String },

    #[error("sweep limit must be positive")]
    InvalidSweepLimit,

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NetformError>;
