/// Errors from decoding and building a single lattice instance.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LatticeError {
    #[error("node index {index} outside the 27-node grid (expected 1..=27)")]
    InvalidNodeIndex { index: i64 },

    #[error("malformed edge key {key:?}: {reason}")]
    MalformedEdgeKey { key: String, reason: String },

    #[error("lattice has no present edges; bounding box is undefined")]
    EmptyLattice,

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
