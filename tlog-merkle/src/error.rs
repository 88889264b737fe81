use thiserror::Error;

/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors from Merkle tree operations and proof verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A raw hash supplied by a caller has the wrong length.
    #[error("invalid digest: expected {expected} bytes, got {got}")]
    InvalidDigest {
        /// Required digest length in bytes.
        expected: usize,
        /// Length of the supplied bytes.
        got: usize,
    },
    /// A leaf index or tree size lies outside the tree's known range.
    #[error("index {index} is out of range for tree size {tree_size}")]
    IndexOutOfRange {
        /// The offending leaf index (or requested size).
        index: u64,
        /// The tree size the index was checked against.
        tree_size: u64,
    },
    /// A consistency proof was requested for an impossible size pair.
    #[error("invalid range: old size {old_size}, new size {new_size}, tree holds {tree_size} leaves")]
    InvalidRange {
        /// Claimed earlier tree size.
        old_size: u64,
        /// Claimed later tree size.
        new_size: u64,
        /// Number of leaves actually committed.
        tree_size: u64,
    },
    /// A well-formed proof failed cryptographic recomputation.
    ///
    /// Security relevant: the collaborator layer should treat this as a
    /// possible equivocation attempt, not a protocol bug.
    #[error("proof verification failed: {0}")]
    ProofInvalid(String),
    /// A proof is structurally wrong (element count, encoding).
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// Invalid serialized state (frontier or proof bytes).
    #[error("invalid data: {0}")]
    InvalidData(String),
}
