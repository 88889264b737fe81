use thiserror::Error;

/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors from sparse tree proofs and map verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A well-formed proof failed cryptographic recomputation.
    ///
    /// Security relevant: the collaborator layer should treat this as a
    /// possible equivocation attempt, not a protocol bug.
    #[error("proof verification failed: {0}")]
    ProofInvalid(String),
    /// A proof is structurally wrong (sibling count, encoding, key or leaf
    /// binding disagreement).
    #[error("malformed proof: {0}")]
    MalformedProof(String),
}
