//! RFC 6962-style Merkle hash tree primitives for a transparency log.
//!
//! This crate implements the cryptographic core of a Certificate
//! Transparency–style append-only log: domain-separated hashing, an
//! incremental frontier accumulator, a full tree serving inclusion and
//! consistency proofs, and an independent proof verifier. It operates on
//! raw leaf bytes and digests only — no certificate parsing, no I/O, no
//! signing.
//!
//! # Core types
//!
//! - [`CompactTree`] — O(log n)-state append-only accumulator.
//! - [`Frontier`] — the compact tree's serializable durable state.
//! - [`LogTree`] — full tree with historical roots and proofs.
//! - [`InclusionProof`], [`ConsistencyProof`] — self-describing proofs.
//! - [`TreeHead`] — the `(size, root)` hand-off to an external signer.
//!
//! # Hash strategies
//!
//! Everything is generic over [`MerkleHasher`]: [`Sha256Hasher`] is the
//! RFC 6962 default, [`Blake3Hasher`] an alternative for closed systems.
//!
//! # Concurrency
//!
//! All operations are pure, synchronous data transforms. Callers serialize
//! writes; reads against a snapshot ([`Frontier`], a cloned tree, or a
//! [`TreeHead`]) are freely concurrent.

#![warn(missing_docs)]

mod compact;
mod error;
/// Bit-arithmetic helpers for tree geometry and hash-cost estimation.
pub mod helper;
mod hasher;
mod proof;
mod tree;
mod verify;


pub use compact::{CompactTree, Frontier};
pub use error::{Error, Result};
pub use hasher::{
    Blake3Hasher, DIGEST_LEN, Digest, LEAF_TAG, MerkleHasher, NODE_TAG, Sha256Hasher,
    digest_from_slice,
};
pub use helper::{hash_count_for_append, inclusion_proof_length};
pub use proof::{ConsistencyProof, InclusionProof, TreeHead};
pub use tree::LogTree;
pub use verify::{verify_consistency, verify_inclusion};
