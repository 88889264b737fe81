//! Sparse Merkle tree and verifiable map built on `tlog-merkle`.
//!
//! Where the log proves *what was appended and in which order*, this crate
//! proves *what a key currently maps to* — including that it maps to nothing.
//! A [`SparseMerkleTree`] of depth 256 assigns every possible 256-bit key its
//! own leaf slot; empty subtrees collapse to precomputed defaults, so state
//! and proofs stay proportional to the number of entries actually set.
//!
//! # Core types
//!
//! - [`SparseConfig`] — hash strategy plus the shared default-digest table.
//! - [`SparseMerkleTree`] — the depth-256 tree over raw 256-bit keys.
//! - [`SparseProof`] — membership or absence proof, 256 compressed siblings.
//! - [`VerifiableMap`] — byte-key/byte-value map over the sparse tree.
//!
//! # Concurrency
//!
//! Same contract as `tlog-merkle`: pure synchronous data transforms, writes
//! serialized by the caller, reads against a snapshot freely concurrent.

#![warn(missing_docs)]

mod defaults;
mod error;
mod map;
mod proof;
mod tree;
mod verify;

pub use defaults::{EmptySubtreeRoots, SparseConfig, TREE_DEPTH};
pub use error::{Error, Result};
pub use map::{VerifiableMap, verify_map_entry};
pub use proof::{ProofNode, SparseProof};
pub use tree::SparseMerkleTree;
pub use verify::verify_sparse;
