//! Sparse tree proofs and their wire encoding.
//!
//! A sparse proof always carries exactly 256 siblings, one per level.
//! Siblings of empty subtrees are sent as a one-byte [`ProofNode::Default`]
//! marker instead of their 32-byte digest; the verifier re-expands them from
//! its own default table. Fields are `pub(crate)` so externally received
//! proofs only enter through [`SparseProof::decode_from_slice`].

use bincode::{Decode, Encode};
use tlog_merkle::Digest;

use crate::defaults::TREE_DEPTH;
use crate::{Error, Result};

/// Decode limit for proof bytes; anything larger is rejected outright.
const MAX_PROOF_BYTES: usize = 100 * 1024 * 1024;

fn encode_config() -> impl bincode::config::Config {
    bincode::config::standard().with_big_endian().with_no_limit()
}

fn decode_config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_big_endian()
        .with_limit::<MAX_PROOF_BYTES>()
}

/// One sibling in a sparse proof: either an explicit digest or a marker for
/// an empty subtree whose digest the verifier already knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum ProofNode {
    /// The sibling subtree is empty; its digest comes from the default table.
    Default,
    /// Materialized sibling subtree digest.
    Hash(Digest),
}

/// Proof of what the tree holds at one 256-bit path: the leaf payload if the
/// key is set, or its absence if not. Siblings run leaf-to-root.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct SparseProof {
    pub(crate) key: Digest,
    pub(crate) siblings: Vec<ProofNode>,
    pub(crate) leaf: Option<Vec<u8>>,
}

impl SparseProof {
    pub(crate) fn new(key: Digest, siblings: Vec<ProofNode>, leaf: Option<Vec<u8>>) -> Self {
        SparseProof {
            key,
            siblings,
            leaf,
        }
    }

    /// The 256-bit path this proof speaks about.
    pub fn key(&self) -> &Digest {
        &self.key
    }

    /// Sibling nodes, leaf level first.
    pub fn siblings(&self) -> &[ProofNode] {
        &self.siblings
    }

    /// The leaf payload at the path, or `None` for a proof of absence.
    pub fn leaf(&self) -> Option<&[u8]> {
        self.leaf.as_deref()
    }

    /// Whether this proves presence (as opposed to absence).
    pub fn is_membership(&self) -> bool {
        self.leaf.is_some()
    }

    /// Encode to bytes using bincode (big-endian standard config).
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        bincode::encode_to_vec(self, encode_config())
            .map_err(|e| Error::MalformedProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes, validating the sibling count.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let (proof, consumed): (Self, _) = bincode::decode_from_slice(bytes, decode_config())
            .map_err(|e| Error::MalformedProof(format!("decode error: {}", e)))?;
        if consumed != bytes.len() {
            return Err(Error::MalformedProof(format!(
                "{} trailing bytes after proof",
                bytes.len() - consumed
            )));
        }
        if proof.siblings.len() != TREE_DEPTH {
            return Err(Error::MalformedProof(format!(
                "expected {} siblings, got {}",
                TREE_DEPTH,
                proof.siblings.len()
            )));
        }
        Ok(proof)
    }
}
