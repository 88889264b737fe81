//! Proof structures and their wire encoding.
//!
//! Proofs are self-describing: they carry the sizes and indices they speak
//! about, so a verifier needs nothing beyond a trusted root. Fields are
//! `pub(crate)` so externally received proofs can only enter through
//! [`decode_from_slice`](InclusionProof::decode_from_slice), which validates
//! structure before anything touches the hashing paths.

use bincode::{Decode, Encode};

use crate::{Digest, Error, Result};

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

/// An inclusion (audit) proof: evidence that the leaf at `leaf_index` is
/// part of the tree of `tree_size` leaves.
///
/// The path holds sibling subtree roots ordered from the leaf level up to
/// the root.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct InclusionProof {
    pub(crate) leaf_index: u64,
    pub(crate) tree_size: u64,
    pub(crate) path: Vec<Digest>,
}

impl InclusionProof {
    pub(crate) fn new(leaf_index: u64, tree_size: u64, path: Vec<Digest>) -> Self {
        InclusionProof {
            leaf_index,
            tree_size,
            path,
        }
    }

    /// Index of the proved leaf.
    pub fn leaf_index(&self) -> u64 {
        self.leaf_index
    }

    /// Tree size the proof was generated against.
    pub fn tree_size(&self) -> u64 {
        self.tree_size
    }

    /// Sibling hashes, leaf level first.
    pub fn path(&self) -> &[Digest] {
        &self.path
    }

    /// Encode to bytes using bincode (big-endian standard config).
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        bincode::encode_to_vec(self, encode_config())
            .map_err(|e| Error::MalformedProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes, validating the index against the carried size.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let (proof, consumed): (Self, _) = bincode::decode_from_slice(bytes, decode_config())
            .map_err(|e| Error::MalformedProof(format!("decode error: {}", e)))?;
        if consumed != bytes.len() {
            return Err(Error::MalformedProof(format!(
                "{} trailing bytes after proof",
                bytes.len() - consumed
            )));
        }
        if proof.leaf_index >= proof.tree_size {
            return Err(Error::MalformedProof(format!(
                "leaf index {} not below tree size {}",
                proof.leaf_index, proof.tree_size
            )));
        }
        Ok(proof)
    }
}

/// A consistency proof: evidence that the tree at `new_size` is an
/// append-only extension of the tree at `old_size`.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ConsistencyProof {
    pub(crate) old_size: u64,
    pub(crate) new_size: u64,
    pub(crate) path: Vec<Digest>,
}

impl ConsistencyProof {
    pub(crate) fn new(old_size: u64, new_size: u64, path: Vec<Digest>) -> Self {
        ConsistencyProof {
            old_size,
            new_size,
            path,
        }
    }

    /// The earlier tree size.
    pub fn old_size(&self) -> u64 {
        self.old_size
    }

    /// The later tree size.
    pub fn new_size(&self) -> u64 {
        self.new_size
    }

    /// Proof hashes in verification order.
    pub fn path(&self) -> &[Digest] {
        &self.path
    }

    /// Encode to bytes using bincode (big-endian standard config).
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        bincode::encode_to_vec(self, encode_config())
            .map_err(|e| Error::MalformedProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes, validating the size ordering.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let (proof, consumed): (Self, _) = bincode::decode_from_slice(bytes, decode_config())
            .map_err(|e| Error::MalformedProof(format!("decode error: {}", e)))?;
        if consumed != bytes.len() {
            return Err(Error::MalformedProof(format!(
                "{} trailing bytes after proof",
                bytes.len() - consumed
            )));
        }
        if proof.old_size > proof.new_size {
            return Err(Error::MalformedProof(format!(
                "old size {} exceeds new size {}",
                proof.old_size, proof.new_size
            )));
        }
        Ok(proof)
    }
}

/// The `(tree_size, root_hash)` pair this core hands to an external signer.
///
/// The core never signs or timestamps; the signer builds its assertion
/// over exactly these two fields plus its own time source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct TreeHead {
    tree_size: u64,
    root_hash: Digest,
}

impl TreeHead {
    /// Build a head from a size and the root committing to it.
    pub fn new(tree_size: u64, root_hash: Digest) -> Self {
        TreeHead {
            tree_size,
            root_hash,
        }
    }

    /// Number of leaves this head commits to.
    pub fn tree_size(&self) -> u64 {
        self.tree_size
    }

    /// Root over the committed leaves.
    pub fn root_hash(&self) -> &Digest {
        &self.root_hash
    }

    /// Encode to bytes using bincode (big-endian standard config).
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        bincode::encode_to_vec(self, encode_config())
            .map_err(|e| Error::InvalidData(format!("encode error: {}", e)))
    }

    /// Decode from bytes produced by [`TreeHead::encode_to_vec`].
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let (head, consumed): (Self, _) = bincode::decode_from_slice(bytes, decode_config())
            .map_err(|e| Error::InvalidData(format!("decode error: {}", e)))?;
        if consumed != bytes.len() {
            return Err(Error::InvalidData(format!(
                "{} trailing bytes after tree head",
                bytes.len() - consumed
            )));
        }
        Ok(head)
    }
}
