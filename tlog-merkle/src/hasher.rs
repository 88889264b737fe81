//! Domain-separated tree hashing.
//!
//! Hash scheme (RFC 6962):
//! - Empty tree root: `H("")`
//! - Leaf nodes:      `H(0x00 || data)`
//! - Internal nodes:  `H(0x01 || left || right)`
//!
//! The 0x00/0x01 domain tags prevent second-preimage attacks where an
//! internal node could be replayed as a valid leaf.
//!
//! The hash function is a capability: trees and verifiers are generic over
//! [`MerkleHasher`], selected at construction time. [`Sha256Hasher`] is the
//! RFC 6962 default; [`Blake3Hasher`] is a faster drop-in for deployments
//! that control both ends.

use sha2::{Digest as _, Sha256};

use crate::{Error, Result};

/// Domain tag prepended to leaf hash inputs: `H(LEAF_TAG || data)`.
pub const LEAF_TAG: u8 = 0x00;
/// Domain tag prepended to internal node inputs: `H(NODE_TAG || left || right)`.
pub const NODE_TAG: u8 = 0x01;

/// A 32-byte tree hash.
pub type Digest = [u8; 32];

/// Length of a [`Digest`] in bytes.
pub const DIGEST_LEN: usize = 32;

/// A pluggable, stateless tree-hash strategy.
///
/// Implementations must be pure functions of their inputs; this makes every
/// hasher thread-safe by construction.
pub trait MerkleHasher {
    /// Digest output size in bytes. All provided hashers produce 32 bytes.
    const DIGEST_SIZE: usize = DIGEST_LEN;

    /// Untagged hash of arbitrary bytes.
    ///
    /// Not used for tree nodes; the verifiable map uses it to turn raw keys
    /// into uniformly distributed 256-bit tree paths.
    fn digest(&self, data: &[u8]) -> Digest;

    /// Hash of a leaf: `H(0x00 || data)`.
    fn hash_leaf(&self, data: &[u8]) -> Digest;

    /// Hash of an internal node: `H(0x01 || left || right)`.
    fn hash_children(&self, left: &Digest, right: &Digest) -> Digest;

    /// Root of a tree with zero leaves: the hash of the empty string.
    fn hash_empty(&self) -> Digest {
        self.digest(&[])
    }
}

/// SHA-256 tree hashing as specified by RFC 6962.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    fn digest(&self, data: &[u8]) -> Digest {
        Sha256::digest(data).into()
    }

    fn hash_leaf(&self, data: &[u8]) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update([LEAF_TAG]);
        hasher.update(data);
        hasher.finalize().into()
    }

    fn hash_children(&self, left: &Digest, right: &Digest) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update([NODE_TAG]);
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}

/// Blake3 tree hashing with the same domain separation as the SHA-256
/// scheme. Roots are not interoperable with RFC 6962 logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    fn digest(&self, data: &[u8]) -> Digest {
        *blake3::hash(data).as_bytes()
    }

    fn hash_leaf(&self, data: &[u8]) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[LEAF_TAG]);
        hasher.update(data);
        *hasher.finalize().as_bytes()
    }

    fn hash_children(&self, left: &Digest, right: &Digest) -> Digest {
        let mut input = [0u8; 65];
        input[0] = NODE_TAG;
        input[1..33].copy_from_slice(left);
        input[33..65].copy_from_slice(right);
        *blake3::hash(&input).as_bytes()
    }
}

/// Convert raw bytes into a [`Digest`].
///
/// This is the boundary where collaborators hand in externally computed
/// hashes; anything that is not exactly 32 bytes fails with
/// [`Error::InvalidDigest`].
pub fn digest_from_slice(bytes: &[u8]) -> Result<Digest> {
    bytes.try_into().map_err(|_| Error::InvalidDigest {
        expected: DIGEST_LEN,
        got: bytes.len(),
    })
}
