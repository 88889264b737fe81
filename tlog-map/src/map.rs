//! The verifiable key/value map.
//!
//! Raw keys of any length are placed in the sparse tree at the path
//! `digest(key)`; the committed leaf is `hash_leaf(key || value)`, so the
//! root binds the exact key bytes as well as the value. Lookups of unknown
//! keys are not errors: they yield a proof of absence.

use tlog_merkle::{Digest, MerkleHasher, TreeHead};

use crate::defaults::SparseConfig;
use crate::proof::SparseProof;
use crate::tree::SparseMerkleTree;
use crate::verify::verify_sparse;
use crate::{Error, Result};

/// A map from arbitrary byte keys to byte values with a single-root
/// commitment and per-entry proofs.
#[derive(Debug, Clone)]
pub struct VerifiableMap<H> {
    tree: SparseMerkleTree<H>,
}

impl<H: MerkleHasher + Default> Default for VerifiableMap<H> {
    fn default() -> Self {
        VerifiableMap::new(SparseConfig::default())
    }
}

impl<H: MerkleHasher> VerifiableMap<H> {
    /// An empty map under the given config.
    pub fn new(config: SparseConfig<H>) -> Self {
        VerifiableMap {
            tree: SparseMerkleTree::new(config),
        }
    }

    /// The map's config (hash strategy and default table).
    pub fn config(&self) -> &SparseConfig<H> {
        self.tree.config()
    }

    /// Insert or replace the value under a key, returning the new map root.
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Digest {
        let path = self.config().hasher().digest(key);
        let mut leaf = Vec::with_capacity(key.len() + value.len());
        leaf.extend_from_slice(key);
        leaf.extend_from_slice(value);
        self.tree.set(path, &leaf)
    }

    /// The value under a key, if present.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let path = self.config().hasher().digest(key);
        let leaf = self.tree.get(&path)?;
        // The stored leaf is key || value; strip the key prefix.
        leaf.get(key.len()..)
    }

    /// The value (if any) together with a proof of it, or of its absence.
    pub fn get_with_proof(&self, key: &[u8]) -> (Option<Vec<u8>>, SparseProof) {
        let path = self.config().hasher().digest(key);
        let value = self
            .tree
            .get(&path)
            .and_then(|leaf| leaf.get(key.len()..))
            .map(<[u8]>::to_vec);
        (value, self.tree.proof(&path))
    }

    /// Current map root.
    pub fn root(&self) -> Digest {
        self.tree.root()
    }

    /// Number of keys with a value.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The `(entry count, root)` pair for an external signer.
    pub fn tree_head(&self) -> TreeHead {
        self.tree.tree_head()
    }
}

/// Check that a map holds `value` under `key` (or, with `None`, that the key
/// is unset) against a trusted map root.
///
/// Recomputes the path from the key and the leaf binding from key and value,
/// cross-checks both against the proof ([`Error::MalformedProof`] on
/// disagreement), then defers to [`verify_sparse`].
pub fn verify_map_entry<H: MerkleHasher>(
    config: &SparseConfig<H>,
    key: &[u8],
    value: Option<&[u8]>,
    proof: &SparseProof,
    trusted_root: &Digest,
) -> Result<()> {
    let path = config.hasher().digest(key);
    if path != proof.key {
        return Err(Error::MalformedProof(format!(
            "proof is for path {}, key derives {}",
            hex::encode(proof.key),
            hex::encode(path)
        )));
    }
    match (value, &proof.leaf) {
        (Some(value), Some(leaf)) => {
            let (leaf_key, leaf_value) = leaf.split_at(leaf.len().min(key.len()));
            if leaf_key != key || leaf_value != value {
                return Err(Error::MalformedProof(
                    "proof leaf does not bind the claimed key and value".into(),
                ));
            }
        }
        (None, None) => {}
        (Some(_), None) => {
            return Err(Error::MalformedProof(
                "value claimed but proof asserts absence".into(),
            ));
        }
        (None, Some(_)) => {
            return Err(Error::MalformedProof(
                "absence claimed but proof carries a leaf".into(),
            ));
        }
    }
    verify_sparse(config, proof, trusted_root)
}
