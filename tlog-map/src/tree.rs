//! The depth-256 sparse Merkle tree.
//!
//! Conceptually the tree has 2^256 leaf slots, one per possible key; bit `i`
//! of the key (big-endian) picks the branch at depth `i`. Only the nodes on
//! the paths of keys actually set are materialized, keyed by
//! `(depth, path prefix)`; everything else falls back to the default table
//! in [`SparseConfig`].

use std::collections::HashMap;

use tlog_merkle::{Digest, MerkleHasher, TreeHead};

use crate::defaults::{SparseConfig, TREE_DEPTH, bit_at};
use crate::proof::{ProofNode, SparseProof};

/// Address of a materialized node: its depth and the key bits above it.
///
/// Bits below `depth` are zeroed so equal prefixes compare equal regardless
/// of which key produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey {
    depth: u16,
    prefix: Digest,
}

impl NodeKey {
    fn at(key: &Digest, depth: usize) -> Self {
        NodeKey {
            depth: depth as u16,
            prefix: mask_prefix(key, depth),
        }
    }

    /// The other child of this node's parent: bit `depth - 1` flipped.
    fn sibling_of(key: &Digest, depth: usize) -> Self {
        let mut prefix = mask_prefix(key, depth);
        let bit = depth - 1;
        prefix[bit / 8] ^= 1 << (7 - (bit % 8));
        NodeKey {
            depth: depth as u16,
            prefix,
        }
    }
}

fn mask_prefix(key: &Digest, depth: usize) -> Digest {
    let mut out = [0u8; 32];
    let full = depth / 8;
    out[..full].copy_from_slice(&key[..full]);
    let rem = depth % 8;
    if rem != 0 {
        out[full] = key[full] & (0xFF << (8 - rem));
    }
    out
}

/// A mutable sparse Merkle tree over 256-bit keys.
///
/// Writes are deterministic and idempotent: the root depends only on the
/// final key-to-payload mapping, never on write order.
#[derive(Debug, Clone)]
pub struct SparseMerkleTree<H> {
    config: SparseConfig<H>,
    nodes: HashMap<NodeKey, Digest>,
    leaves: HashMap<Digest, Vec<u8>>,
    root: Digest,
}

impl<H: MerkleHasher + Default> Default for SparseMerkleTree<H> {
    fn default() -> Self {
        SparseMerkleTree::new(SparseConfig::default())
    }
}

impl<H: MerkleHasher> SparseMerkleTree<H> {
    /// An empty tree under the given config.
    pub fn new(config: SparseConfig<H>) -> Self {
        let root = config.empty_root();
        SparseMerkleTree {
            config,
            nodes: HashMap::new(),
            leaves: HashMap::new(),
            root,
        }
    }

    /// The tree's config (hash strategy and default table).
    pub fn config(&self) -> &SparseConfig<H> {
        &self.config
    }

    /// Write a leaf payload at the given key's path, returning the new root.
    ///
    /// Overwrites any previous payload at the same key. The leaf commits as
    /// `hash_leaf(leaf)`; the 256 ancestors are recomputed bottom-up.
    pub fn set(&mut self, key: Digest, leaf: &[u8]) -> Digest {
        self.leaves.insert(key, leaf.to_vec());

        let mut node = self.config.hasher().hash_leaf(leaf);
        self.nodes.insert(NodeKey::at(&key, TREE_DEPTH), node);
        for depth in (1..=TREE_DEPTH).rev() {
            let sibling = self.sibling_digest(&key, depth);
            node = if bit_at(&key, depth - 1) == 1 {
                self.config.hasher().hash_children(&sibling, &node)
            } else {
                self.config.hasher().hash_children(&node, &sibling)
            };
            self.nodes.insert(NodeKey::at(&key, depth - 1), node);
        }
        self.root = node;
        node
    }

    /// The payload at a key, if one was set.
    pub fn get(&self, key: &Digest) -> Option<&[u8]> {
        self.leaves.get(key).map(Vec::as_slice)
    }

    /// Current root; the empty-tree default when nothing was ever set.
    pub fn root(&self) -> Digest {
        self.root
    }

    /// Number of keys with a payload.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether no key has ever been set.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// The `(entry count, root)` pair for an external signer.
    pub fn tree_head(&self) -> TreeHead {
        TreeHead::new(self.len() as u64, self.root)
    }

    /// Proof of the payload at a key, or of its absence.
    ///
    /// Siblings run leaf-to-root; empty-subtree siblings compress to
    /// [`ProofNode::Default`]. Works identically for keys never set.
    pub fn proof(&self, key: &Digest) -> SparseProof {
        let mut siblings = Vec::with_capacity(TREE_DEPTH);
        for height in 0..TREE_DEPTH {
            let sibling = NodeKey::sibling_of(key, TREE_DEPTH - height);
            match self.nodes.get(&sibling) {
                Some(digest) => siblings.push(ProofNode::Hash(*digest)),
                None => siblings.push(ProofNode::Default),
            }
        }
        SparseProof::new(*key, siblings, self.leaves.get(key).cloned())
    }

    fn sibling_digest(&self, key: &Digest, depth: usize) -> Digest {
        let sibling = NodeKey::sibling_of(key, depth);
        match self.nodes.get(&sibling) {
            Some(digest) => *digest,
            // Empty subtree at depth d has height TREE_DEPTH - d.
            None => self.config.defaults().at(TREE_DEPTH - depth),
        }
    }
}
