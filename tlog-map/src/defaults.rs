//! Default digests for empty sparse subtrees.
//!
//! A depth-256 tree is almost entirely empty. Every empty subtree of a given
//! height has the same digest, so the 257 possible defaults are computed once
//! per hash strategy and shared from then on:
//!
//! - `at(0)` — the default leaf slot, `hash_leaf("")`
//! - `at(h)` — `hash_children(at(h-1), at(h-1))`
//! - `at(256)` — the root of a tree with no entries

use std::sync::Arc;

use tlog_merkle::{Digest, MerkleHasher};

/// Number of levels below the root.
pub const TREE_DEPTH: usize = 256;

/// The per-height default digests of one hash strategy, heights `0..=256`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptySubtreeRoots {
    roots: Vec<Digest>,
}

impl EmptySubtreeRoots {
    fn compute<H: MerkleHasher>(hasher: &H) -> Self {
        let mut roots = Vec::with_capacity(TREE_DEPTH + 1);
        roots.push(hasher.hash_leaf(b""));
        for height in 1..=TREE_DEPTH {
            let below = roots[height - 1];
            roots.push(hasher.hash_children(&below, &below));
        }
        EmptySubtreeRoots { roots }
    }

    /// Default digest of an empty subtree of the given height.
    ///
    /// Height 0 is a leaf slot, height [`TREE_DEPTH`] the whole tree.
    pub fn at(&self, height: usize) -> Digest {
        self.roots[height]
    }
}

/// Hash strategy plus its default-digest table, the immutable context every
/// sparse tree and verifier operates under.
///
/// Cloning is cheap; the table is behind an [`Arc`].
#[derive(Debug, Clone)]
pub struct SparseConfig<H> {
    hasher: H,
    defaults: Arc<EmptySubtreeRoots>,
}

impl<H: MerkleHasher> SparseConfig<H> {
    /// Build a config for the given hash strategy, computing the default
    /// table up front.
    pub fn new(hasher: H) -> Self {
        let defaults = Arc::new(EmptySubtreeRoots::compute(&hasher));
        SparseConfig { hasher, defaults }
    }

    /// The hash strategy.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// The default-digest table.
    pub fn defaults(&self) -> &EmptySubtreeRoots {
        &self.defaults
    }

    /// Root of a tree with no entries.
    pub fn empty_root(&self) -> Digest {
        self.defaults.at(TREE_DEPTH)
    }
}

impl<H: MerkleHasher + Default> Default for SparseConfig<H> {
    fn default() -> Self {
        SparseConfig::new(H::default())
    }
}

/// Bit `i` of a 256-bit key, big-endian: bit 0 is the high bit of the first
/// byte and selects the child directly below the root.
pub(crate) fn bit_at(key: &Digest, i: usize) -> u8 {
    (key[i / 8] >> (7 - (i % 8))) & 1
}

#[cfg(test)]
mod tests {
    use tlog_merkle::{Blake3Hasher, Sha256Hasher};

    use super::*;

    #[test]
    fn test_default_table_recurrence() {
        let hasher = Sha256Hasher;
        let config = SparseConfig::new(hasher);
        assert_eq!(config.defaults().at(0), hasher.hash_leaf(b""));
        for height in 1..=TREE_DEPTH {
            let below = config.defaults().at(height - 1);
            assert_eq!(
                config.defaults().at(height),
                hasher.hash_children(&below, &below),
                "height {}",
                height
            );
        }
    }

    #[test]
    fn test_empty_root_is_top_of_table() {
        let config: SparseConfig<Sha256Hasher> = SparseConfig::default();
        assert_eq!(config.empty_root(), config.defaults().at(TREE_DEPTH));
    }

    #[test]
    fn test_tables_differ_by_strategy() {
        let sha = SparseConfig::new(Sha256Hasher);
        let b3 = SparseConfig::new(Blake3Hasher);
        assert_ne!(sha.empty_root(), b3.empty_root());
    }

    #[test]
    fn test_bit_at_is_big_endian() {
        let mut key = [0u8; 32];
        key[0] = 0b1000_0000;
        key[31] = 0b0000_0001;
        assert_eq!(bit_at(&key, 0), 1);
        assert_eq!(bit_at(&key, 1), 0);
        assert_eq!(bit_at(&key, 255), 1);
        assert_eq!(bit_at(&key, 254), 0);
    }
}
