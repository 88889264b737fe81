//! Full in-memory tree: retains every leaf hash, serves proofs for any
//! historical size.
//!
//! All root and proof computation recurses over explicit `[start, end)`
//! ranges with the RFC 6962 split rule: the left subtree is always the
//! largest perfect subtree, `split_point(n)` leaves wide.

use crate::{
    Digest, Error, MerkleHasher, Result, Sha256Hasher,
    helper::split_point,
    proof::{ConsistencyProof, InclusionProof, TreeHead},
};

/// An append-only Merkle tree over a retained sequence of leaf hashes.
///
/// Unlike [`CompactTree`](crate::CompactTree), the full tree can recompute
/// the root of any earlier size and build inclusion and consistency proofs
/// between historical sizes. Both structures produce identical roots over
/// the same leaf sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTree<H: MerkleHasher = Sha256Hasher> {
    leaves: Vec<Digest>,
    hasher: H,
}

impl<H: MerkleHasher + Default> LogTree<H> {
    /// Create a new empty tree with the default-constructed hasher.
    pub fn new() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<H: MerkleHasher + Default> Default for LogTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MerkleHasher> LogTree<H> {
    /// Create a new empty tree with an explicit hash strategy.
    pub fn with_hasher(hasher: H) -> Self {
        LogTree {
            leaves: Vec::new(),
            hasher,
        }
    }

    /// Number of leaves committed.
    pub fn size(&self) -> u64 {
        self.leaves.len() as u64
    }

    /// Returns `true` if no leaves have been appended.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Hash raw entry bytes and append them as the next leaf; returns the
    /// assigned leaf index.
    pub fn append(&mut self, data: &[u8]) -> u64 {
        self.append_leaf_hash(self.hasher.hash_leaf(data))
    }

    /// Append a precomputed leaf hash; returns the assigned leaf index.
    pub fn append_leaf_hash(&mut self, leaf_hash: Digest) -> u64 {
        let index = self.size();
        self.leaves.push(leaf_hash);
        index
    }

    /// The stored hash of the leaf at `index`, if committed.
    pub fn leaf_hash(&self, index: u64) -> Option<&Digest> {
        self.leaves.get(index as usize)
    }

    /// Root over all committed leaves.
    pub fn root(&self) -> Digest {
        self.subtree_root(0, self.leaves.len())
    }

    /// Root over the first `size` leaves, as it was when the tree had
    /// exactly that many.
    ///
    /// Fails with [`Error::IndexOutOfRange`] when `size` exceeds the number
    /// of committed leaves. `root_at(0)` is `hash_empty()`.
    pub fn root_at(&self, size: u64) -> Result<Digest> {
        if size > self.size() {
            return Err(Error::IndexOutOfRange {
                index: size,
                tree_size: self.size(),
            });
        }
        Ok(self.subtree_root(0, size as usize))
    }

    /// The `(tree_size, root_hash)` pair handed to an external signer.
    pub fn tree_head(&self) -> TreeHead {
        TreeHead::new(self.size(), self.root())
    }

    /// Build an inclusion proof for `leaf_index` within the first
    /// `tree_size` leaves.
    ///
    /// A size-1 tree yields an empty path: the leaf hash is the root.
    pub fn inclusion_proof(&self, leaf_index: u64, tree_size: u64) -> Result<InclusionProof> {
        if tree_size > self.size() {
            return Err(Error::IndexOutOfRange {
                index: tree_size,
                tree_size: self.size(),
            });
        }
        if leaf_index >= tree_size {
            return Err(Error::IndexOutOfRange {
                index: leaf_index,
                tree_size,
            });
        }
        let mut path = Vec::new();
        self.inclusion_path(leaf_index as usize, 0, tree_size as usize, &mut path);
        Ok(InclusionProof::new(leaf_index, tree_size, path))
    }

    /// Build a consistency proof showing the tree at `new_size` extends the
    /// tree at `old_size`.
    ///
    /// Boundary convention (documented, not inferred): `old_size == 0` and
    /// `old_size == new_size` both produce an empty path; the verifier
    /// enforces emptiness for those cases.
    pub fn consistency_proof(&self, old_size: u64, new_size: u64) -> Result<ConsistencyProof> {
        if old_size > new_size || new_size > self.size() {
            return Err(Error::InvalidRange {
                old_size,
                new_size,
                tree_size: self.size(),
            });
        }
        let mut path = Vec::new();
        if old_size > 0 && old_size < new_size {
            self.consistency_path(old_size as usize, 0, new_size as usize, true, &mut path);
        }
        Ok(ConsistencyProof::new(old_size, new_size, path))
    }

    /// `MTH(D[lo:hi])`: recursive root over a leaf range.
    fn subtree_root(&self, lo: usize, hi: usize) -> Digest {
        match hi - lo {
            0 => self.hasher.hash_empty(),
            1 => self.leaves[lo],
            n => {
                let k = split_point(n as u64) as usize;
                let left = self.subtree_root(lo, lo + k);
                let right = self.subtree_root(lo + k, hi);
                self.hasher.hash_children(&left, &right)
            }
        }
    }

    // Descend toward `index`, collecting the off-path subtree root at every
    // split. Siblings are pushed after recursing, so the path reads from the
    // leaf level up.
    fn inclusion_path(&self, index: usize, lo: usize, hi: usize, path: &mut Vec<Digest>) {
        if hi - lo <= 1 {
            return;
        }
        let k = split_point((hi - lo) as u64) as usize;
        if index < lo + k {
            self.inclusion_path(index, lo, lo + k, path);
            path.push(self.subtree_root(lo + k, hi));
        } else {
            self.inclusion_path(index, lo + k, hi, path);
            path.push(self.subtree_root(lo, lo + k));
        }
    }

    // RFC 6962 SUBPROOF over the range `[lo, hi)`, proving the prefix of
    // `old` leaves. `first` tracks whether the old subtree root is already
    // known to the verifier and may be omitted.
    fn consistency_path(
        &self,
        old: usize,
        lo: usize,
        hi: usize,
        first: bool,
        path: &mut Vec<Digest>,
    ) {
        let n = hi - lo;
        if old == n {
            if !first {
                path.push(self.subtree_root(lo, hi));
            }
            return;
        }
        let k = split_point(n as u64) as usize;
        if old <= k {
            // Prefix lies entirely in the left subtree; the right subtree is
            // all new leaves.
            self.consistency_path(old, lo, lo + k, first, path);
            path.push(self.subtree_root(lo + k, hi));
        } else {
            // Left subtree is unchanged between the two sizes; recurse right.
            self.consistency_path(old - k, lo + k, hi, false, path);
            path.push(self.subtree_root(lo, lo + k));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MerkleHasher;

    fn tree_with(leaves: &[&[u8]]) -> LogTree<Sha256Hasher> {
        let mut tree = LogTree::new();
        for leaf in leaves {
            tree.append(leaf);
        }
        tree
    }

    #[test]
    fn test_empty_tree_root() {
        let tree: LogTree<Sha256Hasher> = LogTree::new();
        assert_eq!(tree.root(), Sha256Hasher.hash_empty());
        assert_eq!(tree.root_at(0).expect("size 0"), Sha256Hasher.hash_empty());
    }

    #[test]
    fn test_single_leaf_root_is_leaf_hash() {
        let tree = tree_with(&[b"entry"]);
        assert_eq!(tree.root(), Sha256Hasher.hash_leaf(b"entry"));
    }

    #[test]
    fn test_three_leaf_structure() {
        // root(3) = H(0x01, H(0x01, H(0x00,"A"), H(0x00,"B")), H(0x00,"C"))
        let tree = tree_with(&[b"A", b"B", b"C"]);
        let h = Sha256Hasher;
        let ab = h.hash_children(&h.hash_leaf(b"A"), &h.hash_leaf(b"B"));
        let expected = h.hash_children(&ab, &h.hash_leaf(b"C"));
        assert_eq!(tree.root(), expected);

        // audit_proof(2, 3) for leaf "C" is the single left subtree root.
        let proof = tree.inclusion_proof(2, 3).expect("proof");
        assert_eq!(proof.path(), &[ab]);
    }

    #[test]
    fn test_consistency_two_to_three() {
        let tree = tree_with(&[b"A", b"B", b"C"]);
        let proof = tree.consistency_proof(2, 3).expect("proof");
        assert_eq!(proof.path(), &[Sha256Hasher.hash_leaf(b"C")]);
    }

    #[test]
    fn test_historical_roots_match_prefix_trees() {
        let leaves: Vec<Vec<u8>> = (0..17u8).map(|i| vec![i, i + 1]).collect();
        let refs: Vec<&[u8]> = leaves.iter().map(|l| l.as_slice()).collect();
        let full = tree_with(&refs);
        for size in 0..=refs.len() {
            let prefix = tree_with(&refs[..size]);
            assert_eq!(
                full.root_at(size as u64).expect("valid size"),
                prefix.root(),
                "size {}",
                size
            );
        }
    }

    #[test]
    fn test_root_at_beyond_size_fails() {
        let tree = tree_with(&[b"A"]);
        assert_eq!(
            tree.root_at(2),
            Err(Error::IndexOutOfRange {
                index: 2,
                tree_size: 1
            })
        );
    }

    #[test]
    fn test_inclusion_proof_index_out_of_range() {
        let tree = tree_with(&[b"A", b"B"]);
        assert!(tree.inclusion_proof(2, 2).is_err());
        assert!(tree.inclusion_proof(0, 3).is_err());
        // Size 0 trees have no proofs.
        assert!(tree.inclusion_proof(0, 0).is_err());
    }

    #[test]
    fn test_single_leaf_proof_is_empty() {
        let tree = tree_with(&[b"only"]);
        let proof = tree.inclusion_proof(0, 1).expect("proof");
        assert!(proof.path().is_empty());
    }

    #[test]
    fn test_consistency_invalid_ranges() {
        let tree = tree_with(&[b"A", b"B", b"C"]);
        assert!(tree.consistency_proof(3, 2).is_err());
        assert!(tree.consistency_proof(1, 4).is_err());
    }

    #[test]
    fn test_consistency_boundary_cases_empty() {
        let tree = tree_with(&[b"A", b"B", b"C", b"D"]);
        assert!(tree.consistency_proof(0, 4).expect("0->4").path().is_empty());
        assert!(tree.consistency_proof(4, 4).expect("4->4").path().is_empty());
        assert!(tree.consistency_proof(0, 0).expect("0->0").path().is_empty());
    }

    #[test]
    fn test_tree_head_matches_root() {
        let tree = tree_with(&[b"A", b"B", b"C"]);
        let head = tree.tree_head();
        assert_eq!(head.tree_size(), 3);
        assert_eq!(head.root_hash(), &tree.root());
    }
}
