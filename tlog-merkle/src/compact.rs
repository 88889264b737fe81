//! Compact append-only tree: O(log n) state, same roots as the full tree.
//!
//! The tree keeps only its *frontier*: one subtree root per set bit of the
//! current size, ordered from the largest (leftmost) perfect subtree down
//! to the smallest. Appending a leaf works like incrementing a binary
//! counter: merges happen exactly where carries propagate.
//!
//! The frontier is the entire durable state. [`Frontier`] snapshots
//! serialize to a fixed byte layout and restore bit-exactly, so an external
//! storage layer can persist a tree mid-sequence and resume it later with
//! identical future roots.

use crate::{
    Digest, Error, MerkleHasher, Result, Sha256Hasher,
    hasher::DIGEST_LEN,
    proof::TreeHead,
};

/// An incremental RFC 6962 tree accumulator.
///
/// Holds one hash per set bit of the current size instead of the full leaf
/// history. Appends are amortized O(1) hashes; the root is recomputed by
/// folding the peaks right-to-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactTree<H: MerkleHasher = Sha256Hasher> {
    size: u64,
    /// Peak hashes, largest subtree first; `peaks.len() == size.count_ones()`.
    peaks: Vec<Digest>,
    hasher: H,
}

impl<H: MerkleHasher + Default> CompactTree<H> {
    /// Create a new empty tree with the default-constructed hasher.
    pub fn new() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<H: MerkleHasher + Default> Default for CompactTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MerkleHasher> CompactTree<H> {
    /// Create a new empty tree with an explicit hash strategy.
    pub fn with_hasher(hasher: H) -> Self {
        CompactTree {
            size: 0,
            peaks: Vec::new(),
            hasher,
        }
    }

    /// Restore a tree from a frontier snapshot.
    ///
    /// The restored tree behaves exactly as if it had kept running in
    /// memory, provided the snapshot was taken with the same hash strategy.
    pub fn from_frontier(frontier: Frontier, hasher: H) -> Self {
        CompactTree {
            size: frontier.size,
            peaks: frontier.peaks,
            hasher,
        }
    }

    /// Number of leaves appended so far.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` if no leaves have been appended.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Append a precomputed leaf hash; returns the assigned leaf index and
    /// the root over the extended sequence.
    ///
    /// The leaf hash must be `hash_leaf(data)` under this tree's hash
    /// strategy; use [`CompactTree::append_data`] to hash raw entry bytes.
    pub fn append(&mut self, leaf_hash: Digest) -> (u64, Digest) {
        let index = self.size;
        let mut node = leaf_hash;
        let mut carries = self.size;
        while carries & 1 == 1 {
            // Invariant: one peak per set bit of `size`, so the pop succeeds.
            let left = self.peaks.pop().expect("peak per set bit");
            node = self.hasher.hash_children(&left, &node);
            carries >>= 1;
        }
        self.peaks.push(node);
        self.size += 1;
        (index, self.root())
    }

    /// Hash raw entry bytes and append them as the next leaf.
    pub fn append_data(&mut self, data: &[u8]) -> (u64, Digest) {
        self.append(self.hasher.hash_leaf(data))
    }

    /// The root over all appended leaves.
    ///
    /// Size 0 returns `hash_empty()`. Otherwise the peaks fold right-to-left:
    /// each fold step hashes an earlier (left) peak over the accumulated
    /// right-hand root.
    pub fn root(&self) -> Digest {
        let mut peaks = self.peaks.iter().rev();
        match peaks.next() {
            None => self.hasher.hash_empty(),
            Some(last) => peaks.fold(*last, |acc, peak| self.hasher.hash_children(peak, &acc)),
        }
    }

    /// The `(tree_size, root_hash)` pair handed to an external signer.
    pub fn tree_head(&self) -> TreeHead {
        TreeHead::new(self.size, self.root())
    }

    /// Snapshot the tree's entire durable state.
    pub fn frontier(&self) -> Frontier {
        Frontier {
            size: self.size,
            peaks: self.peaks.clone(),
        }
    }
}

/// A compact tree's durable state: the current size and one subtree root
/// per set bit of it.
///
/// An explicit value type so snapshots can be persisted, shipped, and
/// restored without exposing the tree's internals to mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontier {
    size: u64,
    peaks: Vec<Digest>,
}

impl Frontier {
    /// Number of leaves covered by this snapshot.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The peak hashes, largest subtree first.
    pub fn peaks(&self) -> &[Digest] {
        &self.peaks
    }

    /// Serialize to bytes.
    ///
    /// Format:
    /// ```text
    /// size: u64 BE (8 bytes)
    /// peak_count: u8
    /// peaks: [peak_count × 32 bytes]
    /// ```
    /// `peak_count` always equals `size.count_ones()` and is written
    /// explicitly so restores can reject corrupted snapshots.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(9 + self.peaks.len() * DIGEST_LEN);
        buf.extend_from_slice(&self.size.to_be_bytes());
        buf.push(self.peaks.len() as u8);
        for peak in &self.peaks {
            buf.extend_from_slice(peak);
        }
        buf
    }

    /// Restore a frontier from bytes produced by [`Frontier::to_bytes`].
    ///
    /// Rejects truncated input, a peak count inconsistent with the size's
    /// binary representation, and trailing bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < 9 {
            return Err(Error::InvalidData("truncated frontier header".into()));
        }
        let size = u64::from_be_bytes(
            data[0..8]
                .try_into()
                .map_err(|_| Error::InvalidData("bad frontier size".into()))?,
        );
        let peak_count = data[8] as usize;
        if peak_count != size.count_ones() as usize {
            return Err(Error::InvalidData(format!(
                "frontier peak count {} does not match size {} ({} set bits)",
                peak_count,
                size,
                size.count_ones()
            )));
        }
        if data.len() != 9 + peak_count * DIGEST_LEN {
            return Err(Error::InvalidData(format!(
                "frontier expected {} bytes, got {}",
                9 + peak_count * DIGEST_LEN,
                data.len()
            )));
        }
        let mut peaks = Vec::with_capacity(peak_count);
        for i in 0..peak_count {
            let start = 9 + i * DIGEST_LEN;
            let peak: Digest = data[start..start + DIGEST_LEN]
                .try_into()
                .map_err(|_| Error::InvalidData("bad peak bytes".into()))?;
            peaks.push(peak);
        }
        Ok(Frontier { size, peaks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_root_is_hash_empty() {
        let tree: CompactTree<Sha256Hasher> = CompactTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.root(), Sha256Hasher.hash_empty());
    }

    #[test]
    fn test_append_assigns_sequential_indices() {
        let mut tree: CompactTree<Sha256Hasher> = CompactTree::new();
        for i in 0..20u64 {
            let (index, _) = tree.append_data(&i.to_be_bytes());
            assert_eq!(index, i);
        }
        assert_eq!(tree.size(), 20);
    }

    #[test]
    fn test_peak_count_tracks_set_bits() {
        let mut tree: CompactTree<Sha256Hasher> = CompactTree::new();
        for i in 0..64u64 {
            tree.append_data(&[i as u8]);
            let frontier = tree.frontier();
            assert_eq!(
                frontier.peaks().len(),
                tree.size().count_ones() as usize,
                "after {} appends",
                i + 1
            );
        }
    }

    #[test]
    fn test_frontier_roundtrip() {
        let mut tree: CompactTree<Sha256Hasher> = CompactTree::new();
        for i in 0..13u8 {
            tree.append_data(&[i]);
        }
        let bytes = tree.frontier().to_bytes();
        let restored = Frontier::from_bytes(&bytes).expect("roundtrip");
        assert_eq!(restored, tree.frontier());

        let mut resumed = CompactTree::from_frontier(restored, Sha256Hasher);
        assert_eq!(resumed.root(), tree.root());

        // Restored tree must produce the same future roots.
        let (_, resumed_root) = resumed.append_data(b"next");
        let (_, live_root) = tree.append_data(b"next");
        assert_eq!(resumed_root, live_root);
    }

    #[test]
    fn test_frontier_empty_roundtrip() {
        let tree: CompactTree<Sha256Hasher> = CompactTree::new();
        let restored = Frontier::from_bytes(&tree.frontier().to_bytes()).expect("roundtrip");
        assert_eq!(restored.size(), 0);
        assert!(restored.peaks().is_empty());
    }

    #[test]
    fn test_frontier_rejects_truncation() {
        let mut tree: CompactTree<Sha256Hasher> = CompactTree::new();
        tree.append_data(b"a");
        tree.append_data(b"b");
        tree.append_data(b"c");
        let bytes = tree.frontier().to_bytes();
        assert!(Frontier::from_bytes(&bytes[..bytes.len() - 1]).is_err());
        assert!(Frontier::from_bytes(&bytes[..4]).is_err());
    }

    #[test]
    fn test_frontier_rejects_trailing_bytes() {
        let mut tree: CompactTree<Sha256Hasher> = CompactTree::new();
        tree.append_data(b"a");
        let mut bytes = tree.frontier().to_bytes();
        bytes.push(0x00);
        assert!(Frontier::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_frontier_rejects_inconsistent_peak_count() {
        let mut tree: CompactTree<Sha256Hasher> = CompactTree::new();
        for i in 0..3u8 {
            tree.append_data(&[i]);
        }
        let mut bytes = tree.frontier().to_bytes();
        // Size 3 has two set bits; claim three peaks.
        bytes[8] = 3;
        assert!(Frontier::from_bytes(&bytes).is_err());
    }
}
