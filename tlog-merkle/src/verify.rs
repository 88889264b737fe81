//! Independent proof verification.
//!
//! Pure functions, no storage. A verifier re-derives roots from the claimed
//! leaf (or seed) plus the proof path and compares against trusted roots;
//! it never trusts an externally supplied intermediate hash and never
//! mutates anything.
//!
//! Error split: structural defects (wrong element count, impossible sizes)
//! are [`Error::MalformedProof`] — a protocol bug. A well-formed proof whose
//! recomputation mismatches is [`Error::ProofInvalid`] — a security-relevant
//! event the collaborator layer should surface loudly.

use crate::{
    Digest, Error, MerkleHasher, Result,
    helper::{bit_length, inclusion_proof_length},
    proof::{ConsistencyProof, InclusionProof},
};

/// Verify an inclusion proof against a trusted root.
///
/// `leaf_hash` must be the domain-separated leaf hash (`hash_leaf(data)`)
/// of the entry claimed at `proof.leaf_index()`. Succeeds only when the
/// recomputed root equals `trusted_root` and the path length is exactly
/// right for the `(leaf_index, tree_size)` pair.
pub fn verify_inclusion<H: MerkleHasher>(
    hasher: &H,
    leaf_hash: &Digest,
    proof: &InclusionProof,
    trusted_root: &Digest,
) -> Result<()> {
    let InclusionProof {
        leaf_index,
        tree_size,
        path,
    } = proof;

    if *tree_size == 0 || *leaf_index >= *tree_size {
        return Err(Error::IndexOutOfRange {
            index: *leaf_index,
            tree_size: *tree_size,
        });
    }

    let expected_len = inclusion_proof_length(*leaf_index, *tree_size);
    if path.len() != expected_len {
        return Err(Error::MalformedProof(format!(
            "expected {} path entries for leaf {} in tree of {}, got {}",
            expected_len,
            leaf_index,
            tree_size,
            path.len()
        )));
    }

    // Walk from the leaf up. At each level the sibling goes on the left when
    // the running node is a right child, or when it is the rightmost node of
    // an incomplete level (a promoted border node).
    let mut hash = *leaf_hash;
    let mut index = *leaf_index;
    let mut last_node = *tree_size - 1;
    for sibling in path {
        if index % 2 == 1 || index == last_node {
            hash = hasher.hash_children(sibling, &hash);
        } else {
            hash = hasher.hash_children(&hash, sibling);
        }
        index /= 2;
        last_node /= 2;
    }

    if &hash != trusted_root {
        return Err(Error::ProofInvalid(format!(
            "root mismatch: expected {}, computed {}",
            hex::encode(trusted_root),
            hex::encode(hash)
        )));
    }
    Ok(())
}

/// Verify a consistency proof against two trusted roots.
///
/// Reconstructs both the old and the new root from the proof path and
/// requires each to match the corresponding argument. `new_root` is the
/// trusted (later) root the caller obtained out of band.
pub fn verify_consistency<H: MerkleHasher>(
    hasher: &H,
    old_root: &Digest,
    new_root: &Digest,
    proof: &ConsistencyProof,
) -> Result<()> {
    let ConsistencyProof {
        old_size,
        new_size,
        path,
    } = proof;
    let (old_size, new_size) = (*old_size, *new_size);

    if old_size > new_size {
        return Err(Error::MalformedProof(format!(
            "old size {} exceeds new size {}",
            old_size, new_size
        )));
    }

    // An empty log is a prefix of every log; the proof must be empty.
    if old_size == 0 {
        if !path.is_empty() {
            return Err(Error::MalformedProof(
                "consistency from size 0 requires an empty proof".into(),
            ));
        }
        if new_size == 0 && old_root != new_root {
            return Err(Error::ProofInvalid(format!(
                "empty-tree roots differ: {} vs {}",
                hex::encode(old_root),
                hex::encode(new_root)
            )));
        }
        return Ok(());
    }

    if old_size == new_size {
        if !path.is_empty() {
            return Err(Error::MalformedProof(
                "consistency between equal sizes requires an empty proof".into(),
            ));
        }
        if old_root != new_root {
            return Err(Error::ProofInvalid(format!(
                "equal sizes with different roots: {} vs {}",
                hex::encode(old_root),
                hex::encode(new_root)
            )));
        }
        return Ok(());
    }

    // old_size is covered by a perfect subtree of 2^shift leaves whose root
    // either IS the old root (old_size an exact power of two) or arrives as
    // the first proof entry.
    let shift = old_size.trailing_zeros() as usize;
    let inner = inner_proof_size(old_size - 1, new_size).saturating_sub(shift);
    let border = ((old_size - 1) >> (shift + inner)).count_ones() as usize;

    let (seed, start) = if old_size == 1u64 << shift {
        (old_root, 0)
    } else {
        match path.first() {
            Some(first) => (first, 1),
            None => {
                return Err(Error::MalformedProof(
                    "consistency proof between different sizes cannot be empty".into(),
                ));
            }
        }
    };

    let expected_len = start + inner + border;
    if path.len() != expected_len {
        return Err(Error::MalformedProof(format!(
            "expected {} proof entries for sizes {} -> {}, got {}",
            expected_len,
            old_size,
            new_size,
            path.len()
        )));
    }

    let proof_rest = &path[start..];
    let mask = (old_size - 1) >> shift;

    // The old root touches only the levels where the prefix extends to the
    // right; the new root chains through every level.
    let old_seed = chain_inner_right(hasher, seed, &proof_rest[..inner], mask);
    let computed_old = chain_border_right(hasher, &old_seed, &proof_rest[inner..]);
    let new_seed = chain_inner(hasher, seed, &proof_rest[..inner], mask);
    let computed_new = chain_border_right(hasher, &new_seed, &proof_rest[inner..]);

    if &computed_old != old_root {
        return Err(Error::ProofInvalid(format!(
            "old root mismatch: expected {}, computed {}",
            hex::encode(old_root),
            hex::encode(computed_old)
        )));
    }
    if &computed_new != new_root {
        return Err(Error::ProofInvalid(format!(
            "new root mismatch: expected {}, computed {}",
            hex::encode(new_root),
            hex::encode(computed_new)
        )));
    }
    Ok(())
}

/// Levels below the point where the paths of `index` and the last leaf of
/// the tree diverge.
fn inner_proof_size(index: u64, tree_size: u64) -> usize {
    bit_length(index ^ (tree_size - 1)) as usize
}

// Fold the inner path, taking the side from the mask bits (both-subtree
// levels of the new root).
fn chain_inner<H: MerkleHasher>(
    hasher: &H,
    seed: &Digest,
    proof: &[Digest],
    mask: u64,
) -> Digest {
    let mut hash = *seed;
    for (i, sibling) in proof.iter().enumerate() {
        if (mask >> i) & 1 == 0 {
            hash = hasher.hash_children(&hash, sibling);
        } else {
            hash = hasher.hash_children(sibling, &hash);
        }
    }
    hash
}

// Fold only the levels where the old tree's rightmost node is a right
// child; on right-edge levels the old subtree root passes through unhashed.
fn chain_inner_right<H: MerkleHasher>(
    hasher: &H,
    seed: &Digest,
    proof: &[Digest],
    mask: u64,
) -> Digest {
    let mut hash = *seed;
    for (i, sibling) in proof.iter().enumerate() {
        if (mask >> i) & 1 == 1 {
            hash = hasher.hash_children(sibling, &hash);
        }
    }
    hash
}

// Border levels: every remaining sibling joins from the left.
fn chain_border_right<H: MerkleHasher>(hasher: &H, seed: &Digest, proof: &[Digest]) -> Digest {
    let mut hash = *seed;
    for sibling in proof {
        hash = hasher.hash_children(sibling, &hash);
    }
    hash
}
