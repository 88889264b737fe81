//! Stateless sparse proof verification.
//!
//! Verification recomputes the root from the claimed leaf (or the default
//! leaf slot, for absence) and the 256 siblings, expanding compression
//! markers from the verifier's own default table. Nothing inside the proof
//! is trusted; only the final comparison against the caller's root decides.

use tlog_merkle::MerkleHasher;

use crate::defaults::{SparseConfig, TREE_DEPTH, bit_at};
use crate::proof::{ProofNode, SparseProof};
use crate::{Error, Result};

/// Check a sparse proof against a trusted root.
///
/// A proof with a leaf payload asserts membership of exactly that payload at
/// the proof's key; a proof without one asserts the key is unset. Structural
/// defects fail with [`Error::MalformedProof`], root mismatches with
/// [`Error::ProofInvalid`].
pub fn verify_sparse<H: MerkleHasher>(
    config: &SparseConfig<H>,
    proof: &SparseProof,
    trusted_root: &tlog_merkle::Digest,
) -> Result<()> {
    if proof.siblings.len() != TREE_DEPTH {
        return Err(Error::MalformedProof(format!(
            "expected {} siblings, got {}",
            TREE_DEPTH,
            proof.siblings.len()
        )));
    }

    let mut current = match &proof.leaf {
        Some(payload) => config.hasher().hash_leaf(payload),
        None => config.defaults().at(0),
    };
    for (height, sibling) in proof.siblings.iter().enumerate() {
        let sibling = match sibling {
            ProofNode::Hash(digest) => *digest,
            ProofNode::Default => config.defaults().at(height),
        };
        // The branch at height h is picked by key bit 255 - h.
        current = if bit_at(&proof.key, TREE_DEPTH - 1 - height) == 1 {
            config.hasher().hash_children(&sibling, &current)
        } else {
            config.hasher().hash_children(&current, &sibling)
        };
    }

    if current != *trusted_root {
        return Err(Error::ProofInvalid(format!(
            "root mismatch: computed {}, trusted {}",
            hex::encode(current),
            hex::encode(trusted_root)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tlog_merkle::{Digest, Sha256Hasher};

    use super::*;
    use crate::tree::SparseMerkleTree;

    fn key(byte: u8) -> Digest {
        [byte; 32]
    }

    fn populated() -> SparseMerkleTree<Sha256Hasher> {
        let mut tree = SparseMerkleTree::default();
        for i in 0..6u8 {
            tree.set(key(i), format!("payload-{}", i).as_bytes());
        }
        tree
    }

    #[test]
    fn test_membership_proofs_verify() {
        let tree = populated();
        let root = tree.root();
        for i in 0..6u8 {
            let proof = tree.proof(&key(i));
            assert!(proof.is_membership());
            verify_sparse(tree.config(), &proof, &root)
                .unwrap_or_else(|e| panic!("key {} failed: {}", i, e));
        }
    }

    #[test]
    fn test_absence_proofs_verify() {
        let tree = populated();
        let root = tree.root();
        for i in 6..12u8 {
            let proof = tree.proof(&key(i));
            assert!(!proof.is_membership());
            verify_sparse(tree.config(), &proof, &root)
                .unwrap_or_else(|e| panic!("key {} failed: {}", i, e));
        }
    }

    #[test]
    fn test_absence_in_empty_tree() {
        let tree: SparseMerkleTree<Sha256Hasher> = SparseMerkleTree::default();
        let proof = tree.proof(&key(200));
        verify_sparse(tree.config(), &proof, &tree.root()).expect("absence in empty tree");
    }

    #[test]
    fn test_stale_root_fails() {
        let mut tree = populated();
        let stale_root = tree.root();
        tree.set(key(50), b"late arrival");
        let proof = tree.proof(&key(0));
        let err = verify_sparse(tree.config(), &proof, &stale_root).expect_err("stale root");
        assert!(matches!(err, Error::ProofInvalid(_)));
    }

    #[test]
    fn test_wrong_payload_fails() {
        let tree = populated();
        let root = tree.root();
        let mut proof = tree.proof(&key(2));
        proof.leaf = Some(b"forged payload".to_vec());
        assert!(matches!(
            verify_sparse(tree.config(), &proof, &root),
            Err(Error::ProofInvalid(_))
        ));
    }

    #[test]
    fn test_claimed_absence_of_present_key_fails() {
        let tree = populated();
        let root = tree.root();
        let mut proof = tree.proof(&key(2));
        proof.leaf = None;
        assert!(verify_sparse(tree.config(), &proof, &root).is_err());
    }

    #[test]
    fn test_corrupted_sibling_fails() {
        let tree = populated();
        let root = tree.root();
        let good = tree.proof(&key(1));

        for (i, sibling) in good.siblings().iter().enumerate() {
            if let ProofNode::Hash(digest) = sibling {
                let mut corrupted = *digest;
                corrupted[0] ^= 0x01;
                let mut proof = good.clone();
                proof.siblings[i] = ProofNode::Hash(corrupted);
                assert!(
                    verify_sparse(tree.config(), &proof, &root).is_err(),
                    "sibling {} corruption went unnoticed",
                    i
                );
            }
        }
    }

    #[test]
    fn test_wrong_sibling_count_is_malformed() {
        let tree = populated();
        let root = tree.root();
        let mut proof = tree.proof(&key(1));
        proof.siblings.pop();
        assert!(matches!(
            verify_sparse(tree.config(), &proof, &root),
            Err(Error::MalformedProof(_))
        ));
    }

    #[test]
    fn test_proof_bound_to_key() {
        // Re-pointing a valid proof at a different key must fail.
        let tree = populated();
        let root = tree.root();
        let mut proof = tree.proof(&key(1));
        proof.key = key(3);
        assert!(verify_sparse(tree.config(), &proof, &root).is_err());
    }

    proptest! {
        #[test]
        fn prop_sibling_corruption_fails(
            count in 2u8..12,
            target_seed in any::<u8>(),
            pick_seed in any::<usize>(),
            byte in 0usize..32,
            bit in 0u8..8,
        ) {
            let mut tree: SparseMerkleTree<Sha256Hasher> = SparseMerkleTree::default();
            for i in 0..count {
                tree.set(key(i), &[i]);
            }
            let root = tree.root();
            let good = tree.proof(&key(target_seed % count));
            verify_sparse(tree.config(), &good, &root).expect("intact proof");

            // With at least two keys every proof carries a materialized
            // sibling somewhere; flip one bit of one of them.
            let materialized: Vec<usize> = good
                .siblings()
                .iter()
                .enumerate()
                .filter(|(_, s)| matches!(s, ProofNode::Hash(_)))
                .map(|(i, _)| i)
                .collect();
            prop_assert!(!materialized.is_empty());
            let pos = materialized[pick_seed % materialized.len()];

            let mut bad = good.clone();
            if let ProofNode::Hash(digest) = &mut bad.siblings[pos] {
                digest[byte] ^= 1 << bit;
            }
            prop_assert!(verify_sparse(tree.config(), &bad, &root).is_err());
        }
    }
}
