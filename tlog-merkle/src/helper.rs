//! Bit-arithmetic helpers for tree geometry and hashing-cost estimation.

/// Number of bits needed to represent `n` (0 for `n == 0`).
pub fn bit_length(n: u64) -> u32 {
    64 - n.leading_zeros()
}

/// The largest power of two strictly less than `n`.
///
/// This is the RFC 6962 split point: a tree over `n > 1` leaves has a
/// perfect left subtree of `split_point(n)` leaves.
///
/// # Panics
///
/// Debug-asserts `n >= 2`; callers handle the 0- and 1-leaf cases before
/// splitting.
pub fn split_point(n: u64) -> u64 {
    debug_assert!(n >= 2, "split_point requires n >= 2");
    1u64 << (bit_length(n - 1) - 1)
}

/// The exact length of an inclusion proof for `leaf_index` in a tree of
/// `tree_size` leaves.
///
/// Shorter than `ceil(log2(tree_size))` when the leaf sits in the
/// rightmost, not-yet-complete subtree: a rightmost node at an odd-sized
/// level is promoted without a sibling.
pub fn inclusion_proof_length(leaf_index: u64, tree_size: u64) -> usize {
    if tree_size <= 1 {
        return 0;
    }
    let mut len = 0;
    let mut index = leaf_index;
    let mut size = tree_size;
    while size > 1 {
        if !(size % 2 == 1 && index == size - 1) {
            len += 1;
        }
        index /= 2;
        size = size.div_ceil(2);
    }
    len
}

/// The exact number of `hash_children` calls the next append to a compact
/// tree of `size` leaves performs during carry propagation.
///
/// Root recomputation (peak folding) is not included; that costs one hash
/// per remaining peak minus one.
pub fn hash_count_for_append(size: u64) -> u32 {
    size.trailing_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(2), 2);
        assert_eq!(bit_length(3), 2);
        assert_eq!(bit_length(4), 3);
        assert_eq!(bit_length(255), 8);
        assert_eq!(bit_length(256), 9);
    }

    #[test]
    fn test_split_point() {
        assert_eq!(split_point(2), 1);
        assert_eq!(split_point(3), 2);
        assert_eq!(split_point(4), 2);
        assert_eq!(split_point(5), 4);
        assert_eq!(split_point(8), 4);
        assert_eq!(split_point(9), 8);
        assert_eq!(split_point(1023), 512);
        assert_eq!(split_point(1025), 1024);
    }

    #[test]
    fn test_inclusion_proof_length() {
        assert_eq!(inclusion_proof_length(0, 1), 0);
        assert_eq!(inclusion_proof_length(0, 2), 1);
        assert_eq!(inclusion_proof_length(1, 2), 1);
        // Size 3: leaf 2 is promoted past the bottom level.
        assert_eq!(inclusion_proof_length(0, 3), 2);
        assert_eq!(inclusion_proof_length(2, 3), 1);
        assert_eq!(inclusion_proof_length(3, 8), 3);
        // Rightmost leaf of size 5 pairs only at the very top.
        assert_eq!(inclusion_proof_length(4, 5), 1);
    }

    #[test]
    fn test_hash_count_for_append() {
        assert_eq!(hash_count_for_append(0), 0);
        assert_eq!(hash_count_for_append(1), 1);
        assert_eq!(hash_count_for_append(2), 0);
        assert_eq!(hash_count_for_append(3), 2);
        assert_eq!(hash_count_for_append(7), 3);
        assert_eq!(hash_count_for_append(8), 0);
    }
}
