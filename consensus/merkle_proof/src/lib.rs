//! Binary Merkle tree construction, root computation, and branch
//! verification, used for SSZ `hash_tree_root` and for deposit Merkle
//! proofs against `state.eth1_data.deposit_root`.

use eth2_hashing::{hash, hash32_concat, ZERO_HASHES};
use ethereum_types::H256;
use lazy_static::lazy_static;
use safe_arith::SafeArith;

pub const MAX_TREE_DEPTH: usize = 32;

lazy_static! {
    static ref ZERO_HASHES_H256: Vec<H256> = ZERO_HASHES.iter().map(|h| H256::from_slice(h)).collect();
}

/// A Merkle tree over `Vec<H256>` leaves, padded to the next power of two.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    levels: Vec<Vec<H256>>,
}

impl MerkleTree {
    /// Build a tree over `leaves`, padded with zero-hashes to `2^depth` leaves.
    pub fn create(leaves: &[H256], depth: usize) -> Self {
        let mut level: Vec<H256> = leaves.to_vec();
        let target_len = 1usize << depth;
        level.resize(target_len, zero_hash(0));

        let mut levels = vec![level.clone()];
        for d in 0..depth {
            let mut next = Vec::with_capacity(level.len() / 2);
            for pair in level.chunks(2) {
                let left = pair[0];
                let right = pair.get(1).copied().unwrap_or_else(|| zero_hash(d));
                next.push(merge(left, right));
            }
            levels.push(next.clone());
            level = next;
        }

        Self { levels }
    }

    /// The root of the tree (top of the last level).
    pub fn root(&self) -> H256 {
        self.levels
            .last()
            .and_then(|l| l.first())
            .copied()
            .unwrap_or_else(|| zero_hash(0))
    }

    /// Generate an inclusion proof (the sibling at each level) for `leaf_index`.
    pub fn generate_proof(&self, leaf_index: usize, depth: usize) -> (H256, Vec<H256>) {
        let mut proof = Vec::with_capacity(depth);
        let mut index = leaf_index;
        for level in &self.levels[..depth] {
            let sibling_index = index ^ 1;
            let sibling = level.get(sibling_index).copied().unwrap_or_else(|| zero_hash(0));
            proof.push(sibling);
            index /= 2;
        }
        (self.levels[0][leaf_index], proof)
    }
}

fn merge(left: H256, right: H256) -> H256 {
    H256::from_slice(&hash32_concat(left.as_bytes(), right.as_bytes()))
}

fn zero_hash(depth: usize) -> H256 {
    ZERO_HASHES_H256.get(depth).copied().unwrap_or_else(|| {
        H256::from_slice(&hash(&[0u8; 64]))
    })
}

/// Verify `leaf` is present at `index` under `root`, given `branch`.
///
/// Used for `Deposit.proof` verification against `state.eth1_data.deposit_root`.
pub fn verify_merkle_proof(
    leaf: H256,
    branch: &[H256],
    depth: usize,
    index: usize,
    root: H256,
) -> bool {
    if branch.len() < depth {
        return false;
    }
    let mut value = leaf;
    let mut idx = index;
    for sibling in branch.iter().take(depth) {
        value = if idx.safe_rem(2).unwrap_or(0) == 1 {
            merge(*sibling, value)
        } else {
            merge(value, *sibling)
        };
        idx /= 2;
    }
    value == root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_proof() {
        let leaves: Vec<H256> = (0..4u8).map(|i| H256::from_low_u64_le(i as u64)).collect();
        let depth = 2;
        let tree = MerkleTree::create(&leaves, depth);
        let root = tree.root();

        for (i, leaf) in leaves.iter().enumerate() {
            let (got_leaf, branch) = tree.generate_proof(i, depth);
            assert_eq!(got_leaf, *leaf);
            assert!(verify_merkle_proof(*leaf, &branch, depth, i, root));
        }
    }

    #[test]
    fn rejects_wrong_index() {
        let leaves: Vec<H256> = (0..4u8).map(|i| H256::from_low_u64_le(i as u64)).collect();
        let depth = 2;
        let tree = MerkleTree::create(&leaves, depth);
        let root = tree.root();
        let (leaf, branch) = tree.generate_proof(1, depth);
        assert!(!verify_merkle_proof(leaf, &branch, depth, 2, root));
    }

    #[quickcheck_macros::quickcheck]
    fn pad_with_zero_hashes_is_deterministic(n: u8) -> bool {
        let n = (n % 8) as usize + 1;
        let leaves: Vec<H256> = (0..n as u64).map(H256::from_low_u64_le).collect();
        let depth = 4;
        MerkleTree::create(&leaves, depth).root() == MerkleTree::create(&leaves, depth).root()
    }
}
