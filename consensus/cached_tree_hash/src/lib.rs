//! Incremental Merkleization: a side-table cache of subtree hashes, keyed by child-index, that
//! lets a container or list recompute `hash_tree_root` after a small write without re-hashing
//! every leaf. Breaks the "state -> validators -> state-derived caches" cycle by storing the
//! cache next to (not inside) the value it describes; callers own the association.

use eth2_hashing::{hash32_concat, ZERO_HASHES};
use ethereum_types::H256;

/// A cache of one value's Merkle tree, addressable by leaf index. Internal nodes are stored in
/// the usual implicit array layout of a complete binary tree (`node[1]` is the root; `node[i]`'s
/// children are `node[2i]`/`node[2i+1]`); leaves occupy the last `num_leaves` slots.
#[derive(Debug, Clone)]
pub struct TreeHashCache {
    num_leaves: usize,
    height: u32,
    nodes: Vec<H256>,
    dirty: Vec<bool>,
}

impl TreeHashCache {
    /// Builds a cache sized for (at least) `min_leaves` leaves, seeded with `leaves`' packed
    /// chunk hashes. Extra leaves up to the next power of two are implicit zero hashes.
    pub fn new(leaves: &[H256], min_leaves: usize) -> Self {
        let num_leaves = leaves.len().max(min_leaves).max(1).next_power_of_two();
        let height = num_leaves.trailing_zeros();
        let mut nodes = vec![H256::zero(); 2 * num_leaves];

        for (i, leaf) in leaves.iter().enumerate() {
            nodes[num_leaves + i] = *leaf;
        }
        for i in leaves.len()..num_leaves {
            nodes[num_leaves + i] = H256::from_slice(&ZERO_HASHES[0]);
        }

        let mut cache = TreeHashCache {
            num_leaves,
            height,
            nodes,
            dirty: vec![true; 2 * num_leaves],
        };
        cache.recalculate();
        cache
    }

    /// Marks `leaf_index` changed to `new_hash`; its ancestors are marked dirty but not
    /// recomputed until the next `root()` call.
    pub fn set_leaf(&mut self, leaf_index: usize, new_hash: H256) {
        assert!(leaf_index < self.num_leaves, "leaf index out of range");
        let mut node = self.num_leaves + leaf_index;
        self.nodes[node] = new_hash;
        self.dirty[node] = true;
        while node > 1 {
            node /= 2;
            self.dirty[node] = true;
        }
    }

    /// Recomputes every node marked dirty, bottom-up, then returns the (now clean) root.
    pub fn root(&mut self) -> H256 {
        self.recalculate();
        self.nodes[1]
    }

    fn recalculate(&mut self) {
        for depth in (0..self.height).rev() {
            let first = 1usize << depth;
            let last = (1usize << (depth + 1)) - 1;
            for node in first..=last {
                if self.dirty[node] {
                    let left = self.nodes[2 * node];
                    let right = self.nodes[2 * node + 1];
                    self.nodes[node] = H256::from_slice(&hash32_concat(
                        left.as_bytes(),
                        right.as_bytes(),
                    ));
                    self.dirty[node] = false;
                }
            }
        }
    }

    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }
}

/// Implemented by containers/lists that keep a `TreeHashCache` alongside their value instead of
/// recomputing `hash_tree_root` from scratch on every call.
pub trait CachedTreeHash: tree_hash::TreeHash {
    /// Builds a fresh cache from the current value.
    fn new_tree_hash_cache(&self) -> TreeHashCache;

    /// Recomputes `root` using `cache`, updating only the leaves that changed since the cache
    /// was built (as recorded by a prior `new_tree_hash_cache`/`recalculate_tree_hash_root`
    /// round-trip). The default just discards `cache` and rebuilds: concrete containers override
    /// this once they know which of their fields changed.
    fn recalculate_tree_hash_root(&self, _cache: &mut TreeHashCache) -> H256 {
        self.tree_hash_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eth2_hashing::hash;

    fn leaf(byte: u8) -> H256 {
        H256::from_slice(&hash(&[byte]))
    }

    #[test]
    fn matches_merkleize_padded() {
        let leaves = vec![leaf(1), leaf(2), leaf(3), leaf(4)];
        let mut cache = TreeHashCache::new(&leaves, 4);

        let mut flat = Vec::new();
        for l in &leaves {
            flat.extend_from_slice(l.as_bytes());
        }
        let expected = H256::from_slice(&tree_hash::merkleize_padded(&flat, 4));

        assert_eq!(cache.root(), expected);
    }

    #[test]
    fn updating_one_leaf_changes_only_its_path() {
        let leaves = vec![leaf(1), leaf(2), leaf(3), leaf(4)];
        let mut cache = TreeHashCache::new(&leaves, 4);
        let before = cache.root();

        cache.set_leaf(2, leaf(99));
        let after = cache.root();

        assert_ne!(before, after);

        let mut flat = Vec::new();
        flat.extend_from_slice(leaves[0].as_bytes());
        flat.extend_from_slice(leaves[1].as_bytes());
        flat.extend_from_slice(leaf(99).as_bytes());
        flat.extend_from_slice(leaves[3].as_bytes());
        let expected = H256::from_slice(&tree_hash::merkleize_padded(&flat, 4));
        assert_eq!(after, expected);
    }

    #[test]
    fn clean_root_is_cheap_and_stable() {
        let leaves = vec![leaf(7); 8];
        let mut cache = TreeHashCache::new(&leaves, 8);
        let a = cache.root();
        let b = cache.root();
        assert_eq!(a, b);
    }
}
