use crate::{FixedVector, VariableList};
use ethereum_types::H256;
use tree_hash::{merkleize_padded, mix_in_length, pack_bytes, TreeHash, TreeHashType};
use typenum::Unsigned;

/// Merkleizes a homogeneous sequence of `TreeHash` values, used by both `VariableList` and
/// `FixedVector`. `min_leaves` is the bound's worth of leaves (`N`, or `N / packing_factor` for
/// packed basic elements) so that two lists of different current length but equal bound hash
/// identically up to the length-mix.
fn vec_merkle_root<T: TreeHash>(values: &[T], min_leaves: usize) -> H256 {
    match T::tree_hash_type() {
        TreeHashType::Basic => {
            let bytes = pack_bytes(values);
            H256::from_slice(&merkleize_padded(&bytes, min_leaves))
        }
        TreeHashType::Container | TreeHashType::Vector | TreeHashType::List => {
            let mut chunks = Vec::with_capacity(values.len() * 32);
            for value in values {
                chunks.extend_from_slice(value.tree_hash_root().as_bytes());
            }
            H256::from_slice(&merkleize_padded(&chunks, min_leaves))
        }
    }
}

fn packing_min_leaves<T: TreeHash>(num_elements: usize) -> usize {
    match T::tree_hash_type() {
        TreeHashType::Basic => {
            let factor = T::tree_hash_packing_factor().max(1);
            (num_elements + factor - 1) / factor
        }
        _ => num_elements,
    }
}

impl<T: TreeHash, N: Unsigned> TreeHash for VariableList<T, N> {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::List
    }

    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("List is never itself packed")
    }

    fn tree_hash_packing_factor() -> usize {
        unreachable!("List is never itself packed")
    }

    fn tree_hash_root(&self) -> H256 {
        let min_leaves = packing_min_leaves::<T>(N::to_usize());
        let root = vec_merkle_root(self.as_slice(), min_leaves);
        mix_in_length(root.as_bytes(), self.len())
    }
}

impl<T: TreeHash, N: Unsigned> TreeHash for FixedVector<T, N> {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Vector
    }

    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("Vector is never itself packed")
    }

    fn tree_hash_packing_factor() -> usize {
        unreachable!("Vector is never itself packed")
    }

    fn tree_hash_root(&self) -> H256 {
        let min_leaves = packing_min_leaves::<T>(N::to_usize());
        vec_merkle_root(self.as_slice(), min_leaves)
    }
}
