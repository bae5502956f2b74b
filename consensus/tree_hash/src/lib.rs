//! Efficient Merkleization as used by the SSZ container and collection types.
//!
//! Implements the `hash_tree_root` scheme: basic values are packed into 32-byte chunks, chunks
//! are merkleized pairwise with SHA-256, and lists/bitlists mix the element count into the final
//! root so that length is committed alongside content.

mod impls;
mod merkleize_padded;
mod merkleize_standard;

pub use merkleize_padded::merkleize_padded;
pub use merkleize_standard::merkleize_standard;

use ethereum_types::H256;

pub const BYTES_PER_CHUNK: usize = 32;
pub const HASHSIZE: usize = 32;
pub const MERKLE_HASH_CHUNK: usize = 2 * BYTES_PER_CHUNK;
pub const MAX_UNION_SELECTOR: u8 = 127;

/// The four shapes of SSZ value that `hash_tree_root` must distinguish, per the packing and
/// length-mixing rules of the encoding.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TreeHashType {
    Basic,
    Vector,
    List,
    Container,
}

/// Implemented by any type that can compute its own `hash_tree_root`.
///
/// `Basic` types additionally implement packing (several fit in one 32-byte chunk); `Vector`,
/// `List` and `Container` types merkleize their own chunk list and, for `List`, mix in a length.
pub trait TreeHash {
    fn tree_hash_type() -> TreeHashType;

    /// Returns the bytes of `self` as they should be packed into a chunk alongside sibling
    /// values. Only meaningful for `TreeHashType::Basic`.
    fn tree_hash_packed_encoding(&self) -> Vec<u8>;

    /// The number of instances of `Self` that pack into a single 32-byte chunk.
    fn tree_hash_packing_factor() -> usize;

    fn tree_hash_root(&self) -> H256;
}

/// Mixes a little-endian `length` into `root`, as required for the roots of `List`/`Bitlist`
/// values.
pub fn mix_in_length(root: &[u8], length: usize) -> H256 {
    let mut length_bytes = length.to_le_bytes().to_vec();
    length_bytes.resize(BYTES_PER_CHUNK, 0);

    let mut hash_input = [0; BYTES_PER_CHUNK * 2];
    hash_input[0..BYTES_PER_CHUNK].copy_from_slice(root);
    hash_input[BYTES_PER_CHUNK..].copy_from_slice(&length_bytes);

    H256::from_slice(&eth2_hashing::hash(&hash_input))
}

/// Mixes a `selector` byte into `root`, as required for the roots of SSZ `Union` values.
/// Returns `None` if `selector` exceeds `MAX_UNION_SELECTOR`.
pub fn mix_in_selector(root: &[u8], selector: u8) -> Option<H256> {
    if selector > MAX_UNION_SELECTOR {
        return None;
    }

    let mut chunk = [0; BYTES_PER_CHUNK];
    chunk[0] = selector;

    Some(H256::from_slice(&eth2_hashing::hash32_concat(root, &chunk)))
}

/// Packs `values` (whose `tree_hash_packed_encoding` may be shorter than a full chunk) into a
/// flat byte buffer ready for `merkleize_padded`.
pub fn pack_bytes<T: TreeHash>(values: &[T]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for value in values {
        bytes.extend_from_slice(&value.tree_hash_packed_encoding());
    }
    bytes
}
