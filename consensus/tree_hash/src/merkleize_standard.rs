use crate::merkleize_padded::merkleize_padded;

/// Merkleizes bytes without any virtual padding, i.e. the number of leaves is derived directly
/// from `bytes.len()`. Used for fixed-size containers where no list-style length mixing applies.
pub fn merkleize_standard(bytes: &[u8]) -> Vec<u8> {
    merkleize_padded(bytes, 0)
}
