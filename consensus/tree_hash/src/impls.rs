use super::*;

macro_rules! impl_for_uint {
    ($type: ident, $bit_size: expr) => {
        impl TreeHash for $type {
            fn tree_hash_type() -> TreeHashType {
                TreeHashType::Basic
            }

            fn tree_hash_packed_encoding(&self) -> Vec<u8> {
                self.to_le_bytes().to_vec()
            }

            fn tree_hash_packing_factor() -> usize {
                HASHSIZE / ($bit_size / 8)
            }

            fn tree_hash_root(&self) -> H256 {
                let mut bytes = [0; HASHSIZE];
                bytes[0..$bit_size / 8].copy_from_slice(&self.to_le_bytes());
                H256::from_slice(&bytes)
            }
        }
    };
}

impl_for_uint!(u8, 8);
impl_for_uint!(u16, 16);
impl_for_uint!(u32, 32);
impl_for_uint!(u64, 64);
impl_for_uint!(u128, 128);

impl TreeHash for usize {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Basic
    }

    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        (*self as u64).to_le_bytes().to_vec()
    }

    fn tree_hash_packing_factor() -> usize {
        HASHSIZE / 8
    }

    fn tree_hash_root(&self) -> H256 {
        (*self as u64).tree_hash_root()
    }
}

impl TreeHash for bool {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Basic
    }

    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        vec![*self as u8]
    }

    fn tree_hash_packing_factor() -> usize {
        HASHSIZE
    }

    fn tree_hash_root(&self) -> H256 {
        (*self as u8).tree_hash_root()
    }
}

impl TreeHash for H256 {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Vector
    }

    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn tree_hash_packing_factor() -> usize {
        1
    }

    fn tree_hash_root(&self) -> H256 {
        *self
    }
}

macro_rules! impl_for_u8_array {
    ($len: expr) => {
        impl TreeHash for [u8; $len] {
            fn tree_hash_type() -> TreeHashType {
                TreeHashType::Vector
            }

            fn tree_hash_packed_encoding(&self) -> Vec<u8> {
                unreachable!("arrays of this length are not packed, only merkleized directly")
            }

            fn tree_hash_packing_factor() -> usize {
                unreachable!("arrays of this length are not packed, only merkleized directly")
            }

            fn tree_hash_root(&self) -> H256 {
                let mut padded = self.to_vec();
                let rem = padded.len() % BYTES_PER_CHUNK;
                if rem != 0 {
                    padded.resize(padded.len() + (BYTES_PER_CHUNK - rem), 0);
                }
                H256::from_slice(&merkleize_padded(&padded, 0))
            }
        }
    };
}

impl_for_u8_array!(4);
impl_for_u8_array!(32);
impl_for_u8_array!(48);
impl_for_u8_array!(96);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bool_packing_factor() {
        assert_eq!(bool::tree_hash_packing_factor(), 32);
    }

    #[test]
    fn u64_root_is_le_padded() {
        let x: u64 = 1;
        let mut expected = [0; 32];
        expected[0] = 1;
        assert_eq!(x.tree_hash_root(), H256::from_slice(&expected));
    }

    #[test]
    fn h256_root_is_self() {
        let h = H256::repeat_byte(7);
        assert_eq!(h.tree_hash_root(), h);
    }
}
