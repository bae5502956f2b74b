use crate::Error;
use ssz::DecodeError;
use std::marker::PhantomData;
use typenum::Unsigned;

/// Marks the two ways a `Bitfield` can carry its length: `Variable` (SSZ `Bitlist`, length
/// encoded implicitly via a trailing delimiter bit) or `Fixed` (SSZ `Bitvector`, length fixed at
/// the type level and carried in every byte).
pub trait BitfieldBehaviour: Clone {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable<N> {
    _phantom: PhantomData<N>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixed<N> {
    _phantom: PhantomData<N>,
}

impl<N: Unsigned + Clone> BitfieldBehaviour for Variable<N> {}
impl<N: Unsigned + Clone> BitfieldBehaviour for Fixed<N> {}

/// A bit-packed field, generic over whether its length is `Variable` (a `Bitlist`, bound `N`) or
/// `Fixed` (a `Bitvector`, exactly `N` bits). `bytes` never contains the `Bitlist` delimiter bit;
/// that bit is added and stripped only at the SSZ encoding boundary.
#[derive(Clone, Debug)]
pub struct Bitfield<T> {
    bytes: Vec<u8>,
    len: usize,
    _phantom: PhantomData<T>,
}

pub type BitList<N> = Bitfield<Variable<N>>;
pub type BitVector<N> = Bitfield<Fixed<N>>;

fn byte_len(num_bits: usize) -> usize {
    (num_bits + 7) / 8
}

impl<N: Unsigned> Bitfield<Variable<N>> {
    pub fn with_capacity(num_bits: usize) -> Result<Self, Error> {
        if num_bits > N::to_usize() {
            return Err(Error::OutOfBounds {
                i: num_bits,
                len: N::to_usize(),
            });
        }
        Ok(Self {
            bytes: vec![0; byte_len(num_bits)],
            len: num_bits,
            _phantom: PhantomData,
        })
    }

    pub fn max_len() -> usize {
        N::to_usize()
    }

    /// Parses the SSZ `Bitlist` encoding: little-endian bytes with a trailing delimiter bit
    /// marking the true length.
    pub fn from_ssz_bytes_inner(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (len, raw) = ssz::decode_bitlist_bytes(bytes, N::to_usize())?;
        let mut content = raw;
        // clear the delimiter bit so internal storage never carries it
        let delim_byte = len / 8;
        let delim_bit = len % 8;
        content[delim_byte] &= !(1 << delim_bit);
        content.truncate(byte_len(len));
        Ok(Self {
            bytes: content,
            len,
            _phantom: PhantomData,
        })
    }

    pub fn as_ssz_bytes_inner(&self) -> Vec<u8> {
        let mut out = self.bytes.clone();
        out.resize(byte_len(self.len + 1), 0);
        let delim_byte = self.len / 8;
        let delim_bit = self.len % 8;
        out[delim_byte] |= 1 << delim_bit;
        out
    }
}

impl<N: Unsigned> Bitfield<Fixed<N>> {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; byte_len(N::to_usize())],
            len: N::to_usize(),
            _phantom: PhantomData,
        }
    }

    pub fn fixed_len() -> usize {
        N::to_usize()
    }

    pub fn from_ssz_bytes_inner(bytes: &[u8]) -> Result<Self, DecodeError> {
        let expected = byte_len(N::to_usize());
        if bytes.len() != expected {
            return Err(DecodeError::SchemaMismatch {
                msg: format!(
                    "expected {} bytes for a {}-bit bitvector, got {}",
                    expected,
                    N::to_usize(),
                    bytes.len()
                ),
            });
        }
        // Bits beyond N in the final byte must be unset: they're not addressable.
        let spare_bits = expected * 8 - N::to_usize();
        if spare_bits > 0 {
            let last = bytes[expected - 1];
            if last >> (8 - spare_bits) != 0 {
                return Err(DecodeError::BytesInvalid(
                    "bitvector has set bits beyond its declared length".into(),
                ));
            }
        }
        Ok(Self {
            bytes: bytes.to_vec(),
            len: N::to_usize(),
            _phantom: PhantomData,
        })
    }

    pub fn as_ssz_bytes_inner(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl<N: Unsigned> Default for Bitfield<Fixed<N>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BitfieldBehaviour> Bitfield<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, i: usize) -> Result<bool, Error> {
        if i >= self.len {
            return Err(Error::OutOfBounds { i, len: self.len });
        }
        Ok((self.bytes[i / 8] >> (i % 8)) & 1 == 1)
    }

    pub fn set(&mut self, i: usize, value: bool) -> Result<(), Error> {
        if i >= self.len {
            return Err(Error::OutOfBounds { i, len: self.len });
        }
        if value {
            self.bytes[i / 8] |= 1 << (i % 8);
        } else {
            self.bytes[i / 8] &= !(1 << (i % 8));
        }
        Ok(())
    }

    pub fn num_set_bits(&self) -> usize {
        (0..self.len).filter(|&i| self.get(i).unwrap_or(false)).count()
    }

    pub fn highest_set_bit(&self) -> Option<usize> {
        (0..self.len).rev().find(|&i| self.get(i).unwrap_or(false))
    }

    pub fn iter(&self) -> BitIter<'_, T> {
        BitIter { field: self, i: 0 }
    }

    /// Bitwise OR with another field of equal length. Used to aggregate `aggregation_bits`
    /// across attestations covering the same `AttestationData`.
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for (a, b) in out.bytes.iter_mut().zip(other.bytes.iter()) {
            *a |= *b;
        }
        out
    }

    /// True if every bit set in `self` is also set in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .all(|(a, b)| a & b == *a)
    }

    /// True if `self` and `other` have any bit set in common.
    pub fn intersects(&self, other: &Self) -> bool {
        self.bytes.iter().zip(other.bytes.iter()).any(|(a, b)| a & b != 0)
    }
}

pub struct BitIter<'a, T> {
    field: &'a Bitfield<T>,
    i: usize,
}

impl<'a, T: BitfieldBehaviour> Iterator for BitIter<'a, T> {
    type Item = bool;
    fn next(&mut self) -> Option<bool> {
        if self.i >= self.field.len {
            return None;
        }
        let bit = self.field.get(self.i).ok()?;
        self.i += 1;
        Some(bit)
    }
}

impl<T: BitfieldBehaviour> PartialEq for Bitfield<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bytes == other.bytes
    }
}
impl<T: BitfieldBehaviour> Eq for Bitfield<T> {}

impl<N: Unsigned> ssz::Encode for Bitfield<Variable<N>> {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn ssz_bytes_len(&self) -> usize {
        byte_len(self.len + 1)
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.as_ssz_bytes_inner());
    }
}

impl<N: Unsigned> ssz::Decode for Bitfield<Variable<N>> {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_ssz_bytes_inner(bytes)
    }
}

impl<N: Unsigned> ssz::Encode for Bitfield<Fixed<N>> {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        byte_len(N::to_usize())
    }

    fn ssz_bytes_len(&self) -> usize {
        byte_len(N::to_usize())
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.as_ssz_bytes_inner());
    }
}

impl<N: Unsigned> ssz::Decode for Bitfield<Fixed<N>> {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        byte_len(N::to_usize())
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_ssz_bytes_inner(bytes)
    }
}

impl<N: Unsigned> tree_hash::TreeHash for Bitfield<Variable<N>> {
    fn tree_hash_type() -> tree_hash::TreeHashType {
        tree_hash::TreeHashType::List
    }

    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("Bitlist is never itself packed")
    }

    fn tree_hash_packing_factor() -> usize {
        unreachable!("Bitlist is never itself packed")
    }

    fn tree_hash_root(&self) -> ethereum_types::H256 {
        let min_leaves = (N::to_usize() + 255) / 256;
        let root = tree_hash::merkleize_padded(&self.bytes, min_leaves);
        tree_hash::mix_in_length(&root, self.len)
    }
}

impl<N: Unsigned> tree_hash::TreeHash for Bitfield<Fixed<N>> {
    fn tree_hash_type() -> tree_hash::TreeHashType {
        tree_hash::TreeHashType::Vector
    }

    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("Bitvector is never itself packed")
    }

    fn tree_hash_packing_factor() -> usize {
        unreachable!("Bitvector is never itself packed")
    }

    fn tree_hash_root(&self) -> ethereum_types::H256 {
        let min_leaves = (N::to_usize() + 255) / 256;
        ethereum_types::H256::from_slice(&tree_hash::merkleize_padded(&self.bytes, min_leaves))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typenum::U8;

    #[test]
    fn set_get_roundtrip() {
        let mut b = Bitfield::<Variable<U8>>::with_capacity(8).unwrap();
        b.set(3, true).unwrap();
        assert!(b.get(3).unwrap());
        assert!(!b.get(4).unwrap());
        assert_eq!(b.num_set_bits(), 1);
    }

    #[test]
    fn bitlist_ssz_roundtrip() {
        let mut b = Bitfield::<Variable<U8>>::with_capacity(5).unwrap();
        b.set(0, true).unwrap();
        b.set(4, true).unwrap();
        let bytes = ssz::Encode::as_ssz_bytes(&b);
        let decoded = Bitfield::<Variable<U8>>::from_ssz_bytes_inner(&bytes).unwrap();
        assert_eq!(b, decoded);
    }

    #[test]
    fn bitvector_ssz_roundtrip() {
        let mut b = Bitfield::<Fixed<U8>>::new();
        b.set(7, true).unwrap();
        let bytes = b.as_ssz_bytes_inner();
        let decoded = Bitfield::<Fixed<U8>>::from_ssz_bytes_inner(&bytes).unwrap();
        assert_eq!(b, decoded);
    }

    #[test]
    fn union_is_bitwise_or() {
        let mut a = Bitfield::<Variable<U8>>::with_capacity(4).unwrap();
        let mut b = Bitfield::<Variable<U8>>::with_capacity(4).unwrap();
        a.set(0, true).unwrap();
        b.set(1, true).unwrap();
        let u = a.union(&b);
        assert!(u.get(0).unwrap());
        assert!(u.get(1).unwrap());
        assert!(!u.get(2).unwrap());
    }
}
