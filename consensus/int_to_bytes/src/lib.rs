//! Simple integer <-> little-endian byte conversions used throughout the SSZ
//! and shuffling code. Kept as a standalone crate because it has no other
//! dependencies and is imported by almost everything else in the workspace.

use bytes::{BufMut, BytesMut};

/// Returns `int` as little-endian bytes with a length of 1.
pub fn int_to_bytes1(int: u8) -> Vec<u8> {
    vec![int]
}

/// Returns `int` as little-endian bytes with a length of 2.
pub fn int_to_bytes2(int: u16) -> Vec<u8> {
    let mut bytes = BytesMut::with_capacity(2);
    bytes.put_u16_le(int);
    bytes.to_vec()
}

/// Returns `int` as little-endian bytes with a length of 4.
pub fn int_to_bytes4(int: u32) -> Vec<u8> {
    let mut bytes = BytesMut::with_capacity(4);
    bytes.put_u32_le(int);
    bytes.to_vec()
}

/// Returns `int` as little-endian bytes with a length of 8.
pub fn int_to_bytes8(int: u64) -> Vec<u8> {
    let mut bytes = BytesMut::with_capacity(8);
    bytes.put_u64_le(int);
    bytes.to_vec()
}

/// Returns `int` as little-endian bytes with a length of 32.
pub fn int_to_bytes32(int: u64) -> Vec<u8> {
    let mut bytes = vec![0; 32];
    bytes[0..8].copy_from_slice(&int_to_bytes8(int));
    bytes
}

/// Returns `int` as little-endian bytes with a length of 48.
pub fn int_to_bytes48(int: u64) -> Vec<u8> {
    let mut bytes = vec![0; 48];
    bytes[0..8].copy_from_slice(&int_to_bytes8(int));
    bytes
}

/// Returns a `u64` by reading the first 8 bytes of `bytes` as a little-endian integer.
pub fn bytes_to_int8(bytes: &[u8]) -> u64 {
    let mut array = [0; 8];
    array.copy_from_slice(&bytes[0..8]);
    u64::from_le_bytes(array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_u64() {
        let x: u64 = 0x0102_0304_0506_0708;
        let bytes = int_to_bytes8(x);
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes_to_int8(&bytes), x);
    }

    #[test]
    fn fixed_widths() {
        assert_eq!(int_to_bytes1(7).len(), 1);
        assert_eq!(int_to_bytes2(7).len(), 2);
        assert_eq!(int_to_bytes4(7).len(), 4);
        assert_eq!(int_to_bytes32(7).len(), 32);
        assert_eq!(int_to_bytes48(7).len(), 48);
    }
}
