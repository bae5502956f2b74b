//! SimpleSerialize (SSZ): the canonical byte-level encoding used for every
//! wire message and for hashing. This crate implements the
//! `Encode`/`Decode` traits and the basic-type impls; `ssz_derive` generates
//! container impls from struct definitions; `ssz_types` builds the bounded
//! collection types (`VariableList`, `FixedVector`, `BitList`, `BitVector`)
//! on top of this crate.

mod decode;
mod encode;

pub use decode::{decode_bitlist_bytes, Decode, DecodeError, SszDecoder, SszDecoderBuilder};
pub use encode::{Encode, SszEncoder};

use ethereum_types::H256;

/// Every variable-length field contributes exactly this many bytes to a
/// container's fixed region, holding the little-endian offset of where its
/// variable-length encoding begins.
pub const BYTES_PER_LENGTH_OFFSET: usize = 4;
pub const MAX_LENGTH_VALUE: usize = (1 << (BYTES_PER_LENGTH_OFFSET * 8)) - 1;

/// Shortcut for `value.as_ssz_bytes()`.
pub fn ssz_encode<T: Encode>(value: &T) -> Vec<u8> {
    value.as_ssz_bytes()
}

impl Decode for u8 {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        1
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() > 1 {
            return Err(DecodeError::TrailingBytes);
        }
        if bytes.len() < 1 {
            return Err(DecodeError::SchemaMismatch {
                msg: format!("expected 1 byte for u8, got {}", bytes.len()),
            });
        }
        Ok(bytes[0])
    }
}

impl Decode for bool {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        1
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        match bytes {
            [0] => Ok(false),
            [1] => Ok(true),
            [_] => Err(DecodeError::BytesInvalid("bool byte must be 0 or 1".into())),
            _ if bytes.len() > 1 => Err(DecodeError::TrailingBytes),
            _ => Err(DecodeError::SchemaMismatch {
                msg: format!("expected 1 byte for bool, got {}", bytes.len()),
            }),
        }
    }
}

macro_rules! impl_decodable_for_uint {
    ($type: ident, $bit_size: expr) => {
        impl Decode for $type {
            fn is_ssz_fixed_len() -> bool {
                true
            }

            fn ssz_fixed_len() -> usize {
                $bit_size / 8
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
                let len = $bit_size / 8;
                if bytes.len() > len {
                    return Err(DecodeError::TrailingBytes);
                }
                if bytes.len() < len {
                    return Err(DecodeError::SchemaMismatch {
                        msg: format!(
                            "expected {} bytes for {}, got {}",
                            len,
                            stringify!($type),
                            bytes.len()
                        ),
                    });
                }
                let mut arr = [0u8; $bit_size / 8];
                arr.copy_from_slice(bytes);
                Ok(Self::from_le_bytes(arr))
            }
        }
    };
}

impl_decodable_for_uint!(u16, 16);
impl_decodable_for_uint!(u32, 32);
impl_decodable_for_uint!(u64, 64);
impl_decodable_for_uint!(u128, 128);

impl Decode for usize {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        8
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(u64::from_ssz_bytes(bytes)? as usize)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.is_empty() {
            return Ok(vec![]);
        }

        if T::is_ssz_fixed_len() {
            let item_len = T::ssz_fixed_len();
            if bytes.len() % item_len != 0 {
                return Err(DecodeError::SchemaMismatch {
                    msg: format!(
                        "list byte length {} not a multiple of item length {}",
                        bytes.len(),
                        item_len
                    ),
                });
            }
            bytes
                .chunks(item_len)
                .map(T::from_ssz_bytes)
                .collect::<Result<Vec<_>, _>>()
        } else {
            decode_variable_list::<T>(bytes)
        }
    }
}

/// Shared by `Vec<T>` and `ssz_types::VariableList<T, N>`: split the
/// variable-length list encoding into offsets, validate monotonicity and
/// bounds, then decode each element's slice.
pub fn decode_variable_list<T: Decode>(bytes: &[u8]) -> Result<Vec<T>, DecodeError> {
    if bytes.is_empty() {
        return Ok(vec![]);
    }

    let first_offset = read_offset(bytes)?;
    if first_offset % BYTES_PER_LENGTH_OFFSET != 0 {
        return Err(DecodeError::SchemaMismatch {
            msg: "first offset not a multiple of the offset width".into(),
        });
    }
    let num_items = first_offset / BYTES_PER_LENGTH_OFFSET;

    let mut offsets = Vec::with_capacity(num_items + 1);
    let mut cursor = 0;
    for _ in 0..num_items {
        let offset = read_offset(&bytes[cursor..])?;
        offsets.push(offset);
        cursor += BYTES_PER_LENGTH_OFFSET;
    }
    offsets.push(bytes.len());

    let mut last = first_offset;
    for &offset in &offsets[1..offsets.len() - 1] {
        if offset < last || offset > bytes.len() {
            return Err(DecodeError::OffsetOutOfRange {
                offset,
                max: bytes.len(),
            });
        }
        last = offset;
    }
    if *offsets.last().unwrap() < last {
        return Err(DecodeError::OffsetOutOfRange {
            offset: *offsets.last().unwrap(),
            max: bytes.len(),
        });
    }

    (0..num_items)
        .map(|i| T::from_ssz_bytes(&bytes[offsets[i]..offsets[i + 1]]))
        .collect()
}

fn read_offset(bytes: &[u8]) -> Result<usize, DecodeError> {
    let slice = bytes
        .get(0..BYTES_PER_LENGTH_OFFSET)
        .ok_or(DecodeError::UnexpectedEof)?;
    let mut arr = [0u8; 4];
    arr.copy_from_slice(slice);
    Ok(u32::from_le_bytes(arr) as usize)
}

macro_rules! impl_decode_for_byte_array {
    ($len: expr) => {
        impl Decode for [u8; $len] {
            fn is_ssz_fixed_len() -> bool {
                true
            }
            fn ssz_fixed_len() -> usize {
                $len
            }
            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
                if bytes.len() > $len {
                    return Err(DecodeError::TrailingBytes);
                }
                if bytes.len() < $len {
                    return Err(DecodeError::SchemaMismatch {
                        msg: format!("expected {} bytes, got {}", $len, bytes.len()),
                    });
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(bytes);
                Ok(arr)
            }
        }
    };
}

impl_decode_for_byte_array!(4);
impl_decode_for_byte_array!(32);
impl_decode_for_byte_array!(48);
impl_decode_for_byte_array!(96);

impl Encode for H256 {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        32
    }
    fn ssz_bytes_len(&self) -> usize {
        32
    }
    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

impl Decode for H256 {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        32
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() > 32 {
            return Err(DecodeError::TrailingBytes);
        }
        if bytes.len() < 32 {
            return Err(DecodeError::SchemaMismatch {
                msg: format!("expected 32 bytes for H256, got {}", bytes.len()),
            });
        }
        Ok(H256::from_slice(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_u64() {
        let x = 0x0102_0304_0506_0708u64;
        let bytes = ssz_encode(&x);
        assert_eq!(bytes.len(), 8);
        assert_eq!(u64::from_ssz_bytes(&bytes).unwrap(), x);
    }

    #[test]
    fn round_trip_vec_of_u64() {
        let v: Vec<u64> = vec![1, 2, 3, u64::MAX];
        let bytes = ssz_encode(&v);
        assert_eq!(Vec::<u64>::from_ssz_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn round_trip_h256() {
        let h = H256::repeat_byte(7);
        let bytes = ssz_encode(&h);
        assert_eq!(H256::from_ssz_bytes(&bytes).unwrap(), h);
    }

    #[test]
    fn rejects_trailing_bytes_in_fixed_type() {
        let mut bytes = ssz_encode(&1u64);
        bytes.push(0);
        assert!(u64::from_ssz_bytes(&bytes).is_err());
    }

    #[test]
    fn decode_empty_list() {
        assert_eq!(Vec::<u64>::from_ssz_bytes(&[]).unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn rejects_offset_out_of_range() {
        // Two items: the first offset is valid (8, i.e. two 4-byte offset
        // slots), the second points far past the end of the buffer.
        let mut bytes = (8u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(&(1000u32).to_le_bytes());
        assert!(matches!(
            Vec::<Vec<u8>>::from_ssz_bytes(&bytes),
            Err(DecodeError::OffsetOutOfRange { .. })
        ));
    }
}
