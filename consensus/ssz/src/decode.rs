use super::BYTES_PER_LENGTH_OFFSET;
use std::fmt;

/// Returned whenever SSZ decoding fails, plus a few catch-alls for decoders
/// that compose (containers, derive-generated code).
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The value's static schema (fixed length, or variable-offset shape)
    /// did not match what the bytes actually contained.
    SchemaMismatch { msg: String },
    /// Ran out of bytes before a fixed-length field or offset could be read.
    UnexpectedEof,
    /// An offset pointed to a byte index outside its enclosing variable
    /// region, or offsets were not monotonically non-decreasing.
    OffsetOutOfRange { offset: usize, max: usize },
    /// A decoded length (list/bitlist length, union selector, ...) exceeded
    /// the declared maximum for the type.
    LengthExceedsBound { len: usize, max: usize },
    /// A `Bitlist` was missing its trailing delimiter bit.
    MissingDelimiter,
    /// There were bytes left over after a fixed-length value was fully decoded.
    TrailingBytes,
    /// Catch-all for malformed bytes that don't fit the other categories.
    BytesInvalid(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::SchemaMismatch { msg } => write!(f, "schema mismatch: {}", msg),
            DecodeError::UnexpectedEof => write!(f, "unexpected end of SSZ bytes"),
            DecodeError::OffsetOutOfRange { offset, max } => {
                write!(f, "offset {} out of range (max {})", offset, max)
            }
            DecodeError::LengthExceedsBound { len, max } => {
                write!(f, "length {} exceeds bound {}", len, max)
            }
            DecodeError::MissingDelimiter => write!(f, "bitlist missing trailing delimiter bit"),
            DecodeError::TrailingBytes => write!(f, "trailing bytes after decoding fixed value"),
            DecodeError::BytesInvalid(msg) => write!(f, "invalid SSZ bytes: {}", msg),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Trait implemented by every SSZ-decodable type. Mirrors `Encode` in
/// shape: fixed-length types decode from an exact-length slice, variable
/// types decode from the whole remaining buffer (their own length is
/// implicit in the slice length, or came from an offset computed by the
/// enclosing container).
pub trait Decode: Sized {
    fn is_ssz_fixed_len() -> bool;

    /// Length of the fixed-size portion, in bytes. Equal to
    /// `BYTES_PER_LENGTH_OFFSET` for variable-length types (the offset
    /// itself is what's "fixed" about them from the container's view).
    fn ssz_fixed_len() -> usize {
        BYTES_PER_LENGTH_OFFSET
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError>;
}

/// Splits a container's raw bytes into its per-field slices, handling the
/// fixed/variable offset-table scheme, then hands each slice to the field's
/// `Decode` impl. The `ssz_derive` macro
/// emits calls into this builder; it is also usable directly for hand-rolled
/// container decoders (enums, unions).
pub struct SszDecoderBuilder<'a> {
    bytes: &'a [u8],
    fixed_bytes_len: usize,
    is_fixed: Vec<bool>,
}

impl<'a> SszDecoderBuilder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            fixed_bytes_len: 0,
            is_fixed: vec![],
        }
    }

    /// Declare the next field of the container as type `T`. Must be called
    /// in the container's field order.
    pub fn register_type<T: Decode>(&mut self) -> Result<(), DecodeError> {
        self.is_fixed.push(T::is_ssz_fixed_len());
        if T::is_ssz_fixed_len() {
            self.fixed_bytes_len += T::ssz_fixed_len();
        } else {
            self.fixed_bytes_len += BYTES_PER_LENGTH_OFFSET;
        }
        Ok(())
    }

    /// Resolve every registered field into a byte slice, validating offset
    /// monotonicity and bounds. Must be called after all `register_type`
    /// calls and before any `decode_next`.
    pub fn build(self) -> Result<SszDecoder<'a>, DecodeError> {
        if self.bytes.len() < self.fixed_bytes_len {
            return Err(DecodeError::UnexpectedEof);
        }

        let mut fixed_cursor = 0;
        let mut offset_positions = vec![];

        for fixed in &self.is_fixed {
            if *fixed {
                offset_positions.push(None);
            } else {
                let offset_bytes = self
                    .bytes
                    .get(fixed_cursor..fixed_cursor + BYTES_PER_LENGTH_OFFSET)
                    .ok_or(DecodeError::UnexpectedEof)?;
                let offset = read_offset(offset_bytes);
                offset_positions.push(Some(offset));
                fixed_cursor += BYTES_PER_LENGTH_OFFSET;
            }
        }

        // offsets, in declared order, must be monotonically non-decreasing
        // and within [fixed_bytes_len, bytes.len()].
        let mut last_offset = self.fixed_bytes_len;
        let mut resolved_offsets = vec![];
        for maybe in &offset_positions {
            if let Some(offset) = maybe {
                if *offset < last_offset || *offset > self.bytes.len() {
                    return Err(DecodeError::OffsetOutOfRange {
                        offset: *offset,
                        max: self.bytes.len(),
                    });
                }
                last_offset = *offset;
                resolved_offsets.push(*offset);
            }
        }
        resolved_offsets.push(self.bytes.len());

        Ok(SszDecoder {
            bytes: self.bytes,
            fixed_cursor: 0,
            var_index: 0,
            offsets: resolved_offsets,
            field_is_fixed: self.is_fixed,
        })
    }
}

pub struct SszDecoder<'a> {
    bytes: &'a [u8],
    fixed_cursor: usize,
    var_index: usize,
    offsets: Vec<usize>,
    field_is_fixed: Vec<bool>,
}

impl<'a> SszDecoder<'a> {
    /// Decode the next declared field as `T`.
    pub fn decode_next<T: Decode>(&mut self) -> Result<T, DecodeError> {
        let is_fixed = self
            .field_is_fixed
            .get(self.var_index)
            .copied()
            .ok_or_else(|| DecodeError::SchemaMismatch {
                msg: "decode_next called more times than registered fields".into(),
            })?;

        let value = if is_fixed {
            let len = T::ssz_fixed_len();
            let slice = self
                .bytes
                .get(self.fixed_cursor..self.fixed_cursor + len)
                .ok_or(DecodeError::UnexpectedEof)?;
            self.fixed_cursor += len;
            T::from_ssz_bytes(slice)?
        } else {
            // find which variable slot this is: count how many variable
            // fields have been consumed so far.
            let var_slot = self.field_is_fixed[..self.var_index]
                .iter()
                .filter(|f| !**f)
                .count();
            let start = self.offsets[var_slot];
            let end = self.offsets[var_slot + 1];
            let slice = self.bytes.get(start..end).ok_or(DecodeError::UnexpectedEof)?;
            T::from_ssz_bytes(slice)?
        };

        self.var_index += 1;
        Ok(value)
    }
}

fn read_offset(bytes: &[u8]) -> usize {
    let mut arr = [0u8; 4];
    arr.copy_from_slice(bytes);
    u32::from_le_bytes(arr) as usize
}

/// Decode a SSZ `Bitlist`: little-endian bytes with a trailing delimiter
/// bit. Returns the logical bit length (excluding the delimiter) and the
/// raw data bytes (delimiter bit cleared conceptually by the caller).
pub fn decode_bitlist_bytes(bytes: &[u8], max_len: usize) -> Result<(usize, Vec<u8>), DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::MissingDelimiter);
    }
    let last_byte = *bytes.last().unwrap();
    if last_byte == 0 {
        return Err(DecodeError::MissingDelimiter);
    }
    let highest_bit = 7 - last_byte.leading_zeros() as usize;
    let len = (bytes.len() - 1) * 8 + highest_bit;
    if len > max_len {
        return Err(DecodeError::LengthExceedsBound { len, max: max_len });
    }
    Ok((len, bytes.to_vec()))
}
