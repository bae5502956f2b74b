use super::BYTES_PER_LENGTH_OFFSET;

/// Trait implemented by every SSZ-encodable type.
///
/// Fixed-length types (`is_ssz_fixed_len() == true`) always append exactly
/// `ssz_fixed_len()` bytes. Variable-length types append their full
/// variable-length encoding; it is the *container's* job (generated by
/// `ssz_derive`, or `SszEncoder` below) to instead write a 4-byte offset
/// inline and defer the variable bytes to the container's variable region.
pub trait Encode {
    fn is_ssz_fixed_len() -> bool;

    fn ssz_fixed_len() -> usize
    where
        Self: Sized,
    {
        BYTES_PER_LENGTH_OFFSET
    }

    /// `ssz_fixed_len()` if `Self` is fixed-length, else `default`. Used by
    /// derived container impls to size the fixed region without a `usize`
    /// conditional at every callsite.
    fn ssz_fixed_len_or(default: usize) -> usize
    where
        Self: Sized,
    {
        if Self::is_ssz_fixed_len() {
            Self::ssz_fixed_len()
        } else {
            default
        }
    }

    /// Length of `self`'s SSZ encoding, in bytes.
    fn ssz_bytes_len(&self) -> usize;

    /// Append `self`'s SSZ encoding onto `buf`.
    fn ssz_append(&self, buf: &mut Vec<u8>);

    fn as_ssz_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.ssz_bytes_len());
        self.ssz_append(&mut buf);
        buf
    }
}

/// Builds a container's encoding by interleaving the fixed region (values,
/// or 4-byte offsets for variable fields) with the variable region.
/// `ssz_derive` emits calls into this for every `#[derive(Encode)]` struct.
pub struct SszEncoder<'a> {
    offset: usize,
    fixed: Vec<u8>,
    variable: Vec<u8>,
    _buf: &'a mut Vec<u8>,
}

impl<'a> SszEncoder<'a> {
    pub fn container(buf: &'a mut Vec<u8>, num_fixed_bytes: usize) -> Self {
        Self {
            offset: num_fixed_bytes,
            fixed: Vec::with_capacity(num_fixed_bytes),
            variable: vec![],
            _buf: buf,
        }
    }

    pub fn append<T: Encode>(&mut self, value: &T) {
        if T::is_ssz_fixed_len() {
            value.ssz_append(&mut self.fixed);
        } else {
            self.fixed
                .extend_from_slice(&(self.offset as u32).to_le_bytes());
            let before = self.variable.len();
            value.ssz_append(&mut self.variable);
            self.offset += self.variable.len() - before;
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        let mut out = self.fixed;
        out.extend_from_slice(&self.variable);
        out
    }
}

macro_rules! impl_encodable_for_uint {
    ($type: ident, $bit_size: expr) => {
        impl Encode for $type {
            fn is_ssz_fixed_len() -> bool {
                true
            }

            fn ssz_fixed_len() -> usize {
                $bit_size / 8
            }

            fn ssz_bytes_len(&self) -> usize {
                $bit_size / 8
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(&self.to_le_bytes());
            }
        }
    };
}

impl_encodable_for_uint!(u8, 8);
impl_encodable_for_uint!(u16, 16);
impl_encodable_for_uint!(u32, 32);
impl_encodable_for_uint!(u64, 64);
impl_encodable_for_uint!(u128, 128);

impl Encode for bool {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        1
    }

    fn ssz_bytes_len(&self) -> usize {
        1
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.push(*self as u8);
    }
}

/// `usize` is encoded as a `u64` (never as a native-width integer) so wire
/// encodings don't depend on the host architecture.
impl Encode for usize {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        8
    }

    fn ssz_bytes_len(&self) -> usize {
        8
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&(*self as u64).to_le_bytes());
    }
}

/// A homogeneous list with no declared maximum: the SSZ "List" type without
/// a bound. `ssz_types::VariableList` wraps this and enforces `N`.
impl<T: Encode> Encode for Vec<T> {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn ssz_bytes_len(&self) -> usize {
        if T::is_ssz_fixed_len() {
            self.len() * T::ssz_fixed_len()
        } else {
            self.iter()
                .map(|item| item.ssz_bytes_len() + BYTES_PER_LENGTH_OFFSET)
                .sum()
        }
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        if T::is_ssz_fixed_len() {
            for item in self {
                item.ssz_append(buf);
            }
        } else {
            let mut encoder = SszEncoder::container(buf, self.len() * BYTES_PER_LENGTH_OFFSET);
            for item in self {
                encoder.append(item);
            }
            buf.extend_from_slice(&encoder.finalize());
        }
    }
}

macro_rules! impl_encode_for_byte_array {
    ($len: expr) => {
        impl Encode for [u8; $len] {
            fn is_ssz_fixed_len() -> bool {
                true
            }

            fn ssz_fixed_len() -> usize {
                $len
            }

            fn ssz_bytes_len(&self) -> usize {
                $len
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(&self[..]);
            }
        }
    };
}

impl_encode_for_byte_array!(4);
impl_encode_for_byte_array!(32);
impl_encode_for_byte_array!(48);
impl_encode_for_byte_array!(96);
