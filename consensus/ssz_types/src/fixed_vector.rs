use crate::Error;
use serde_derive::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice::SliceIndex;
use typenum::Unsigned;

/// A homogeneous vector whose length is fixed, at the type level, to `N`.
///
/// Mirrors the SSZ `Vector[T, N]` type: every instance has exactly `N` elements, so its
/// `hash_tree_root` never mixes in a length.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedVector<T, N> {
    vec: Vec<T>,
    #[serde(skip)]
    _phantom: PhantomData<N>,
}

impl<T, N: Unsigned> FixedVector<T, N> {
    pub fn new(vec: Vec<T>) -> Result<Self, Error> {
        if vec.len() == N::to_usize() {
            Ok(Self {
                vec,
                _phantom: PhantomData,
            })
        } else {
            Err(Error::InvalidLength {
                i: vec.len(),
                len: N::to_usize(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    pub fn capacity() -> usize {
        N::to_usize()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.vec
    }

    pub fn into_vec(self) -> Vec<T> {
        self.vec
    }
}

impl<T: Default + Clone, N: Unsigned> FixedVector<T, N> {
    pub fn from_elem(elem: T) -> Self {
        Self {
            vec: vec![elem; N::to_usize()],
            _phantom: PhantomData,
        }
    }
}

impl<T: Default, N: Unsigned> From<Vec<T>> for FixedVector<T, N> {
    /// Pads with `T::default()` if `vec` is shorter than `N`, truncates if longer.
    fn from(mut vec: Vec<T>) -> Self {
        vec.resize_with(N::to_usize(), T::default);
        Self {
            vec,
            _phantom: PhantomData,
        }
    }
}

impl<T: PartialEq, N> PartialEq for FixedVector<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.vec == other.vec
    }
}
impl<T: Eq, N> Eq for FixedVector<T, N> {}

impl<T, N> Deref for FixedVector<T, N> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        &self.vec
    }
}

impl<T, N> DerefMut for FixedVector<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.vec
    }
}

impl<T, N, I: SliceIndex<[T]>> Index<I> for FixedVector<T, N> {
    type Output = I::Output;
    fn index(&self, index: I) -> &Self::Output {
        &self.vec[index]
    }
}

impl<T, N, I: SliceIndex<[T]>> IndexMut<I> for FixedVector<T, N> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.vec[index]
    }
}

impl<T, N> IntoIterator for FixedVector<T, N> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.vec.into_iter()
    }
}

impl<'a, T, N> IntoIterator for &'a FixedVector<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.vec.iter()
    }
}

impl<T: ssz::Encode, N: Unsigned> ssz::Encode for FixedVector<T, N> {
    fn is_ssz_fixed_len() -> bool {
        T::is_ssz_fixed_len()
    }

    fn ssz_fixed_len() -> usize {
        if T::is_ssz_fixed_len() {
            T::ssz_fixed_len() * N::to_usize()
        } else {
            ssz::BYTES_PER_LENGTH_OFFSET
        }
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        if T::is_ssz_fixed_len() {
            for item in &self.vec {
                item.ssz_append(buf);
            }
        } else {
            let mut encoder =
                ssz::SszEncoder::container(buf, self.vec.len() * ssz::BYTES_PER_LENGTH_OFFSET);
            for item in &self.vec {
                encoder.append(item);
            }
            buf.extend_from_slice(&encoder.finalize());
        }
    }

    fn ssz_bytes_len(&self) -> usize {
        if T::is_ssz_fixed_len() {
            self.vec.len() * T::ssz_fixed_len()
        } else {
            self.vec.iter().map(|item| item.ssz_bytes_len()).sum::<usize>()
                + self.vec.len() * ssz::BYTES_PER_LENGTH_OFFSET
        }
    }
}

impl<T: ssz::Decode, N: Unsigned> ssz::Decode for FixedVector<T, N> {
    fn is_ssz_fixed_len() -> bool {
        T::is_ssz_fixed_len()
    }

    fn ssz_fixed_len() -> usize {
        if T::is_ssz_fixed_len() {
            T::ssz_fixed_len() * N::to_usize()
        } else {
            ssz::BYTES_PER_LENGTH_OFFSET
        }
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
        let vec = if T::is_ssz_fixed_len() {
            let item_len = T::ssz_fixed_len();
            if bytes.len() != item_len * N::to_usize() {
                return Err(ssz::DecodeError::SchemaMismatch {
                    msg: format!(
                        "expected {} bytes for a {}-element vector, got {}",
                        item_len * N::to_usize(),
                        N::to_usize(),
                        bytes.len()
                    ),
                });
            }
            bytes
                .chunks(item_len.max(1))
                .map(T::from_ssz_bytes)
                .collect::<Result<Vec<_>, _>>()?
        } else if bytes.is_empty() && N::to_usize() == 0 {
            vec![]
        } else {
            ssz::decode_variable_list::<T>(bytes)?
        };

        if vec.len() != N::to_usize() {
            return Err(ssz::DecodeError::SchemaMismatch {
                msg: format!(
                    "expected {} elements, decoded {}",
                    N::to_usize(),
                    vec.len()
                ),
            });
        }

        Ok(Self {
            vec,
            _phantom: PhantomData,
        })
    }
}
