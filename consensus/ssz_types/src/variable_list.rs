use crate::Error;
use serde_derive::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice::SliceIndex;
use typenum::Unsigned;

/// A homogeneous list with a maximum length fixed at the type level by `N`.
///
/// Mirrors the SSZ `List[T, N]` type: bounded, but its current length may be anything from zero
/// up to `N`. Exceeding the bound at construction time is a value-level error rather than a
/// panic, since the bound is frequently chosen by a runtime `ChainSpec` constant even though it
/// is encoded as a type parameter here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableList<T, N> {
    vec: Vec<T>,
    #[serde(skip)]
    _phantom: PhantomData<N>,
}

impl<T, N: Unsigned> VariableList<T, N> {
    pub fn new(vec: Vec<T>) -> Result<Self, Error> {
        if vec.len() <= N::to_usize() {
            Ok(Self {
                vec,
                _phantom: PhantomData,
            })
        } else {
            Err(Error::OutOfBounds {
                i: vec.len(),
                len: N::to_usize(),
            })
        }
    }

    pub fn empty() -> Self {
        Self {
            vec: vec![],
            _phantom: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    pub fn max_len() -> usize {
        N::to_usize()
    }

    pub fn push(&mut self, value: T) -> Result<(), Error> {
        if self.vec.len() < N::to_usize() {
            self.vec.push(value);
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                i: self.vec.len() + 1,
                len: N::to_usize(),
            })
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.vec
    }

    pub fn into_vec(self) -> Vec<T> {
        self.vec
    }

    pub fn iter(&self) -> std::slice::Iter<T> {
        self.vec.iter()
    }
}

impl<T, N: Unsigned> From<Vec<T>> for VariableList<T, N> {
    /// Truncates `vec` to `N` elements if it exceeds the bound, mirroring the lenient
    /// `From` conversions used throughout SSZ containers (explicit construction via `new`
    /// should be preferred wherever an over-long input is an error condition).
    fn from(mut vec: Vec<T>) -> Self {
        vec.truncate(N::to_usize());
        Self {
            vec,
            _phantom: PhantomData,
        }
    }
}

impl<T, N> Default for VariableList<T, N> {
    fn default() -> Self {
        Self {
            vec: vec![],
            _phantom: PhantomData,
        }
    }
}

impl<T: PartialEq, N> PartialEq for VariableList<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.vec == other.vec
    }
}
impl<T: Eq, N> Eq for VariableList<T, N> {}

impl<T, N> Deref for VariableList<T, N> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        &self.vec
    }
}

impl<T, N> DerefMut for VariableList<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.vec
    }
}

impl<T, N, I: SliceIndex<[T]>> Index<I> for VariableList<T, N> {
    type Output = I::Output;
    fn index(&self, index: I) -> &Self::Output {
        &self.vec[index]
    }
}

impl<T, N, I: SliceIndex<[T]>> IndexMut<I> for VariableList<T, N> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.vec[index]
    }
}

impl<T, N> IntoIterator for VariableList<T, N> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.vec.into_iter()
    }
}

impl<'a, T, N> IntoIterator for &'a VariableList<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.vec.iter()
    }
}

impl<T: ssz::Encode, N: Unsigned> ssz::Encode for VariableList<T, N> {
    fn is_ssz_fixed_len() -> bool {
        false
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

impl<T: ssz::Decode, N: Unsigned> ssz::Decode for VariableList<T, N> {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
        let vec = if bytes.is_empty() {
            vec![]
        } else if T::is_ssz_fixed_len() {
            let item_len = T::ssz_fixed_len();
            if bytes.len() % item_len != 0 {
                return Err(ssz::DecodeError::SchemaMismatch {
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
                .collect::<Result<Vec<_>, _>>()?
        } else {
            ssz::decode_variable_list::<T>(bytes)?
        };

        if vec.len() > N::to_usize() {
            return Err(ssz::DecodeError::LengthExceedsBound {
                len: vec.len(),
                max: N::to_usize(),
            });
        }

        Ok(Self {
            vec,
            _phantom: PhantomData,
        })
    }
}
