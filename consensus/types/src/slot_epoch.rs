use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Rem, Sub, SubAssign};

/// `Slot` and `Epoch` are tuple structs, so they bypass `ssz_derive`/`tree_hash_derive` (which
/// only target named-field structs) in favour of a direct delegation to `u64`'s own impls.
macro_rules! impl_newtype_u64 {
    ($name: ident) => {
        #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl ssz::Encode for $name {
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
                self.0.ssz_append(buf)
            }
        }

        impl ssz::Decode for $name {
            fn is_ssz_fixed_len() -> bool {
                true
            }
            fn ssz_fixed_len() -> usize {
                8
            }
            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
                u64::from_ssz_bytes(bytes).map(Self)
            }
        }

        impl tree_hash::TreeHash for $name {
            fn tree_hash_type() -> tree_hash::TreeHashType {
                tree_hash::TreeHashType::Basic
            }
            fn tree_hash_packed_encoding(&self) -> Vec<u8> {
                self.0.tree_hash_packed_encoding()
            }
            fn tree_hash_packing_factor() -> usize {
                u64::tree_hash_packing_factor()
            }
            fn tree_hash_root(&self) -> ethereum_types::H256 {
                self.0.tree_hash_root()
            }
        }

        impl $name {
            pub fn new(n: u64) -> Self {
                Self(n)
            }

            pub fn as_u64(self) -> u64 {
                self.0
            }

            pub fn as_usize(self) -> usize {
                self.0 as usize
            }

            pub fn saturating_sub(self, other: Self) -> Self {
                Self(self.0.saturating_sub(other.0))
            }

            pub fn saturating_add(self, other: Self) -> Self {
                Self(self.0.saturating_add(other.0))
            }

            pub fn checked_sub(self, other: Self) -> Option<Self> {
                self.0.checked_sub(other.0).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self(n)
            }
        }

        impl From<$name> for u64 {
            fn from(n: $name) -> u64 {
                n.0
            }
        }

        impl Add<u64> for $name {
            type Output = Self;
            fn add(self, rhs: u64) -> Self {
                Self(self.0 + rhs)
            }
        }

        impl Add<$name> for $name {
            type Output = Self;
            fn add(self, rhs: $name) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign<u64> for $name {
            fn add_assign(&mut self, rhs: u64) {
                self.0 += rhs;
            }
        }

        impl Sub<u64> for $name {
            type Output = Self;
            fn sub(self, rhs: u64) -> Self {
                Self(self.0 - rhs)
            }
        }

        impl Sub<$name> for $name {
            type Output = Self;
            fn sub(self, rhs: $name) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl SubAssign<u64> for $name {
            fn sub_assign(&mut self, rhs: u64) {
                self.0 -= rhs;
            }
        }

        impl Mul<u64> for $name {
            type Output = Self;
            fn mul(self, rhs: u64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Div<u64> for $name {
            type Output = Self;
            fn div(self, rhs: u64) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl Rem<u64> for $name {
            type Output = Self;
            fn rem(self, rhs: u64) -> Self {
                Self(self.0 % rhs)
            }
        }

        impl PartialEq<u64> for $name {
            fn eq(&self, other: &u64) -> bool {
                self.0 == *other
            }
        }
    };
}

impl_newtype_u64!(Slot);
impl_newtype_u64!(Epoch);

impl Slot {
    pub fn epoch(self, slots_per_epoch: u64) -> Epoch {
        Epoch::new(self.0 / slots_per_epoch)
    }

    pub fn is_epoch_start(self, slots_per_epoch: u64) -> bool {
        self.0 % slots_per_epoch == 0
    }
}

impl Epoch {
    pub fn start_slot(self, slots_per_epoch: u64) -> Slot {
        Slot::new(self.0 * slots_per_epoch)
    }

    pub fn end_slot(self, slots_per_epoch: u64) -> Slot {
        Slot::new((self.0 + 1) * slots_per_epoch - 1)
    }

    /// `FAR_FUTURE_EPOCH`: the sentinel used for "not yet scheduled".
    pub const fn max_value() -> Self {
        Self(u64::max_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_of_slot() {
        assert_eq!(Slot::new(63).epoch(64), Epoch::new(0));
        assert_eq!(Slot::new(64).epoch(64), Epoch::new(1));
    }

    #[test]
    fn start_slot_of_epoch() {
        assert_eq!(Epoch::new(2).start_slot(64), Slot::new(128));
    }
}
