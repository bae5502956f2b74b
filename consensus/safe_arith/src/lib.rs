//! Checked arithmetic for the state-transition function.
//!
//! Plain `+`/`-`/`*` on slots, epochs, shards and balances is banned in
//! `state_processing`: every operation must go through `SafeArith` so
//! overflow/underflow is an explicit, propagated `ArithError` rather than a
//! silent wrap (which would be a consensus bug) or an uncatchable panic
//! (which would crash the writer on adversarial input).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithError {
    Overflow,
    Underflow,
    DivisionByZero,
}

impl fmt::Display for ArithError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArithError::Overflow => write!(f, "arithmetic overflow"),
            ArithError::Underflow => write!(f, "arithmetic underflow"),
            ArithError::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

impl std::error::Error for ArithError {}

pub trait SafeArith<Rhs = Self>: Sized + Copy {
    const ZERO: Self;
    const ONE: Self;

    fn safe_add(&self, other: Rhs) -> Result<Self, ArithError>;
    fn safe_sub(&self, other: Rhs) -> Result<Self, ArithError>;
    fn safe_mul(&self, other: Rhs) -> Result<Self, ArithError>;
    fn safe_div(&self, other: Rhs) -> Result<Self, ArithError>;
    fn safe_rem(&self, other: Rhs) -> Result<Self, ArithError>;

    fn safe_add_assign(&mut self, other: Rhs) -> Result<(), ArithError> {
        *self = self.safe_add(other)?;
        Ok(())
    }

    fn safe_sub_assign(&mut self, other: Rhs) -> Result<(), ArithError> {
        *self = self.safe_sub(other)?;
        Ok(())
    }
}

macro_rules! impl_safe_arith {
    ($type: ty) => {
        impl SafeArith for $type {
            const ZERO: Self = 0;
            const ONE: Self = 1;

            fn safe_add(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_add(other).ok_or(ArithError::Overflow)
            }

            fn safe_sub(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_sub(other).ok_or(ArithError::Underflow)
            }

            fn safe_mul(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_mul(other).ok_or(ArithError::Overflow)
            }

            fn safe_div(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_div(other).ok_or(ArithError::DivisionByZero)
            }

            fn safe_rem(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_rem(other).ok_or(ArithError::DivisionByZero)
            }
        }
    };
}

impl_safe_arith!(u64);
impl_safe_arith!(u32);
impl_safe_arith!(u16);
impl_safe_arith!(u8);
impl_safe_arith!(usize);

/// Saturating `Gwei` arithmetic: balance accounting must never wrap, and rather than fail the
/// block it saturates at `u64::MAX`/`0` the way the protocol's reference implementations do.
pub trait SaturatingGweiArith: Sized + Copy {
    fn saturating_add_gwei(&self, other: Self) -> Self;
    fn saturating_sub_gwei(&self, other: Self) -> Self;
}

impl SaturatingGweiArith for u64 {
    fn saturating_add_gwei(&self, other: Self) -> Self {
        self.saturating_add(other)
    }

    fn saturating_sub_gwei(&self, other: Self) -> Self {
        self.saturating_sub(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_overflow() {
        assert_eq!(u64::MAX.safe_add(1), Err(ArithError::Overflow));
    }

    #[test]
    fn sub_underflow() {
        assert_eq!(0u64.safe_sub(1), Err(ArithError::Underflow));
    }

    #[test]
    fn div_by_zero() {
        assert_eq!(1u64.safe_div(0), Err(ArithError::DivisionByZero));
    }

    #[test]
    fn gwei_saturates() {
        assert_eq!(u64::MAX.saturating_add_gwei(10), u64::MAX);
        assert_eq!(0u64.saturating_sub_gwei(10), 0);
    }
}
