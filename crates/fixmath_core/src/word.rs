//! Width-generic integer support.
//!
//! Every width-parameterized operation in the crate (CLS, multiply, inverse,
//! square root, narrowing) is written once against [`Word`]. Intermediate
//! arithmetic is carried out in `i128`, which is wide enough to hold the exact
//! product of two `i64` mantissas, so the per-width rounding and truncation
//! behaviour is identical to a dedicated implementation.

use core::fmt::Debug;
use num_traits::{PrimInt, Signed};

/// A signed two's-complement mantissa type.
pub trait Word: PrimInt + Signed + Debug + Default + 'static {
    /// Bit width of the type.
    const BITS: u32;
    /// Most negative value, as a wide integer.
    const MIN_WIDE: i128;
    /// Most positive value, as a wide integer.
    const MAX_WIDE: i128;

    /// Lossless widening.
    fn widen(self) -> i128;

    /// Narrow with clamping to `[MIN, MAX]`.
    fn saturate(v: i128) -> Self;

    /// Narrow with clamping to the symmetric range `[-MAX, MAX]`.
    #[inline]
    fn saturate_symmetric(v: i128) -> Self {
        Self::saturate(v.clamp(-Self::MAX_WIDE, Self::MAX_WIDE))
    }

    /// Narrow by discarding high bits.
    fn truncate(v: i128) -> Self;
}

macro_rules! impl_word {
    ($($t:ty),*) => {$(
        impl Word for $t {
            const BITS: u32 = <$t>::BITS;
            const MIN_WIDE: i128 = <$t>::MIN as i128;
            const MAX_WIDE: i128 = <$t>::MAX as i128;

            #[inline]
            fn widen(self) -> i128 {
                self as i128
            }

            #[inline]
            fn saturate(v: i128) -> Self {
                v.clamp(Self::MIN_WIDE, Self::MAX_WIDE) as $t
            }

            #[inline]
            fn truncate(v: i128) -> Self {
                v as $t
            }
        }
    )*};
}

impl_word!(i8, i16, i32, i64, i128);

/// Arithmetic right shift with round-half-up. Negative `shr` shifts left.
///
/// Shifts of 127 or more collapse to the sign-correct rounded limit (`0` for
/// any value that cannot reach half an output unit). A left shift that would
/// push bits past the sign saturates to `i128::MAX` or `i128::MIN`.
#[inline]
pub fn round_shr(v: i128, shr: i32) -> i128 {
    if shr <= 0 {
        if v == 0 {
            return 0;
        }
        let shl = -(shr as i64);
        let hr = (if v < 0 { !v } else { v }).leading_zeros() as i64 - 1;
        if shl > hr {
            return if v < 0 { i128::MIN } else { i128::MAX };
        }
        return v << shl as u32;
    }
    if shr >= 127 {
        return 0;
    }
    let half = 1i128 << (shr - 1);
    v.saturating_add(half) >> shr
}

/// Rounding division of a wide value by a positive divisor (ties away from zero).
#[inline]
pub fn round_div(v: i128, d: i128) -> i128 {
    let half = d / 2;
    if v >= 0 {
        (v + half) / d
    } else {
        (v - half) / d
    }
}
