//! Leading-sign-bit counting.
//!
//! `cls` counts the leading bits equal to the sign bit, the sign bit itself
//! included, so it lies in `1..=N` for an `N`-bit word and equals `N` only for
//! `0` and `-1`. `headroom` is one less: the number of places a value can be
//! shifted left before its sign changes.

use serde::{Deserialize, Serialize};

use crate::word::Word;

/// Count leading sign bits of `x`, including the sign bit.
#[inline]
pub fn cls<T: Word>(x: T) -> u32 {
    let v = if x < T::zero() { !x } else { x };
    v.leading_zeros()
}

/// Redundant sign bits of `x` (`cls(x) - 1`).
#[inline]
pub fn headroom<T: Word>(x: T) -> u32 {
    cls(x) - 1
}

/// Minimum headroom over a slice. An empty slice reports the headroom of zero.
pub fn headroom_slice<T: Word>(xs: &[T]) -> u32 {
    xs.iter()
        .map(|&x| headroom(x))
        .min()
        .unwrap_or(T::BITS - 1)
}

/// Complex integer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

pub type ComplexS16 = Complex<i16>;
pub type ComplexS32 = Complex<i32>;
pub type ComplexS64 = Complex<i64>;

impl<T: Word> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }

    /// Leading sign bits of the pair; the smaller component count binds.
    #[inline]
    pub fn cls(&self) -> u32 {
        cls(self.re).min(cls(self.im))
    }

    #[inline]
    pub fn headroom(&self) -> u32 {
        self.cls() - 1
    }
}
