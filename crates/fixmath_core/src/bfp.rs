//! Block-floating-point scalars.
//!
//! A [`Float`] holds a mantissa and an exponent and stands for
//! `mant · 2^exp`. Two values with different representations may be
//! numerically equal; `PartialEq` compares representations, while
//! [`Float::cmp_value`] compares the numbers they stand for.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::headroom::{cls, headroom, Complex};
use crate::scalar::{exp_pair, inverse, log2_pair, mul, sqrt};
use crate::word::{round_shr, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Float<T> {
    pub mant: T,
    pub exp: i32,
}

pub type FloatS16 = Float<i16>;
pub type FloatS32 = Float<i32>;
pub type FloatS64 = Float<i64>;

/// Extra bits kept below the larger operand when aligning a sum, chosen so
/// two aligned `T` mantissas still add without overflowing `i128`.
fn align_span<T: Word>() -> i64 {
    125 - T::BITS as i64
}

/// Exponent bits needed beyond `v`'s magnitude to fit it into `T`: the
/// right shift that leaves it with no redundant sign bits.
#[inline]
fn fit_shift<T: Word>(v: i128) -> i32 {
    (129 - cls(v) as i32) - T::BITS as i32
}

/// Exponents of two left-justified operands brought to one exponent: the
/// smaller, unless that would need more than `align_span` bits of left shift.
#[inline]
fn common_exponent<T: Word>(xe: i64, ye: i64) -> i64 {
    xe.min(ye).max(xe.max(ye) - align_span::<T>())
}

#[inline]
fn shift_to(v: i128, from: i64, to: i64) -> i128 {
    round_shr(v, (to - from).clamp(-127, 127) as i32)
}

impl<T: Word> Float<T> {
    pub const fn new(mant: T, exp: i32) -> Self {
        Self { mant, exp }
    }

    pub fn zero() -> Self {
        Self::new(T::zero(), 0)
    }

    pub fn headroom(&self) -> u32 {
        headroom(self.mant)
    }

    /// Same value with the redundant sign bits shifted out, as far as the
    /// exponent range allows. Zero becomes `{0, 0}`.
    pub fn normalized(self) -> Self {
        if self.mant == T::zero() {
            return Self::zero();
        }
        let room = self.exp as i64 - i32::MIN as i64;
        let hr = (self.headroom() as i64).min(room) as u32;
        Self::new(self.mant << hr as usize, self.exp - hr as i32)
    }

    /// Mantissa with no headroom, widened, and the matching exponent, which
    /// may lie below `i32::MIN`.
    fn justified(self) -> (i128, i64) {
        if self.mant == T::zero() {
            return (0, 0);
        }
        let hr = self.headroom();
        ((self.mant << hr as usize).widen(), self.exp as i64 - hr as i64)
    }

    /// Round an exact `v·2^exp` into `T` with no wasted bits, keeping the
    /// exponent inside `i32`.
    fn from_wide(v: i128, exp: i64) -> Self {
        if v == 0 {
            return Self::zero();
        }
        let shr = fit_shift::<T>(v);
        Self::from_parts(T::saturate(round_shr(v, shr)), exp + shr as i64)
    }

    fn from_parts(mant: T, exp: i64) -> Self {
        if exp > i32::MAX as i64 {
            let limit = if mant < T::zero() {
                T::min_value()
            } else {
                T::max_value()
            };
            return Self::new(limit, i32::MAX);
        }
        if exp < i32::MIN as i64 {
            let shr = (i32::MIN as i64 - exp).min(127) as i32;
            return Self::new(T::saturate(round_shr(mant.widen(), shr)), i32::MIN);
        }
        Self::new(mant, exp as i32)
    }

    /// Exact sum of both operands at a shared exponent, rounded once into
    /// `T`.
    fn combine(self, other: Self, negate_other: bool) -> Self {
        let (x, xe) = self.justified();
        let (y, ye) = other.justified();
        let y = if negate_other { -y } else { y };
        if y == 0 {
            return Self::from_wide(x, xe);
        }
        if x == 0 {
            return Self::from_wide(y, ye);
        }
        let exp = common_exponent::<T>(xe, ye);
        Self::from_wide(shift_to(x, xe, exp) + shift_to(y, ye, exp), exp)
    }

    /// `self + other`.
    pub fn add(self, other: Self) -> Self {
        self.combine(other, false)
    }

    /// `self - other`.
    pub fn sub(self, other: Self) -> Self {
        self.combine(other, true)
    }

    /// `self · other`.
    pub fn mul(self, other: Self) -> Self {
        let (mant, exp) = mul(self.mant, other.mant, self.exp, other.exp);
        Self::new(mant, exp)
    }

    /// Magnitude; the most negative mantissa saturates to the most positive.
    pub fn abs(self) -> Self {
        Self::new(T::saturate(self.mant.widen().abs()), self.exp)
    }

    /// `self / other` through the reciprocal of `other`'s mantissa. A zero
    /// divisor saturates.
    pub fn div(self, other: Self) -> Self {
        let (inv, inv_exp) = inverse(other.mant);
        let (mant, exp) = mul(self.mant, inv, self.exp, inv_exp);
        Self::new(mant, exp.saturating_sub(other.exp))
    }

    /// Exact ordering of the represented values.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        let (x, xe) = self.justified();
        let (y, ye) = other.justified();
        match x.signum().cmp(&y.signum()) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        if x == 0 {
            return Ordering::Equal;
        }
        // Justified mantissas of one sign occupy disjoint magnitude ranges
        // per exponent, so a larger exponent means a larger magnitude.
        let by_magnitude = xe.cmp(&ye).then(x.abs().cmp(&y.abs()));
        if x > 0 {
            by_magnitude
        } else {
            by_magnitude.reverse()
        }
    }

    /// `self > other` on the represented values.
    pub fn gt(&self, other: &Self) -> bool {
        self.cmp_value(other) == Ordering::Greater
    }

    /// `self >= other` on the represented values.
    pub fn gte(&self, other: &Self) -> bool {
        self.cmp_value(other) != Ordering::Less
    }
}

impl FloatS32 {
    /// Exponential moving average `c·self + (1 - c)·other` for a Q2.30
    /// coefficient `c` in `[0, 2^30]`.
    pub fn ema(self, other: Self, coef_q30: i32) -> Self {
        let t = Self::new(coef_q30, -30);
        let s = Self::new((1 << 30) - coef_q30, -30);
        self.mul(t).add(other.mul(s))
    }

    /// Square root at full precision. Negative values give zero.
    pub fn sqrt(self) -> Self {
        let (mant, exp) = sqrt(self.mant, self.exp, crate::scalar::SQRT_MAX_DEPTH_S32);
        Self::new(mant, exp)
    }

    /// Natural exponential.
    pub fn exp(self) -> Self {
        let (mant, exp) = exp_pair(self.mant, self.exp);
        Self::new(mant, exp)
    }

    /// Base-2 logarithm, `None` for non-positive values.
    pub fn log2(self) -> Option<Self> {
        log2_pair(self.mant, self.exp).map(|(mant, exp)| Self::new(mant, exp))
    }
}

/// Complex block-floating-point value: both components share one exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplexFloat<T> {
    pub mant: Complex<T>,
    pub exp: i32,
}

pub type ComplexFloatS16 = ComplexFloat<i16>;
pub type ComplexFloatS32 = ComplexFloat<i32>;
pub type ComplexFloatS64 = ComplexFloat<i64>;

impl<T: Word> ComplexFloat<T> {
    pub fn new(re: T, im: T, exp: i32) -> Self {
        Self {
            mant: Complex::new(re, im),
            exp,
        }
    }

    pub fn re(&self) -> Float<T> {
        Float::new(self.mant.re, self.exp)
    }

    pub fn im(&self) -> Float<T> {
        Float::new(self.mant.im, self.exp)
    }

    /// Fit an exact `(re + i·im)·2^exp` into `T` with a shared shift sized by
    /// the larger component.
    fn from_wide(re: i128, im: i128, exp: i64) -> Self {
        if re == 0 && im == 0 {
            return Self::new(T::zero(), T::zero(), 0);
        }
        let shr = fit_shift::<T>(re).max(fit_shift::<T>(im));
        let exp = exp + shr as i64;
        let (re, im) = (round_shr(re, shr), round_shr(im, shr));
        let re = Float::<T>::from_parts(T::saturate(re), exp);
        let im = Float::<T>::from_parts(T::saturate(im), exp);
        Self::new(re.mant, im.mant, re.exp)
    }

    /// Left-justified components and the shared exponent.
    fn justified(self) -> (i128, i128, i64) {
        if self.mant.re == T::zero() && self.mant.im == T::zero() {
            return (0, 0, 0);
        }
        let hr = self.mant.headroom();
        (
            (self.mant.re << hr as usize).widen(),
            (self.mant.im << hr as usize).widen(),
            self.exp as i64 - hr as i64,
        )
    }

    fn combine(self, other: Self, negate_other: bool) -> Self {
        let (xr, xi, xe) = self.justified();
        let (yr, yi, ye) = other.justified();
        let (yr, yi) = if negate_other { (-yr, -yi) } else { (yr, yi) };
        if yr == 0 && yi == 0 {
            return Self::from_wide(xr, xi, xe);
        }
        if xr == 0 && xi == 0 {
            return Self::from_wide(yr, yi, ye);
        }
        let exp = common_exponent::<T>(xe, ye);
        Self::from_wide(
            shift_to(xr, xe, exp) + shift_to(yr, ye, exp),
            shift_to(xi, xe, exp) + shift_to(yi, ye, exp),
            exp,
        )
    }

    /// `self + other`.
    pub fn add(self, other: Self) -> Self {
        self.combine(other, false)
    }

    /// `self - other`.
    pub fn sub(self, other: Self) -> Self {
        self.combine(other, true)
    }

    /// Complex product `self · other`.
    pub fn mul(self, other: Self) -> Self {
        let (a, b) = (self.mant.re.widen(), self.mant.im.widen());
        let (c, d) = (other.mant.re.widen(), other.mant.im.widen());
        let exp = self.exp as i64 + other.exp as i64;
        // 64-bit extremes can carry one bit past i128
        match ((a * c).checked_sub(b * d), (a * d).checked_add(b * c)) {
            (Some(re), Some(im)) => Self::from_wide(re, im, exp),
            _ => Self::from_wide(
                (a * c >> 1) - (b * d >> 1),
                (a * d >> 1) + (b * c >> 1),
                exp + 1,
            ),
        }
    }
}
