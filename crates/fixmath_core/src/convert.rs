//! Conversions between mantissa widths, forced exponents and native floats.
//!
//! Native float conversions work on the IEEE-754 bit patterns only; no
//! floating-point arithmetic is performed.

use crate::bfp::{FloatS32, FloatS64};
use crate::error::ConversionError;
use crate::headroom::headroom;
use crate::word::{round_shr, Word};

/// Narrow `b·2^b_exp` into `N`, keeping the most significant bits and
/// rounding to nearest. Values that already fit are returned unchanged.
pub fn narrow<W: Word, N: Word>(b: W, b_exp: i32) -> (N, i32) {
    let shr = (W::BITS as i32 - headroom(b) as i32 - N::BITS as i32).max(0);
    (N::saturate(round_shr(b.widen(), shr)), b_exp.saturating_add(shr))
}

/// Widen `b·2^b_exp` into `W`. The mantissa moves to the top of the wider
/// word; with `remove_headroom` its redundant sign bits are shifted out too.
pub fn widen<N: Word, W: Word>(b: N, b_exp: i32, remove_headroom: bool) -> (W, i32) {
    let mut shl = (W::BITS - N::BITS) as i32;
    if remove_headroom && b != N::zero() {
        shl += headroom(b) as i32;
    }
    (W::truncate(b.widen() << shl as u32), b_exp.saturating_sub(shl))
}

/// Express `b·2^b_exp` with the exponent `target_exp` in `N`.
///
/// Dropping low bits rounds to nearest. If the magnitude does not fit at the
/// requested exponent the conversion fails instead of saturating.
pub fn narrow_to_exp<W: Word, N: Word>(
    b: W,
    b_exp: i32,
    target_exp: i32,
) -> Result<N, ConversionError> {
    let overflow = ConversionError::Overflow {
        exponent: b_exp,
        target_exp,
    };
    let shr = target_exp as i64 - b_exp as i64;
    let v = if b == W::zero() {
        0
    } else if shr >= 0 {
        round_shr(b.widen(), shr.min(127) as i32)
    } else {
        let shl = -shr;
        if shl >= headroom(b.widen()) as i64 {
            log::trace!("left shift by {} overflows the wide accumulator", shl);
            return Err(overflow);
        }
        b.widen() << shl as u32
    };
    if v < N::MIN_WIDE || v > N::MAX_WIDE {
        log::trace!(
            "value at exponent {} does not fit {} bits at exponent {}",
            b_exp,
            N::BITS,
            target_exp
        );
        return Err(overflow);
    }
    Ok(N::truncate(v))
}

pub fn s64_to_s32(b: i64, b_exp: i32) -> (i32, i32) {
    narrow(b, b_exp)
}

pub fn s32_to_s16(b: i32, b_exp: i32) -> (i16, i32) {
    narrow(b, b_exp)
}

pub fn s16_to_s32(b: i16, b_exp: i32, remove_headroom: bool) -> (i32, i32) {
    widen(b, b_exp, remove_headroom)
}

pub fn s32_to_s64(b: i32, b_exp: i32, remove_headroom: bool) -> (i64, i32) {
    widen(b, b_exp, remove_headroom)
}

pub fn s64_to_s32_exp(b: i64, b_exp: i32, target_exp: i32) -> Result<i32, ConversionError> {
    narrow_to_exp(b, b_exp, target_exp)
}

pub fn s32_to_s16_exp(b: i32, b_exp: i32, target_exp: i32) -> Result<i16, ConversionError> {
    narrow_to_exp(b, b_exp, target_exp)
}

impl From<FloatS32> for FloatS64 {
    fn from(x: FloatS32) -> Self {
        let (mant, exp) = s32_to_s64(x.mant, x.exp, false);
        FloatS64::new(mant, exp)
    }
}

impl From<FloatS64> for FloatS32 {
    fn from(x: FloatS64) -> Self {
        let (mant, exp) = s64_to_s32(x.mant, x.exp);
        FloatS32::new(mant, exp)
    }
}

/// Field layout of an IEEE-754 binary format.
struct IeeeFormat {
    frac_bits: u32,
    exp_bits: u32,
}

impl IeeeFormat {
    const BINARY32: Self = Self {
        frac_bits: 23,
        exp_bits: 8,
    };
    const BINARY64: Self = Self {
        frac_bits: 52,
        exp_bits: 11,
    };

    fn bias(&self) -> i32 {
        (1 << (self.exp_bits - 1)) - 1
    }

    fn exp_max(&self) -> u64 {
        (1 << self.exp_bits) - 1
    }

    /// Split a bit pattern into sign, integer significand and exponent.
    fn unpack(&self, bits: u64) -> Result<(bool, u64, i32), ConversionError> {
        let negative = bits >> (self.frac_bits + self.exp_bits) & 1 != 0;
        let biased = (bits >> self.frac_bits) & self.exp_max();
        let frac = bits & ((1u64 << self.frac_bits) - 1);
        if biased == self.exp_max() {
            return Err(ConversionError::NotFinite);
        }
        let min_exp = 1 - self.bias() - self.frac_bits as i32;
        if biased == 0 {
            Ok((negative, frac, min_exp))
        } else {
            let significand = frac | (1u64 << self.frac_bits);
            Ok((negative, significand, min_exp + biased as i32 - 1))
        }
    }

    /// Assemble `±magnitude·2^exp`, rounding to nearest even.
    fn pack(&self, negative: bool, magnitude: u64, exp: i32) -> u64 {
        let sign = (negative as u64) << (self.frac_bits + self.exp_bits);
        if magnitude == 0 {
            return sign;
        }
        let msb = 63 - magnitude.leading_zeros() as i32;
        // exponent of the leading bit, then the shift that puts it at frac_bits
        let mut biased = exp as i64 + msb as i64 + self.bias() as i64;
        let mut shr = msb as i64 - self.frac_bits as i64;
        if biased <= 0 {
            // subnormal: the leading bit sits below the implicit one
            shr += 1 - biased;
            biased = 0;
        }
        let significand = if shr > 0 {
            round_half_even(magnitude, shr.min(64) as u32)
        } else {
            magnitude << (-shr) as u32
        };
        if biased >= self.exp_max() as i64 {
            return sign | (self.exp_max() << self.frac_bits);
        }
        // a carry out of the significand bumps the exponent through the add
        let body = if biased == 0 {
            significand
        } else {
            ((biased as u64) << self.frac_bits) + (significand - (1u64 << self.frac_bits))
        };
        if body >= self.exp_max() << self.frac_bits {
            return sign | (self.exp_max() << self.frac_bits);
        }
        sign | body
    }
}

fn round_half_even(v: u64, shr: u32) -> u64 {
    if shr >= 64 {
        return 0;
    }
    let q = v >> shr;
    let rem = v & ((1u64 << shr) - 1);
    let half = 1u64 << (shr - 1);
    if rem > half || (rem == half && q & 1 == 1) {
        q + 1
    } else {
        q
    }
}

/// Exact BFP representation of a finite `f32`.
pub fn f32_to_float_s32(x: f32) -> Result<FloatS32, ConversionError> {
    let (negative, significand, exp) = IeeeFormat::BINARY32.unpack(x.to_bits() as u64)?;
    let mant = significand as i32;
    Ok(FloatS32::new(if negative { -mant } else { mant }, exp).normalized())
}

/// Nearest `f32` to a BFP value; out-of-range magnitudes become infinities.
pub fn float_s32_to_f32(x: FloatS32) -> f32 {
    let bits = IeeeFormat::BINARY32.pack(x.mant < 0, x.mant.unsigned_abs() as u64, x.exp);
    f32::from_bits(bits as u32)
}

/// Exact BFP representation of a finite `f64`.
pub fn f64_to_float_s64(x: f64) -> Result<FloatS64, ConversionError> {
    let (negative, significand, exp) = IeeeFormat::BINARY64.unpack(x.to_bits())?;
    let mant = significand as i64;
    Ok(FloatS64::new(if negative { -mant } else { mant }, exp).normalized())
}

/// Nearest `f64` to a BFP value.
pub fn float_s64_to_f64(x: FloatS64) -> f64 {
    f64::from_bits(IeeeFormat::BINARY64.pack(x.mant < 0, x.mant.unsigned_abs(), x.exp))
}

/// `f64` to a 32-bit mantissa, rounding to nearest when the significand does
/// not fit.
pub fn f64_to_float_s32(x: f64) -> Result<FloatS32, ConversionError> {
    f64_to_float_s64(x).map(FloatS32::from)
}

/// `f64` holding a BFP value exactly, or the nearest one when the exponent
/// lies outside the `f64` range.
pub fn float_s32_to_f64(x: FloatS32) -> f64 {
    let bits = IeeeFormat::BINARY64.pack(x.mant < 0, x.mant.unsigned_abs() as u64, x.exp);
    f64::from_bits(bits)
}
