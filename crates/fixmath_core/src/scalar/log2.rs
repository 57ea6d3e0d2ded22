//! Base-2 logarithm.
//!
//! For `x = m·2^e` with `m` in `[1/√2, √2)`, `log2 x = e + (2/ln 2)·atanh(s)`
//! where `s = (m-1)/(m+1)`. `|s| < 0.172`, so six terms of the odd atanh
//! series are plenty. `s` is computed with its own exponent so values of `x`
//! close to one keep full relative precision.

use crate::convert::{f32_to_float_s32, float_s32_to_f32};
use crate::headroom::headroom;
use crate::scalar::normalize;

/// √2 in Q2.30, rounded up.
const SQRT2_Q30: i64 = 0x5A82_799A;
/// 2/ln(2) in Q3.29.
const TWO_OVER_LN2_Q29: i128 = 1_549_082_005;
/// 1/(2k+1) in Q2.30, k = 0..6.
const ATANH_SERIES_Q30: [i64; 6] = [
    1_073_741_824,
    357_913_941,
    214_748_365,
    153_391_689,
    119_304_647,
    97_612_893,
];

/// `log2(b·2^b_exp)` as a `(mantissa, exponent)` pair, or `None` when the
/// input is not positive.
pub fn log2_pair(b: i32, b_exp: i32) -> Option<(i32, i32)> {
    if b <= 0 {
        return None;
    }
    let hr = headroom(b);
    let q = (b as i64) << hr;
    let mut e = b_exp as i64 - hr as i64 + 30;
    let reference = if q > SQRT2_Q30 {
        e += 1;
        1i64 << 31
    } else {
        1i64 << 30
    };

    let n = q - reference;
    if n == 0 {
        let (m, shr) = normalize::<i32>(e as i128);
        return Some((m, shr));
    }
    let d = q + reference;

    // s = n/d = s_mant · 2^-sh
    let sh = headroom(n) as i32 - 1;
    let s_mant = (n << sh) / d;

    let s2_shift = 2 * sh - 30;
    let s2 = if s2_shift >= 127 {
        0
    } else {
        ((s_mant as i128 * s_mant as i128) >> s2_shift) as i64
    };
    let mut poly = 0i64;
    for &c in ATANH_SERIES_Q30.iter().rev() {
        poly = c + ((poly * s2) >> 30);
    }
    let t = (s_mant * poly) >> 30;
    let frac = (t as i128 * TWO_OVER_LN2_Q29) >> 29;

    let total = ((e as i128) << sh) + frac;
    let (m, shr) = normalize::<i32>(total);
    Some((m, shr - sh))
}

/// `log2` of a native float, computed without floating-point arithmetic.
///
/// Zero maps to `-inf`, negative values and NaN to NaN, `+inf` to `+inf`.
pub fn f32_log2(x: f32) -> f32 {
    let bits = x.to_bits();
    let magnitude = bits & 0x7FFF_FFFF;
    if magnitude == 0 {
        return f32::NEG_INFINITY;
    }
    if bits >> 31 != 0 || magnitude > 0x7F80_0000 {
        return f32::NAN;
    }
    if magnitude == 0x7F80_0000 {
        return f32::INFINITY;
    }
    match f32_to_float_s32(x).ok().and_then(|v| log2_pair(v.mant, v.exp)) {
        Some((m, e)) => float_s32_to_f32(crate::bfp::FloatS32::new(m, e)),
        None => f32::NAN,
    }
}
