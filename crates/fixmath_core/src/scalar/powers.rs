//! Power tables and power-series evaluation.

use crate::word::Word;

/// Fill `out` with `b^0, b^1, …` for a Q2.30 `b`, each power rounded from
/// the previous one. Results saturate rather than wrap.
pub fn q30_powers(out: &mut [i32], b: i32) {
    let mut pow = 1i32 << 30;
    for slot in out.iter_mut() {
        *slot = pow;
        pow = i32::saturate((pow as i128 * b as i128 + (1 << 29)) >> 30);
    }
}

/// Fill `out` with the odd powers `b, b^3, b^5, …` of `b`.
///
/// Every 64-bit product is shifted right by `shr` and truncated to 32 bits,
/// so a `b` with `shr` fractional bits yields powers in the same Q format.
/// Nothing is rounded or saturated; keeping the powers in range is up to the
/// caller.
pub fn s32_odd_powers(out: &mut [i32], b: i32, shr: u32) {
    let shr = shr.min(63);
    let square = ((b as i64 * b as i64) >> shr) as i32;
    let mut pow = b;
    for slot in out.iter_mut() {
        *slot = pow;
        pow = ((pow as i64 * square as i64) >> shr) as i32;
    }
}

/// `Σ coefs[k]·x^k` in native float arithmetic, starting from the `x^0` term.
pub fn f32_power_series(x: f32, coefs: &[f32]) -> f32 {
    let mut pow = 1.0f32;
    let mut acc = 0.0f32;
    for &c in coefs {
        acc += pow * c;
        pow *= x;
    }
    acc
}
