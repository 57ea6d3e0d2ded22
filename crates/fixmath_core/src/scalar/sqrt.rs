//! Bit-by-bit square root.

use crate::headroom::headroom;
use crate::word::Word;

/// Full precision for a 32-bit result.
pub const SQRT_MAX_DEPTH_S32: u32 = 31;

/// Square root of `b·2^b_exp`.
///
/// The input is left-justified and its exponent made even so that the result
/// mantissa always lies in `[2^(N-2), 2^(N-1))`, i.e. it carries at most one
/// bit of headroom. `depth` is the number of leading result bits resolved
/// (clamped to `1..=N-1`); lower bits are left clear. Results are truncated,
/// so `mant² · 2^(2·exp) <= b·2^b_exp`.
///
/// Non-positive inputs return `(0, 0)`.
pub fn sqrt<T: Word>(b: T, b_exp: i32, depth: u32) -> (T, i32) {
    if b <= T::zero() {
        return (T::zero(), 0);
    }
    let n = T::BITS as i32;
    let hr = headroom(b) as i32;
    let justified = (b.widen() << hr) as u128;
    let exp = b_exp as i64 - hr as i64;

    let parity = (exp - (n as i64 - 2)).rem_euclid(2) as i32;
    let radicand = justified << (n - 2 + parity) as u32;
    let a_exp = (exp - (n as i64 - 2) - parity as i64) / 2;

    let depth = depth.clamp(1, T::BITS - 1);
    let top = T::BITS - 2;
    let mut root: u128 = 0;
    for bit in (top + 1 - depth..=top).rev() {
        let trial = root | (1u128 << bit);
        if trial * trial <= radicand {
            root = trial;
        }
    }
    (T::truncate(root as i128), a_exp as i32)
}

pub fn s16_sqrt(b: i16, b_exp: i32, depth: u32) -> (i16, i32) {
    sqrt(b, b_exp, depth)
}

pub fn s32_sqrt(b: i32, b_exp: i32, depth: u32) -> (i32, i32) {
    sqrt(b, b_exp, depth)
}

pub fn s64_sqrt(b: i64, b_exp: i32, depth: u32) -> (i64, i32) {
    sqrt(b, b_exp, depth)
}
