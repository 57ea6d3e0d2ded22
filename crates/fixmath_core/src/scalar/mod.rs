//! Scalar fixed-point arithmetic.
//!
//! Functions here either take `(mantissa, exponent)` pairs and return a new
//! pair, or take raw Q-format integers whose exponent is fixed by the
//! function (Q8.24 in, Q2.30 out for the trig functions, for instance).
//! The `f32_*` functions are the exception: they take and return native
//! floats and are meant for targets with a floating-point unit.

pub mod exp;
pub mod log2;
pub mod logistic;
pub mod mul;
pub mod powers;
pub mod sqrt;
pub mod trig;

pub use exp::{exp_pair, q30_exp_small};
pub use log2::{f32_log2, log2_pair};
pub use logistic::{q24_logistic, q24_logistic_fast};
pub use mul::{inverse, mul, s16_inverse, s16_mul, s32_inverse, s32_mul, s64_mul};
pub use powers::{f32_power_series, q30_powers, s32_odd_powers};
pub use sqrt::{s16_sqrt, s32_sqrt, s64_sqrt, sqrt, SQRT_MAX_DEPTH_S32};
pub use trig::{f32_cos, f32_sin, q24_cos, q24_sin, q24_tan, sbrad_sin};

use crate::headroom::cls;
use crate::word::{round_shr, Word};

/// Q8.24 value (8 integer bits, 24 fractional bits).
pub type Q8_24 = fixed::types::I8F24;
/// Q2.30 value (2 integer bits, 30 fractional bits).
pub type Q2_30 = fixed::types::I2F30;

pub const Q24_ONE: i32 = 1 << 24;
pub const Q30_ONE: i32 = 1 << 30;

/// Fit an exact wide value into `T`, keeping as many significant bits as the
/// width allows. Returns the mantissa and the right shift applied (negative
/// for a left shift). Zero maps to `(0, 0)`.
pub(crate) fn normalize<T: Word>(p: i128) -> (T, i32) {
    if p == 0 {
        return (T::zero(), 0);
    }
    let shr = (129 - cls(p) as i32) - T::BITS as i32;
    if shr <= 0 {
        (T::truncate(p << (-shr) as u32), shr)
    } else {
        (T::saturate(round_shr(p, shr)), shr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headroom::headroom;

    #[test]
    fn normalize_left_justifies_small_values() {
        let (m, shr) = normalize::<i32>(3);
        assert_eq!(m, 3 << 29);
        assert_eq!(shr, -29);
        assert_eq!(headroom(m), 0);
    }

    #[test]
    fn normalize_rounds_wide_values() {
        let (m, shr) = normalize::<i16>(0x1_2345_6789);
        assert_eq!(shr, 18);
        assert_eq!(m as i128, round_shr(0x1_2345_6789, shr));
        let (m, _) = normalize::<i32>(-(1i128 << 70));
        assert_eq!(m, i32::MIN);
    }

    #[test]
    fn normalize_saturates_on_round_up() {
        let p = ((1i128 << 31) - 1) * 2 + 1;
        let (m, shr) = normalize::<i32>(p);
        assert_eq!(shr, 1);
        assert_eq!(m, i32::MAX);
    }
}
