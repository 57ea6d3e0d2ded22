//! Multiply and reciprocal on `(mantissa, exponent)` pairs.

use crate::headroom::headroom;
use crate::scalar::normalize;
use crate::word::Word;

/// Product of `b·2^b_exp` and `c·2^c_exp`.
///
/// The exact product is formed in a wide accumulator and then fitted back into
/// `T` with no wasted bits, rounding to nearest. The returned pair is within
/// one ULP of the true product (two if the rounding carries into saturation).
#[inline]
pub fn mul<T: Word>(b: T, c: T, b_exp: i32, c_exp: i32) -> (T, i32) {
    let p = b.widen() * c.widen();
    if p == 0 {
        return (T::zero(), b_exp.saturating_add(c_exp));
    }
    let (mant, shr) = normalize::<T>(p);
    (mant, b_exp.saturating_add(c_exp).saturating_add(shr))
}

pub fn s16_mul(b: i16, c: i16, b_exp: i32, c_exp: i32) -> (i16, i32) {
    mul(b, c, b_exp, c_exp)
}

pub fn s32_mul(b: i32, c: i32, b_exp: i32, c_exp: i32) -> (i32, i32) {
    mul(b, c, b_exp, c_exp)
}

pub fn s64_mul(b: i64, c: i64, b_exp: i32, c_exp: i32) -> (i64, i32) {
    mul(b, c, b_exp, c_exp)
}

/// Reciprocal of an integer mantissa: `mant · 2^exp ≈ 1/b`.
///
/// The dividend is scaled so the quotient lands with one or two bits of
/// headroom; truncating division keeps the error under one ULP. A zero
/// divisor saturates to `(MAX, 0)`.
pub fn inverse<T: Word>(b: T) -> (T, i32) {
    if b == T::zero() {
        return (T::max_value(), 0);
    }
    let scale = 2 * (T::BITS as i32 - 2) - headroom(b) as i32;
    let dividend = 1i128 << scale;
    (T::truncate(dividend / b.widen()), -scale)
}

pub fn s16_inverse(b: i16) -> (i16, i32) {
    inverse(b)
}

pub fn s32_inverse(b: i32) -> (i32, i32) {
    inverse(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn expand(m: i64, e: i32) -> f64 {
        m as f64 * 2f64.powi(e)
    }

    #[test]
    fn mul_of_unit_values() {
        let (m, e) = s32_mul(0x4000_0000, 0x4000_0000, -30, -30);
        assert_eq!(expand(m as i64, e), 1.0);
        assert_eq!(headroom(m), 0);
    }

    #[test]
    fn mul_of_zero_is_zero() {
        assert_eq!(s32_mul(0, 12345, 3, 4).0, 0);
        assert_eq!(s16_mul(-3, 0, 0, 0).0, 0);
    }

    #[test]
    fn mul_extremes_stay_in_range() {
        let (m, e) = s32_mul(i32::MIN, i32::MIN, 0, 0);
        assert_eq!(expand(m as i64, e), 2f64.powi(62));
        let (m, e) = s16_mul(i16::MIN, i16::MAX, 0, 0);
        let expected = i16::MIN as f64 * i16::MAX as f64;
        let ulp = 2f64.powi(e);
        assert!((expand(m as i64, e) - expected).abs() <= ulp);
    }

    #[test]
    fn mul_random_within_two_ulp() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for _ in 0..2000 {
            let b: i32 = rng.gen();
            let c: i32 = rng.gen();
            let b_exp = rng.gen_range(-40..40);
            let c_exp = rng.gen_range(-40..40);
            let (m, e) = s32_mul(b, c, b_exp, c_exp);
            let expected = expand(b as i64, b_exp) * expand(c as i64, c_exp);
            let ulp = 2f64.powi(e);
            assert!(
                (expand(m as i64, e) - expected).abs() <= 2.0 * ulp,
                "{} * {} -> {} << {}",
                b,
                c,
                m,
                e
            );
        }
    }

    #[test]
    fn s64_mul_tracks_exponent() {
        let (m, e) = s64_mul(1 << 40, 3, -10, 2);
        assert_eq!(m, 3 << 61);
        assert_eq!(e, -29);
    }

    #[test]
    fn inverse_headroom_and_accuracy() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut cases: Vec<i32> = vec![1, -1, 2, 3, i32::MAX, i32::MIN, 0x4000_0000, -12345];
        cases.extend((0..1000).map(|_| rng.gen::<i32>() >> rng.gen_range(0..31)));
        for b in cases.into_iter().filter(|&b| b != 0) {
            let (m, e) = s32_inverse(b);
            assert!(headroom(m) <= 2, "b={} m={}", b, m);
            let expected = 1.0 / b as f64;
            let ulp = 2f64.powi(e);
            assert!((expand(m as i64, e) - expected).abs() <= 2.0 * ulp, "b={}", b);
        }
    }

    #[test]
    fn inverse_sixteen_bit() {
        for b in [1i16, -1, 3, 100, i16::MAX, i16::MIN, -777] {
            let (m, e) = s16_inverse(b);
            assert!(headroom(m) <= 2);
            assert!((expand(m as i64, e) - 1.0 / b as f64).abs() <= 2.0 * 2f64.powi(e));
        }
    }

    #[test]
    fn inverse_of_zero_saturates() {
        assert_eq!(s32_inverse(0), (i32::MAX, 0));
    }
}
