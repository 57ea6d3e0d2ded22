//! Logistic (sigmoid) function on Q8.24 values, in two tiers.
//!
//! | function              | method                         | error budget      |
//! |-----------------------|--------------------------------|-------------------|
//! | [`q24_logistic`]      | `exp(-|x|)` and one division   | 100 ULP (2^-24)   |
//! | [`q24_logistic_fast`] | 8-segment piecewise linear     | 112000 ULP (~0.0067) |

use crate::scalar::exp::exp_pair;
use crate::scalar::Q24_ONE;
use crate::word::round_shr;

/// Segment slopes of the fast tier, Q0.32 of output per input unit.
const FAST_SLOPE: [i64; 8] = [
    1_015_490_930,
    640_498_971,
    297_985_800,
    120_120_271,
    46_079_377,
    17_219_453,
    6_371_555,
    3_717_288,
];

/// Segment offsets of the fast tier, Q8.24.
const FAST_OFFSET: [i32; 8] = [
    8_388_608, 9_853_420, 12_529_304, 14_613_666, 15_770_555, 16_334_225, 16_588_473, 16_661_050,
];

/// Accurate logistic: `1 / (1 + e^-x)` for Q8.24 `x`, result in Q8.24.
///
/// Evaluated on `|x|` so the exponential never exceeds one, then reflected
/// with `σ(-x) = 1 - σ(x)`.
pub fn q24_logistic(x: i32) -> i32 {
    let px = x.saturating_abs();
    let (m, e) = exp_pair(-px, -24);

    // e^-|x| in Q2.30; at most 1.0
    let y = round_shr(m as i128, -(e + 30)) as i64;

    let denominator = (1i64 << 30) + y;
    let result = (((1i64 << 54) + denominator / 2) / denominator) as i32;
    if x < 0 {
        Q24_ONE - result
    } else {
        result
    }
}

/// Fast logistic: piecewise-linear over eight unit-wide segments of `|x|`,
/// saturating to one ULP below 1.0 beyond |x| = 8.
pub fn q24_logistic_fast(x: i32) -> i32 {
    let negative = x < 0;
    let xx = if negative { !x } else { x };

    let segment = (xx >> 24) as usize;
    let y = if segment >= FAST_SLOPE.len() {
        Q24_ONE - 1
    } else {
        (((xx as i64) * FAST_SLOPE[segment]) >> 32) as i32 + FAST_OFFSET[segment]
    };

    if negative {
        Q24_ONE - y
    } else {
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_q24(x: i32) -> i32 {
        let xf = x as f64 / 2f64.powi(24);
        (2f64.powi(24) / (1.0 + (-xf).exp())).round() as i32
    }

    fn sweep(lo: f64, hi: f64, step: f64) -> impl Iterator<Item = i32> {
        let n = ((hi - lo) / step) as i32;
        (0..n).map(move |i| ((lo + i as f64 * step) * 2f64.powi(24)) as i32)
    }

    #[test]
    fn accurate_tier_within_budget() {
        for x in sweep(-12.0, 12.0, 0.007) {
            let err = (q24_logistic(x) - reference_q24(x)).abs();
            assert!(err <= 100, "x={} err={}", x, err);
        }
    }

    #[test]
    fn fast_tier_within_budget() {
        for x in sweep(-12.0, 12.0, 0.007) {
            let err = (q24_logistic_fast(x) - reference_q24(x)).abs();
            assert!(err <= 112_000, "x={} err={}", x, err);
        }
    }

    #[test]
    fn midpoint_and_extremes() {
        assert_eq!(q24_logistic(0), 1 << 23);
        assert_eq!(q24_logistic_fast(0), 1 << 23);
        assert!(q24_logistic(i32::MAX) <= Q24_ONE);
        assert!(q24_logistic(i32::MIN) >= 0);
        assert_eq!(q24_logistic_fast(i32::MAX), Q24_ONE - 1);
        assert_eq!(q24_logistic_fast(i32::MIN), 1);
    }
}
