//! Randomized accuracy checks of the scalar kernels against `f64`.
//!
//! Iteration counts and the seed come from `FIXMATH_REPS`, `FIXMATH_SMOKE_TEST`
//! and `FIXMATH_SEED`.

mod common;

use common::{expand, rng_for, settings};
use fixmath_core::scalar::{
    q24_cos, q24_logistic, q24_logistic_fast, q24_sin, s16_mul, s32_inverse, s32_mul, s32_sqrt,
    s64_mul, SQRT_MAX_DEPTH_S32,
};
use fixmath_core::{headroom, FloatS32};
use rand::Rng;

#[test]
fn mul_all_widths_within_two_ulp() {
    let s = settings();
    let mut rng = rng_for(&s, "s32_mul");
    for _ in 0..s.effective_reps() {
        let (b, c): (i32, i32) = (rng.gen(), rng.gen());
        let (m, e) = s32_mul(b, c, -20, 5);
        let expected = expand(b as i64, -20) * expand(c as i64, 5);
        assert!((expand(m as i64, e) - expected).abs() <= 2.0 * 2f64.powi(e));

        let (b, c): (i16, i16) = (rng.gen(), rng.gen());
        let (m, e) = s16_mul(b, c, 0, 0);
        assert!((expand(m as i64, e) - b as f64 * c as f64).abs() <= 2.0 * 2f64.powi(e));

        // the f64 oracle only carries 53 bits of a 64-bit product
        let (b, c) = (rng.gen::<i64>() >> 12, rng.gen::<i64>() >> 12);
        let (m, e) = s64_mul(b, c, 0, 0);
        let expected = b as f64 * c as f64;
        assert!((expand(m, e) - expected).abs() <= expected.abs() * 2f64.powi(-40) + 2f64.powi(e));
    }
}

#[test]
fn inverse_keeps_precision() {
    let s = settings();
    let mut rng = rng_for(&s, "s32_inverse");
    for _ in 0..s.effective_reps() {
        let b = rng.gen::<i32>() >> rng.gen_range(0..31);
        if b == 0 {
            continue;
        }
        let (m, e) = s32_inverse(b);
        assert!(headroom(m) <= 2);
        assert!((expand(m as i64, e) - 1.0 / b as f64).abs() <= 2.0 * 2f64.powi(e));
    }
}

#[test]
fn sqrt_full_depth_within_one_ulp() {
    let s = settings();
    let mut rng = rng_for(&s, "s32_sqrt");
    for _ in 0..s.effective_reps() {
        let b = (rng.gen::<i32>() >> rng.gen_range(0..30)).saturating_abs();
        if b == 0 {
            continue;
        }
        let b_exp = rng.gen_range(-60..60);
        let (m, e) = s32_sqrt(b, b_exp, SQRT_MAX_DEPTH_S32);
        assert!(headroom(m) <= 1);
        let got = expand(m as i64, e);
        let expected = expand(b as i64, b_exp).sqrt();
        assert!(got <= expected * (1.0 + 1e-15));
        assert!(expected - got <= 2f64.powi(e) * 1.000_001);
    }
}

#[test]
fn exp_and_log2_are_consistent() {
    let s = settings();
    let mut rng = rng_for(&s, "exp_log2");
    for _ in 0..s.effective_reps() {
        let x = FloatS32::new(rng.gen_range(-(8 << 24)..(8 << 24)), -24);
        let y = x.exp();
        let expected = expand(x.mant as i64, x.exp).exp();
        assert!(((expand(y.mant as i64, y.exp) - expected) / expected).abs() < 2f64.powi(-24));

        let l = y.log2().expect("exp is positive");
        let expected = expand(x.mant as i64, x.exp) * core::f64::consts::LOG2_E;
        assert!((expand(l.mant as i64, l.exp) - expected).abs() <= 2f64.powi(-20) + expected.abs() * 2f64.powi(-11));
    }
}

#[test]
fn sine_and_cosine_within_tolerance() {
    let s = settings();
    let mut rng = rng_for(&s, "q24_sin");
    let tolerance = 2f64.powi(-17);
    for _ in 0..s.effective_reps() {
        let theta = rng.gen_range(-(32 << 24)..(32 << 24));
        let x = theta as f64 / 2f64.powi(24);
        assert!((q24_sin(theta) as f64 / 2f64.powi(30) - x.sin()).abs() <= tolerance);
        assert!((q24_cos(theta) as f64 / 2f64.powi(30) - x.cos()).abs() <= tolerance);
    }
}

#[test]
fn logistic_tiers_within_budget() {
    let s = settings();
    let mut rng = rng_for(&s, "q24_logistic");
    for _ in 0..s.effective_reps() {
        let x = rng.gen_range(-(12 << 24)..(12 << 24));
        let expected = 1.0 / (1.0 + (-(x as f64) / 2f64.powi(24)).exp()) * 2f64.powi(24);
        assert!((q24_logistic(x) as f64 - expected).abs() <= 100.0, "x={}", x);
        assert!((q24_logistic_fast(x) as f64 - expected).abs() <= 112_000.0, "x={}", x);
    }
}
