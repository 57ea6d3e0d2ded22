//! Fixed-point type-II discrete cosine transforms.
//!
//! The forward transform of length `N` computes
//!
//! `X[k] = 2 · Σ x[n] · cos(π(2n+1)k / 2N)`
//!
//! and returns it scaled by `2^-exp`, where `exp` is the size's implied
//! output exponent (see [`DctPlan::exponent`]). Callers tracking a block
//! exponent add `exp` to the input exponent. The inverse
//!
//! `x[n] = (X[0]/2 + Σ_{k≥1} X[k] · cos(π(2n+1)k / 2N)) / N`
//!
//! undoes the unscaled forward transform and leaves the exponent unchanged,
//! so `inverse(forward(x))` returns `x · 2^-exp` within the size's tolerance.
//!
//! Every size runs through the same two routines, driven by a per-size
//! [`DctPlan`] holding the Q2.30 cosine matrix and metadata.

pub mod block8x8;

pub use block8x8::{
    dct8x8_forward, dct8x8_inverse, dct8x8_stage_a, dct8x8_stage_b, idct8x8_stage_a,
    idct8x8_stage_b, Block8x8,
};

use crate::error::{FixmathError, LengthMismatch};
use crate::word::{round_div, round_shr, Word};

/// π in Q4.60.
const PI_Q60: i128 = 3_622_009_729_038_561_421;
const ONE_Q60: i128 = 1 << 60;
const TAYLOR_TERMS: i128 = 11;

/// `cos(x)` or `sin(x)` for `x` in `[0, π/2)`, all in Q4.60.
const fn taylor_q60(x: i128, cosine: bool) -> i128 {
    let x2 = (x * x) >> 60;
    let (mut term, offset) = if cosine { (ONE_Q60, 0) } else { (x, 1) };
    let mut sum = term;
    let mut i = 1;
    while i <= TAYLOR_TERMS {
        let d = (2 * i - 1 + offset) * (2 * i + offset);
        term = -((term * x2) >> 60) / d;
        sum += term;
        i += 1;
    }
    sum
}

/// `cos(π·m / 2N)` in Q2.30.
const fn cos_q30(m: usize, n: usize) -> i32 {
    let q = m % (4 * n);
    let a = PI_Q60 * (q % n) as i128 / (2 * n) as i128;
    let v = match q / n {
        0 => taylor_q60(a, true),
        1 => -taylor_q60(a, false),
        2 => -taylor_q60(a, true),
        _ => taylor_q60(a, false),
    };
    ((v + (1 << 29)) >> 30) as i32
}

/// Row-major `N×N` matrix with `C[k][n] = cos(π(2n+1)k / 2N)` in Q2.30.
const fn dct_matrix<const N: usize, const NN: usize>() -> [i32; NN] {
    let mut m = [0i32; NN];
    let mut k = 0;
    while k < N {
        let mut n = 0;
        while n < N {
            m[k * N + n] = cos_q30((2 * n + 1) * k, N);
            n += 1;
        }
        k += 1;
    }
    m
}

static DCT6: [i32; 36] = dct_matrix::<6, 36>();
static DCT8: [i32; 64] = dct_matrix::<8, 64>();
static DCT12: [i32; 144] = dct_matrix::<12, 144>();
static DCT16: [i32; 256] = dct_matrix::<16, 256>();
static DCT24: [i32; 576] = dct_matrix::<24, 576>();
static DCT32: [i32; 1024] = dct_matrix::<32, 1024>();
static DCT48: [i32; 2304] = dct_matrix::<48, 2304>();
static DCT64: [i32; 4096] = dct_matrix::<64, 4096>();

/// Everything needed to run one transform size.
#[derive(Debug)]
pub struct DctPlan {
    pub size: usize,
    /// Implied exponent of the forward output relative to its input.
    pub exponent: i32,
    /// Maximum absolute mantissa error of the forward transform against an
    /// exact reference.
    pub forward_tolerance: i32,
    /// Maximum absolute mantissa error of the inverse transform.
    pub inverse_tolerance: i32,
    matrix: &'static [i32],
}

impl DctPlan {
    /// `C[k][n]` in Q2.30.
    pub fn coefficient(&self, k: usize, n: usize) -> i32 {
        self.matrix[k * self.size + n]
    }

    fn check(&self, output: &[i32], input: &[i32]) -> Result<(), LengthMismatch> {
        for len in [output.len(), input.len()] {
            if len != self.size {
                return Err(LengthMismatch {
                    expected: self.size,
                    actual: len,
                });
            }
        }
        Ok(())
    }

    /// Forward transform; returns the output exponent offset.
    pub fn forward(&self, output: &mut [i32], input: &[i32]) -> Result<i32, LengthMismatch> {
        self.check(output, input)?;
        forward_with(self, output, input);
        Ok(self.exponent)
    }

    /// Inverse transform; the exponent is unchanged.
    pub fn inverse(&self, output: &mut [i32], input: &[i32]) -> Result<i32, LengthMismatch> {
        self.check(output, input)?;
        inverse_with(self, output, input);
        Ok(0)
    }
}

pub const DCT6_EXP: i32 = 4;
pub const DCT8_EXP: i32 = 4;
pub const DCT12_EXP: i32 = 7;
pub const DCT16_EXP: i32 = 7;
pub const DCT24_EXP: i32 = 10;
pub const DCT32_EXP: i32 = 10;
pub const DCT48_EXP: i32 = 13;
pub const DCT64_EXP: i32 = 13;

macro_rules! plan {
    ($name:ident, $n:literal, $exp:ident, $matrix:ident) => {
        static $name: DctPlan = DctPlan {
            size: $n,
            exponent: $exp,
            forward_tolerance: $n,
            inverse_tolerance: 6 * $n,
            matrix: &$matrix,
        };
    };
}

plan!(PLAN_6, 6, DCT6_EXP, DCT6);
plan!(PLAN_8, 8, DCT8_EXP, DCT8);
plan!(PLAN_12, 12, DCT12_EXP, DCT12);
plan!(PLAN_16, 16, DCT16_EXP, DCT16);
plan!(PLAN_24, 24, DCT24_EXP, DCT24);
plan!(PLAN_32, 32, DCT32_EXP, DCT32);
plan!(PLAN_48, 48, DCT48_EXP, DCT48);
plan!(PLAN_64, 64, DCT64_EXP, DCT64);

/// Supported sizes, ascending.
pub static DCT_PLANS: [&DctPlan; 8] = [
    &PLAN_6, &PLAN_8, &PLAN_12, &PLAN_16, &PLAN_24, &PLAN_32, &PLAN_48, &PLAN_64,
];

/// Plan for a transform length, if supported.
pub fn plan(size: usize) -> Option<&'static DctPlan> {
    DCT_PLANS.iter().copied().find(|p| p.size == size)
}

fn forward_with(plan: &DctPlan, output: &mut [i32], input: &[i32]) {
    let shr = 29 + plan.exponent;
    for (k, out) in output.iter_mut().enumerate() {
        let row = &plan.matrix[k * plan.size..(k + 1) * plan.size];
        let acc: i128 = row
            .iter()
            .zip(input)
            .map(|(&c, &x)| c as i128 * x as i128)
            .sum();
        *out = i32::saturate(round_shr(acc, shr));
    }
}

fn inverse_with(plan: &DctPlan, output: &mut [i32], input: &[i32]) {
    let n = plan.size;
    let scale = (n as i128) << 30;
    for (k, out) in output.iter_mut().enumerate() {
        let mut acc = (input[0] as i128) << 29;
        for j in 1..n {
            acc += input[j] as i128 * plan.matrix[j * n + k] as i128;
        }
        *out = i32::saturate(round_div(acc, scale));
    }
}

/// Forward DCT of any supported length. Returns the output exponent offset.
pub fn dct_forward(output: &mut [i32], input: &[i32]) -> Result<i32, FixmathError> {
    let p = plan(input.len()).ok_or(FixmathError::UnsupportedDctSize(input.len()))?;
    Ok(p.forward(output, input)?)
}

/// Inverse DCT of any supported length. Returns the output exponent offset,
/// which is always zero.
pub fn dct_inverse(output: &mut [i32], input: &[i32]) -> Result<i32, FixmathError> {
    let p = plan(input.len()).ok_or(FixmathError::UnsupportedDctSize(input.len()))?;
    Ok(p.inverse(output, input)?)
}

macro_rules! sized {
    ($($fwd:ident, $inv:ident, $exp:ident, $plan:ident, $n:literal;)*) => {$(
        /// Forward transform; returns the output exponent offset.
        pub fn $fwd(output: &mut [i32; $n], input: &[i32; $n]) -> i32 {
            forward_with(&$plan, output, input);
            $exp
        }

        /// Inverse transform; the exponent is unchanged.
        pub fn $inv(output: &mut [i32; $n], input: &[i32; $n]) {
            inverse_with(&$plan, output, input);
        }
    )*};
}

sized! {
    dct6_forward, dct6_inverse, DCT6_EXP, PLAN_6, 6;
    dct8_forward, dct8_inverse, DCT8_EXP, PLAN_8, 8;
    dct12_forward, dct12_inverse, DCT12_EXP, PLAN_12, 12;
    dct16_forward, dct16_inverse, DCT16_EXP, PLAN_16, 16;
    dct24_forward, dct24_inverse, DCT24_EXP, PLAN_24, 24;
    dct32_forward, dct32_inverse, DCT32_EXP, PLAN_32, 32;
    dct48_forward, dct48_inverse, DCT48_EXP, PLAN_48, 48;
    dct64_forward, dct64_inverse, DCT64_EXP, PLAN_64, 64;
}

/// The 8-point Q2.30 cosine matrix, shared with the 8×8 block transform.
pub(crate) fn dct8_coefficient(k: usize, n: usize) -> i32 {
    DCT8[k * 8 + n]
}
