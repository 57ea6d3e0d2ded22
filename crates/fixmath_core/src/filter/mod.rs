//! Single-sample streaming filters.
//!
//! Each filter owns its state and is advanced through `&mut self`; callers
//! running one filter from several threads must serialize access themselves.
//! Outputs that leave the sample range saturate symmetrically to
//! `±(2^(N-1) - 1)`.

pub mod biquad;
pub mod fir;

pub use biquad::{apply_biquads, BiquadS32, BIQUAD_MAX_SECTIONS};
pub use fir::{Fir, FirS16, FirS32, FirSample, FIR_ACCUMULATOR_LANES, FIR_GUARANTEED_TAPS};

/// Q2.30 product rounded to nearest, ties toward +∞.
#[inline]
pub(crate) fn mul_q30(a: i32, b: i32) -> i64 {
    (a as i64 * b as i64 + (1 << 29)) >> 30
}
