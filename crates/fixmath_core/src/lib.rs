//! Deterministic fixed-point numerics.
//!
//! Everything in the production path is integer arithmetic with explicit
//! rounding, so results are bit-identical across targets. Values are carried
//! either as raw mantissas with a caller-tracked exponent (`(mant, exp)`
//! pairs), as [`Float`] block-floating-point scalars, or as fixed Q formats
//! ([`Q8_24`], [`Q2_30`]).
//!
//! The crate is `no_std` and never allocates outside of [`HarnessSettings`];
//! enable the `std` feature for `std::error::Error` impls and environment
//! overrides, and `cli` for `clap` argument parsing.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

pub mod bfp;
pub mod config;
pub mod convert;
pub mod dct;
pub mod error;
pub mod filter;
pub mod headroom;
pub mod scalar;
pub mod word;

pub use bfp::{
    ComplexFloat, ComplexFloatS16, ComplexFloatS32, ComplexFloatS64, Float, FloatS16, FloatS32,
    FloatS64,
};
pub use config::HarnessSettings;
pub use convert::{
    f32_to_float_s32, f64_to_float_s32, f64_to_float_s64, float_s32_to_f32, float_s32_to_f64,
    float_s64_to_f64, narrow, narrow_to_exp, s16_to_s32, s32_to_s16, s32_to_s16_exp, s32_to_s64,
    s64_to_s32, s64_to_s32_exp, widen,
};
pub use dct::{dct_forward, dct_inverse, DctPlan, DCT_PLANS};
pub use error::{ConversionError, FilterError, FixmathError, LengthMismatch};
pub use filter::{BiquadS32, Fir, FirS16, FirS32};
pub use headroom::{cls, headroom, headroom_slice, Complex, ComplexS16, ComplexS32, ComplexS64};
pub use scalar::{Q2_30, Q8_24};
pub use word::Word;
