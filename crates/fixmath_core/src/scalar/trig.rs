//! Sine, cosine and tangent on Q8.24 radians.
//!
//! Angles are first converted to an unsigned 32-bit fraction of a full turn
//! (`2^32` = 2π). The top two bits select the quadrant and the remaining 30
//! bits give the position inside it, mirrored for odd quadrants, so the
//! polynomial only ever sees arguments in `[0, π/2]`.
//!
//! [`f32_sin`] and [`f32_cos`] are native-float counterparts for targets with
//! a floating-point unit.

use core::f32::consts::{FRAC_PI_2, PI};

use crate::bfp::FloatS32;
use crate::scalar::powers::f32_power_series;
use crate::scalar::{Q2_30, Q8_24};

/// `2^40 / 2π`: Q8.24 radians to 2^-32 turns, with 32 extra bits.
const RADIANS_TO_TURNS: i128 = 174_992_710_548;
/// π/2 in Q2.30.
const HALF_PI_Q30: i64 = 1_686_629_713;
const ONE_Q30: i64 = 1 << 30;
const QUARTER_TURN: u32 = 1 << 30;

#[inline]
fn radians_to_turns(theta: i32) -> u32 {
    ((theta as i128 * RADIANS_TO_TURNS) >> 32) as u32
}

/// Sine of an angle given as a 32-bit fraction of a turn, in Q2.30.
pub fn sbrad_sin(turns: u32) -> i32 {
    let quadrant = turns >> 30;
    let mut f = (turns & (QUARTER_TURN - 1)) as i64;
    if quadrant & 1 != 0 {
        f = ONE_Q30 - f;
    }
    let phi = (f * HALF_PI_Q30) >> 30;
    let phi2 = (phi * phi) >> 30;

    // sin φ = φ(1 - φ²/(2·3)(1 - φ²/(4·5)(1 - ...)))
    let mut r = ONE_Q30;
    for k in (1..=7i64).rev() {
        r = ONE_Q30 - ((phi2 * r) >> 30) / ((2 * k) * (2 * k + 1));
    }
    let s = ((phi * r) >> 30) as i32;
    if quadrant >= 2 {
        -s
    } else {
        s
    }
}

/// `sin(theta)` for Q8.24 radians, returned in Q2.30.
pub fn q24_sin(theta: i32) -> i32 {
    sbrad_sin(radians_to_turns(theta))
}

/// `cos(theta)` for Q8.24 radians, returned in Q2.30.
pub fn q24_cos(theta: i32) -> i32 {
    sbrad_sin(radians_to_turns(theta).wrapping_add(QUARTER_TURN))
}

/// `tan(theta)` for Q8.24 radians. The result is unbounded, so it comes back
/// as a BFP pair.
pub fn q24_tan(theta: i32) -> FloatS32 {
    let turns = radians_to_turns(theta);
    let s = FloatS32::new(sbrad_sin(turns), -30);
    let c = FloatS32::new(sbrad_sin(turns.wrapping_add(QUARTER_TURN)), -30);
    s.div(c)
}

/// Typed wrapper over [`q24_sin`].
pub fn sin(theta: Q8_24) -> Q2_30 {
    Q2_30::from_bits(q24_sin(theta.to_bits()))
}

/// Typed wrapper over [`q24_cos`].
pub fn cos(theta: Q8_24) -> Q2_30 {
    Q2_30::from_bits(q24_cos(theta.to_bits()))
}

/// 2π split so that `n·TWO_PI_HI` is exact for small `n`.
const TWO_PI_HI: f32 = 6.281_25;
const TWO_PI_LO: f32 = 0.001_935_307_2;
const INV_TWO_PI: f32 = 0.159_154_94;

/// `(-1)^k / (2k+1)!`: the sine series in powers of `θ²`.
const SIN_SERIES: [f32; 8] = [
    1.0,
    -1.666_666_7e-1,
    8.333_333e-3,
    -1.984_127e-4,
    2.755_732e-6,
    -2.505_210_8e-8,
    1.605_904_4e-10,
    -7.647_163_7e-13,
];

/// `sin(theta)` for an `f32` angle in radians, via the eight-term power
/// series after reduction to `[-π/2, π/2]`. Non-finite angles give NaN.
pub fn f32_sin(theta: f32) -> f32 {
    let q = theta * INV_TWO_PI;
    let turns = if q >= 0.0 { q + 0.5 } else { q - 0.5 } as i32 as f32;
    let mut r = (theta - turns * TWO_PI_HI) - turns * TWO_PI_LO;
    if r > FRAC_PI_2 {
        r = PI - r;
    } else if r < -FRAC_PI_2 {
        r = -PI - r;
    }
    r * f32_power_series(r * r, &SIN_SERIES)
}

/// `cos(theta)` as `sin(theta + π/2)`.
pub fn f32_cos(theta: f32) -> f32 {
    f32_sin(theta + FRAC_PI_2)
}
