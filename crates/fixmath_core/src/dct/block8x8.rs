//! Two-stage 8×8 block transform.
//!
//! Each stage transforms every row with the 8-point DCT (or its inverse) and
//! writes the result transposed, so two stages give the separable 2-D
//! transform. Outputs that do not fit the stage's element type are clamped to
//! the type's range, and every stage returns the minimum headroom of what it
//! wrote.
//!
//! Implied exponents, relative to the stage input:
//!
//! | stage                 | output        | exponent   |
//! |-----------------------|---------------|------------|
//! | [`dct8x8_stage_a`]    | `i16`         | `-3`       |
//! | [`dct8x8_stage_b`]    | `i8`          | `sat + 11` |
//! | [`idct8x8_stage_a`]   | `i16`         | `-7`       |
//! | [`idct8x8_stage_b`]   | `i8`          | `sat + 7`  |
//!
//! where the forward exponents are relative to the unscaled
//! `2·Σ x·cos` transform and the inverse exponents to the exact inverse.
//!
//! End to end the two stages compose: [`dct8x8_forward`] produces
//! `4·ΣΣ x·cos·cos / 2^(sat + 8)`, and [`dct8x8_inverse`] produces the exact
//! 2-D inverse (including its `1/N²` normalization) scaled by `2^-sat`.

use crate::dct::dct8_coefficient;
use crate::headroom::headroom_slice;
use crate::word::{round_shr, Word};

pub type Block8x8<T> = [[T; 8]; 8];

/// Shift taking a Q2.30 row sum to the stage A output scale.
const STAGE_A_SHR: i32 = 26;
/// Shift taking a Q2.30 row sum to the stage B output scale before `sat`.
const STAGE_B_SHR: i32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

/// Q2.30-scaled transform of one row at output index `k`.
fn row_sum<T: Word>(row: &[T; 8], k: usize, direction: Direction) -> i128 {
    match direction {
        Direction::Forward => (0..8)
            .map(|n| row[n].widen() * dct8_coefficient(k, n) as i128)
            .sum(),
        Direction::Inverse => {
            (1..8).fold(row[0].widen() << 29, |acc, j| {
                acc + row[j].widen() * dct8_coefficient(j, k) as i128
            })
        }
    }
}

/// One row-transform-and-transpose pass.
fn stage<I: Word, O: Word>(
    output: &mut Block8x8<O>,
    input: &Block8x8<I>,
    direction: Direction,
    shr: i32,
) -> u32 {
    for (r, row) in input.iter().enumerate() {
        for k in 0..8 {
            output[k][r] = O::saturate(round_shr(row_sum(row, k, direction), shr));
        }
    }
    headroom_slice(output.as_flattened())
}

/// Forward row pass over 8-bit samples.
pub fn dct8x8_stage_a(output: &mut Block8x8<i16>, input: &Block8x8<i8>) -> u32 {
    stage(output, input, Direction::Forward, STAGE_A_SHR)
}

/// Forward row pass over stage A output, shifted right by a further `sat`
/// bits (negative `sat` shifts left).
///
/// Stage A leaves at least one bit of headroom; inputs using the full 16-bit
/// range clamp more often but are still handled.
pub fn dct8x8_stage_b(output: &mut Block8x8<i8>, input: &Block8x8<i16>, sat: i32) -> u32 {
    stage(output, input, Direction::Forward, STAGE_B_SHR.saturating_add(sat))
}

/// Inverse row pass over 8-bit coefficients.
pub fn idct8x8_stage_a(output: &mut Block8x8<i16>, input: &Block8x8<i8>) -> u32 {
    stage(output, input, Direction::Inverse, STAGE_A_SHR)
}

/// Inverse row pass over inverse stage A output.
pub fn idct8x8_stage_b(output: &mut Block8x8<i8>, input: &Block8x8<i16>, sat: i32) -> u32 {
    stage(output, input, Direction::Inverse, STAGE_B_SHR.saturating_add(sat))
}

/// Full 2-D forward transform of an 8-bit block. Returns the output headroom.
pub fn dct8x8_forward(output: &mut Block8x8<i8>, input: &Block8x8<i8>, sat: i32) -> u32 {
    let mut buffer = [[0i16; 8]; 8];
    let hr = dct8x8_stage_a(&mut buffer, input);
    log::trace!("dct8x8 stage A headroom {}", hr);
    dct8x8_stage_b(output, &buffer, sat)
}

/// Full 2-D inverse transform of an 8-bit block. Returns the output headroom.
pub fn dct8x8_inverse(output: &mut Block8x8<i8>, input: &Block8x8<i8>, sat: i32) -> u32 {
    let mut buffer = [[0i16; 8]; 8];
    let hr = idct8x8_stage_a(&mut buffer, input);
    log::trace!("idct8x8 stage A headroom {}", hr);
    idct8x8_stage_b(output, &buffer, sat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headroom::headroom;

    #[test]
    fn dc_block_forward() {
        let input = [[16i8; 8]; 8];
        let mut a = [[0i16; 8]; 8];
        dct8x8_stage_a(&mut a, &input);
        // every row's DC, 8 · 2 · 8 · 16, lands in the first output row
        assert_eq!(a[0], [2048; 8]);
        for row in &a[1..] {
            assert!(row.iter().all(|&v| v.abs() <= 1), "{:?}", row);
        }
        let mut out = [[0i8; 8]; 8];
        let hr = dct8x8_forward(&mut out, &input, 0);
        assert_eq!(out[0][0], 16);
        assert_eq!(hr, headroom(16i8));
    }

    #[test]
    fn stage_output_is_transposed() {
        let mut input = [[0i8; 8]; 8];
        input[2] = [10; 8];
        let mut a = [[0i16; 8]; 8];
        dct8x8_stage_a(&mut a, &input);
        // the DC of row 2 lands in column 2 of row 0
        assert_eq!(a[0][2], 8 * 2 * 8 * 10);
        assert_eq!(a[0][0], 0);
    }

    #[test]
    fn clamps_instead_of_wrapping() {
        let input = [[127i8; 8]; 8];
        let mut out = [[0i8; 8]; 8];
        let hr = dct8x8_forward(&mut out, &input, -4);
        assert_eq!(out[0][0], i8::MAX);
        assert_eq!(hr, 0);
        let input = [[-128i8; 8]; 8];
        dct8x8_forward(&mut out, &input, -4);
        assert_eq!(out[0][0], i8::MIN);
    }

    #[test]
    fn extreme_sat_clamps_without_wrapping() {
        let input = [[16_000i16; 8]; 8];
        let mut out = [[0i8; 8]; 8];
        for sat in [-100, -125, -200, i32::MIN] {
            let hr = dct8x8_stage_b(&mut out, &input, sat);
            assert_eq!(out[0][0], i8::MAX, "sat {}", sat);
            assert_eq!(hr, 0, "sat {}", sat);
            idct8x8_stage_b(&mut out, &input, sat);
            assert_eq!(out[0][0], i8::MAX, "sat {}", sat);
        }
        let negative = [[-16_000i16; 8]; 8];
        dct8x8_stage_b(&mut out, &negative, -125);
        assert_eq!(out[0][0], i8::MIN);

        let hr = dct8x8_stage_b(&mut out, &input, i32::MAX);
        assert_eq!(out, [[0; 8]; 8]);
        assert_eq!(hr, 7);
        dct8x8_forward(&mut out, &[[100; 8]; 8], i32::MAX);
        assert_eq!(out, [[0; 8]; 8]);
    }

    #[test]
    fn zero_block_has_full_headroom() {
        let mut out = [[0i8; 8]; 8];
        assert_eq!(dct8x8_inverse(&mut out, &[[0; 8]; 8], 0), 7);
        let mut a = [[0i16; 8]; 8];
        assert_eq!(idct8x8_stage_a(&mut a, &[[0; 8]; 8]), 15);
    }

    #[test]
    fn inverse_of_dc_coefficient_is_flat() {
        let mut input = [[0i8; 8]; 8];
        input[0][0] = 64;
        let mut a = [[0i16; 8]; 8];
        idct8x8_stage_a(&mut a, &input);
        // 128 · (64 / 2) / 8 down the first column
        for row in a.iter() {
            assert_eq!(row[0], 512);
            assert!(row[1..].iter().all(|&v| v == 0));
        }
        let mut out = [[0i8; 8]; 8];
        idct8x8_stage_b(&mut out, &a, -4);
        for row in out.iter() {
            for &v in row.iter() {
                // (512 / 2 / 8) / 2^(7 - 4)
                assert_eq!(v, 4);
            }
        }
    }
}
