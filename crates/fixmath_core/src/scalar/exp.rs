//! Natural exponential.

/// log2(e) in Q2.30.
const LOG2_E_Q30: i64 = 1_549_082_005;
/// ln(2) in Q2.30.
const LN_2_Q30: i64 = 744_261_118;
const ONE_Q30: i64 = 1 << 30;
const TAYLOR_TERMS: i64 = 11;

/// Largest |x·log2(e)| handled, in Q30 units. Beyond this the result exponent
/// would leave the `i32` range, so the argument is clamped.
const ARG_LIMIT_Q30: i128 = 1 << 60;

/// `e^z` for a Q2.30 argument with `|z| <= 0.5`, returned in Q2.30.
///
/// Horner evaluation of the Taylor series to the 11th power.
pub fn q30_exp_small(z: i32) -> i32 {
    let z = z as i64;
    let mut r = ONE_Q30;
    for k in (1..=TAYLOR_TERMS).rev() {
        r = ONE_Q30 + ((z * r) >> 30) / k;
    }
    r as i32
}

/// `e^(b·2^b_exp)` as a `(mantissa, exponent)` pair.
///
/// The argument is rescaled to base 2, split into an integer power and a
/// fraction in `[-0.5, 0.5)`, and the fraction is evaluated with
/// [`q30_exp_small`]. The mantissa always lies in `[2^29, 2^31)`.
pub fn exp_pair(b: i32, b_exp: i32) -> (i32, i32) {
    let prod = b as i128 * LOG2_E_Q30 as i128;
    let v = if prod == 0 {
        0
    } else if b_exp >= 0 {
        if b_exp > 64 {
            ARG_LIMIT_Q30 * prod.signum()
        } else {
            (prod << b_exp as u32).clamp(-ARG_LIMIT_Q30, ARG_LIMIT_Q30)
        }
    } else {
        prod >> (-(b_exp as i64)).min(127) as u32
    };

    let mut n = v >> 30;
    let mut f = v - (n << 30);
    if f >= ONE_Q30 as i128 / 2 {
        f -= ONE_Q30 as i128;
        n += 1;
    }
    let z = ((f * LN_2_Q30 as i128) >> 30) as i32;
    (q30_exp_small(z), n as i32 - 30)
}
