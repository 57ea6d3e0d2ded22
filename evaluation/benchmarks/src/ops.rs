//! Operation registry: every kernel the harness can time and check.
//!
//! Each operation generates its inputs up front, times only the kernel calls
//! and then measures the worst deviation from an `f64` (or exact integer)
//! model. Errors are in units of the output's least significant bit unless
//! the operation says otherwise.

use std::f64::consts::PI;
use std::hint::black_box;
use std::time::Instant;

use fixmath_core::dct::{self, Block8x8, DctPlan, DCT_PLANS};
use fixmath_core::filter::{BiquadS32, FirS32};
use fixmath_core::scalar::{
    q24_logistic, q24_logistic_fast, q24_sin, s32_inverse, s32_mul, s32_sqrt, SQRT_MAX_DEPTH_S32,
};
use fixmath_core::FloatS32;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Outcome of one operation run.
#[derive(Debug, Clone, Copy)]
pub struct Measured {
    pub calls: u64,
    pub elapsed_ns: u128,
    /// `None` for operations without an accuracy model.
    pub max_error: Option<f64>,
}

impl Measured {
    pub fn ns_per_call(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.elapsed_ns as f64 / self.calls as f64
        }
    }
}

type Runner = Box<dyn Fn(&mut ChaCha8Rng, u32) -> Measured>;

pub struct Operation {
    pub name: String,
    /// Largest acceptable `max_error`.
    pub tolerance: f64,
    run: Runner,
}

impl Operation {
    fn new(name: impl Into<String>, tolerance: f64, run: Runner) -> Self {
        Self {
            name: name.into(),
            tolerance,
            run,
        }
    }

    pub fn run(&self, rng: &mut ChaCha8Rng, reps: u32) -> Measured {
        (self.run)(rng, reps)
    }
}

fn expand(mant: i64, exp: i32) -> f64 {
    mant as f64 * 2f64.powi(exp)
}

/// Time `kernel` over generated inputs, then score each result.
fn scalar<I: Copy, O: Copy>(
    rng: &mut ChaCha8Rng,
    reps: u32,
    gen: impl Fn(&mut ChaCha8Rng) -> I,
    kernel: impl Fn(I) -> O,
    error: impl Fn(I, O) -> f64,
) -> Measured {
    let inputs: Vec<I> = (0..reps).map(|_| gen(rng)).collect();
    let start = Instant::now();
    let outputs: Vec<O> = inputs.iter().map(|&i| black_box(kernel(black_box(i)))).collect();
    let elapsed_ns = start.elapsed().as_nanos();
    let max_error = inputs
        .iter()
        .zip(&outputs)
        .map(|(&i, &o)| error(i, o))
        .fold(0.0, f64::max);
    Measured {
        calls: reps as u64,
        elapsed_ns,
        max_error: Some(max_error),
    }
}

fn nonzero_i32(rng: &mut ChaCha8Rng) -> i32 {
    loop {
        let v = rng.gen::<i32>() >> rng.gen_range(0..31);
        if v != 0 {
            return v;
        }
    }
}

fn scalar_ops() -> Vec<Operation> {
    vec![
        Operation::new(
            "s32_mul",
            2.0,
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                scalar(
                    rng,
                    reps,
                    |r| (r.gen::<i32>(), r.gen::<i32>()),
                    |(b, c)| s32_mul(b, c, -31, -31),
                    |(b, c), (m, e)| {
                        let want = expand(b as i64, -31) * expand(c as i64, -31);
                        (expand(m as i64, e) - want).abs() / 2f64.powi(e)
                    },
                )
            }),
        ),
        Operation::new(
            "s32_inverse",
            2.0,
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                scalar(
                    rng,
                    reps,
                    nonzero_i32,
                    s32_inverse,
                    |b, (m, e)| (expand(m as i64, e) - 1.0 / b as f64).abs() / 2f64.powi(e),
                )
            }),
        ),
        Operation::new(
            "s32_sqrt",
            1.0,
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                scalar(
                    rng,
                    reps,
                    |r| nonzero_i32(r).saturating_abs(),
                    |b| s32_sqrt(b, -30, SQRT_MAX_DEPTH_S32),
                    |b, (m, e)| (expand(m as i64, e) - expand(b as i64, -30).sqrt()).abs() / 2f64.powi(e),
                )
            }),
        ),
        Operation::new(
            "float_s32_add",
            1.0,
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                scalar(
                    rng,
                    reps,
                    |r| {
                        let x = FloatS32::new(r.gen(), r.gen_range(-40..10));
                        // nearly cancelling pairs are the hard case
                        let y = FloatS32::new(r.gen::<i32>() >> 8, x.exp - r.gen_range(0..4));
                        (x, FloatS32::new(x.mant.saturating_neg(), x.exp).add(y))
                    },
                    |(x, y)| x.add(y),
                    |(x, y), s| {
                        let want = expand(x.mant as i64, x.exp) + expand(y.mant as i64, y.exp);
                        (expand(s.mant as i64, s.exp) - want).abs() / 2f64.powi(s.exp)
                    },
                )
            }),
        ),
        // relative error
        Operation::new(
            "float_s32_exp",
            2f64.powi(-24),
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                scalar(
                    rng,
                    reps,
                    |r| FloatS32::new(r.gen_range(-(8 << 24)..(8 << 24)), -24),
                    FloatS32::exp,
                    |x, y| {
                        let want = expand(x.mant as i64, x.exp).exp();
                        ((expand(y.mant as i64, y.exp) - want) / want).abs()
                    },
                )
            }),
        ),
        // relative error
        Operation::new(
            "float_s32_log2",
            2f64.powi(-11),
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                scalar(
                    rng,
                    reps,
                    |r| FloatS32::new(r.gen_range(1..=i32::MAX), r.gen_range(-60..30)),
                    |x| x.log2(),
                    |x, l| {
                        let want = (x.mant as f64).log2() + x.exp as f64;
                        match l {
                            Some(l) if want != 0.0 => {
                                ((expand(l.mant as i64, l.exp) - want) / want).abs()
                            }
                            Some(_) => 0.0,
                            None => f64::INFINITY,
                        }
                    },
                )
            }),
        ),
        Operation::new(
            "q24_sin",
            2f64.powi(13),
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                scalar(
                    rng,
                    reps,
                    |r| r.gen_range(-(32 << 24)..(32 << 24)),
                    q24_sin,
                    |theta, s| {
                        let want = (theta as f64 / 2f64.powi(24)).sin() * 2f64.powi(30);
                        (s as f64 - want).abs()
                    },
                )
            }),
        ),
        Operation::new(
            "q24_logistic",
            100.0,
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                scalar(rng, reps, logistic_input, q24_logistic, logistic_error)
            }),
        ),
        Operation::new(
            "q24_logistic_fast",
            112_000.0,
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                scalar(rng, reps, logistic_input, q24_logistic_fast, logistic_error)
            }),
        ),
    ]
}

fn logistic_input(rng: &mut ChaCha8Rng) -> i32 {
    rng.gen_range(-(12 << 24)..(12 << 24))
}

fn logistic_error(x: i32, y: i32) -> f64 {
    let want = 2f64.powi(24) / (1.0 + (-(x as f64) / 2f64.powi(24)).exp());
    (y as f64 - want).abs()
}

const FIR_TAPS: usize = 64;
const FIR_SHIFT: u32 = 6;

fn filter_ops() -> Vec<Operation> {
    vec![
        // exact against a direct-form model
        Operation::new(
            "fir_s32_64",
            0.0,
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                let coefficients: [i32; FIR_TAPS] = std::array::from_fn(|_| rng.gen::<i32>() >> 6);
                let samples: Vec<i32> = (0..reps).map(|_| rng.gen::<i32>() >> 2).collect();
                let Ok(mut fir) = FirS32::new(coefficients, FIR_SHIFT) else {
                    return Measured { calls: 0, elapsed_ns: 0, max_error: None };
                };
                let start = Instant::now();
                let outputs: Vec<i32> = samples.iter().map(|&x| black_box(fir.apply(black_box(x)))).collect();
                let elapsed_ns = start.elapsed().as_nanos();

                let mut max_error = 0f64;
                for (n, &y) in outputs.iter().enumerate() {
                    let acc: i64 = (0..FIR_TAPS.min(n + 1))
                        .map(|i| (coefficients[i] as i64 * samples[n - i] as i64 + (1 << 29)) >> 30)
                        .sum();
                    let want = ((acc + (1 << (FIR_SHIFT - 1))) >> FIR_SHIFT)
                        .clamp(-(i32::MAX as i64), i32::MAX as i64);
                    max_error = max_error.max((y as i64 - want).abs() as f64);
                }
                Measured { calls: reps as u64, elapsed_ns, max_error: Some(max_error) }
            }),
        ),
        // timing only
        Operation::new(
            "biquad_s32_8",
            f64::INFINITY,
            Box::new(|rng: &mut ChaCha8Rng, reps: u32| {
                // lowpass-like sections: b = (0.25, 0.5, 0.25), a = (0.5, -0.25)
                let section = [0x1000_0000, 0x2000_0000, 0x1000_0000, 0x2000_0000, -0x1000_0000];
                let Ok(mut biquad) = BiquadS32::new(&[section; 8]) else {
                    return Measured { calls: 0, elapsed_ns: 0, max_error: None };
                };
                let samples: Vec<i32> = (0..reps).map(|_| rng.gen::<i32>() >> 4).collect();
                let start = Instant::now();
                for &x in &samples {
                    black_box(biquad.apply(black_box(x)));
                }
                Measured {
                    calls: reps as u64,
                    elapsed_ns: start.elapsed().as_nanos(),
                    max_error: None,
                }
            }),
        ),
    ]
}

fn cos_term(i: usize, k: usize, n: usize) -> f64 {
    (PI * ((2 * i + 1) * k) as f64 / (2 * n) as f64).cos()
}

fn clamp_i32(v: f64) -> f64 {
    v.round().clamp(i32::MIN as f64, i32::MAX as f64)
}

fn dct_run(plan: &'static DctPlan, inverse: bool, rng: &mut ChaCha8Rng, reps: u32) -> Measured {
    let n = plan.size;
    let vectors = (reps as usize / n).max(1);
    let inputs: Vec<Vec<i32>> = (0..vectors)
        .map(|_| (0..n).map(|_| rng.gen()).collect())
        .collect();
    let mut outputs = vec![vec![0i32; n]; vectors];

    let start = Instant::now();
    for (x, y) in inputs.iter().zip(outputs.iter_mut()) {
        let r = if inverse { plan.inverse(y, x) } else { plan.forward(y, x) };
        black_box(r.ok());
    }
    let elapsed_ns = start.elapsed().as_nanos();

    let mut max_error = 0f64;
    let scale = 2f64.powi(-plan.exponent);
    for (x, y) in inputs.iter().zip(&outputs) {
        for k in 0..n {
            let want = if inverse {
                let tail: f64 = (1..n).map(|j| x[j] as f64 * cos_term(k, j, n)).sum();
                (x[0] as f64 / 2.0 + tail) / n as f64
            } else {
                2.0 * (0..n).map(|i| x[i] as f64 * cos_term(i, k, n)).sum::<f64>() * scale
            };
            max_error = max_error.max((y[k] as f64 - clamp_i32(want)).abs());
        }
    }
    Measured {
        calls: vectors as u64,
        elapsed_ns,
        max_error: Some(max_error),
    }
}

fn dct_ops() -> Vec<Operation> {
    let mut ops = Vec::new();
    for plan in DCT_PLANS {
        ops.push(Operation::new(
            format!("dct{}_forward", plan.size),
            plan.forward_tolerance as f64,
            Box::new(move |rng: &mut ChaCha8Rng, reps: u32| dct_run(plan, false, rng, reps)),
        ));
        ops.push(Operation::new(
            format!("dct{}_inverse", plan.size),
            plan.inverse_tolerance as f64,
            Box::new(move |rng: &mut ChaCha8Rng, reps: u32| dct_run(plan, true, rng, reps)),
        ));
    }
    ops.push(Operation::new(
        "dct8x8_forward",
        1.0,
        Box::new(|rng: &mut ChaCha8Rng, reps: u32| block_run(false, rng, reps)),
    ));
    ops.push(Operation::new(
        "dct8x8_inverse",
        1.0,
        Box::new(|rng: &mut ChaCha8Rng, reps: u32| block_run(true, rng, reps)),
    ));
    ops
}

/// Rows transformed then transposed, scaled, as the block stages do.
fn block_reference(x: &[[f64; 8]; 8], inverse: bool, scale: f64) -> [[f64; 8]; 8] {
    let mut out = [[0.0; 8]; 8];
    for (r, row) in x.iter().enumerate() {
        for (k, out_row) in out.iter_mut().enumerate() {
            out_row[r] = scale
                * if inverse {
                    let tail: f64 = (1..8).map(|j| row[j] * cos_term(k, j, 8)).sum();
                    (row[0] / 2.0 + tail) / 8.0
                } else {
                    2.0 * (0..8).map(|i| row[i] * cos_term(i, k, 8)).sum::<f64>()
                };
        }
    }
    out
}

const BLOCK_SAT: i32 = 0;

fn block_run(inverse: bool, rng: &mut ChaCha8Rng, reps: u32) -> Measured {
    let blocks = (reps as usize / 64).max(1);
    let inputs: Vec<Block8x8<i8>> = (0..blocks)
        .map(|_| std::array::from_fn(|_| std::array::from_fn(|_| rng.gen())))
        .collect();
    let mut outputs = vec![[[0i8; 8]; 8]; blocks];

    let start = Instant::now();
    for (x, y) in inputs.iter().zip(outputs.iter_mut()) {
        let hr = if inverse {
            dct::dct8x8_inverse(y, x, BLOCK_SAT)
        } else {
            dct::dct8x8_forward(y, x, BLOCK_SAT)
        };
        black_box(hr);
    }
    let elapsed_ns = start.elapsed().as_nanos();

    let (first, second) = if inverse {
        (128.0, 2f64.powi(-(BLOCK_SAT + 7)))
    } else {
        (8.0, 2f64.powi(-(BLOCK_SAT + 11)))
    };
    let mut max_error = 0f64;
    for (x, y) in inputs.iter().zip(&outputs) {
        let grid: [[f64; 8]; 8] = std::array::from_fn(|r| std::array::from_fn(|c| x[r][c] as f64));
        let want = block_reference(&block_reference(&grid, inverse, first), inverse, second);
        for r in 0..8 {
            for c in 0..8 {
                let w = want[r][c].clamp(-128.0, 127.0);
                max_error = max_error.max((y[r][c] as f64 - w).abs());
            }
        }
    }
    Measured {
        calls: blocks as u64,
        elapsed_ns,
        max_error: Some(max_error),
    }
}

/// Every registered operation, in run order.
pub fn registry() -> Vec<Operation> {
    let mut ops = scalar_ops();
    ops.extend(filter_ops());
    ops.extend(dct_ops());
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn names_are_unique() {
        let ops = registry();
        let mut names: Vec<&str> = ops.iter().map(|o| o.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ops.len());
    }

    #[test]
    fn every_operation_meets_its_tolerance() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for op in registry() {
            let m = op.run(&mut rng, 256);
            assert!(m.calls > 0, "{}", op.name);
            if let Some(e) = m.max_error {
                assert!(e <= op.tolerance, "{}: {} > {}", op.name, e, op.tolerance);
            }
        }
    }
}
