//! FIR filter over a circular sample buffer.

use crate::error::FilterError;
use crate::filter::mul_q30;
use crate::word::Word;

/// Number of partial accumulators the tap products are spread over.
pub const FIR_ACCUMULATOR_LANES: usize = 8;

/// Tap count up to which full-scale coefficients and samples are guaranteed
/// not to overflow the 40-bit lane budget of the reference accumulator
/// design. Longer filters still produce the wrapped 64-bit sum exactly, but
/// their results are outside the supported range.
pub const FIR_GUARANTEED_TAPS: usize = 128;

/// Sample types a [`Fir`] can run on.
pub trait FirSample: Word {
    /// Contribution of one tap to the accumulator.
    fn tap(coefficient: Self, sample: Self) -> i64;
}

/// 32-bit taps are Q2.30 products: a coefficient of `0x4000_0000` is unity.
impl FirSample for i32 {
    #[inline]
    fn tap(coefficient: i32, sample: i32) -> i64 {
        mul_q30(coefficient, sample)
    }
}

/// 16-bit taps are raw integer products: a coefficient of `1` is unity.
impl FirSample for i16 {
    #[inline]
    fn tap(coefficient: i16, sample: i16) -> i64 {
        coefficient as i64 * sample as i64
    }
}

/// FIR filter with `TAPS` coefficients.
///
/// `coefficients[0]` weights the newest sample. The output of [`Fir::apply`]
/// is `round(Σ coefficients[i]·x[n-i] / 2^shift)`, saturated.
#[derive(Debug, Clone)]
pub struct Fir<T, const TAPS: usize> {
    coefficients: [T; TAPS],
    state: [T; TAPS],
    /// Index of the newest sample.
    head: usize,
    shift: u32,
}

pub type FirS32<const TAPS: usize> = Fir<i32, TAPS>;
pub type FirS16<const TAPS: usize> = Fir<i16, TAPS>;

impl<T: FirSample, const TAPS: usize> Fir<T, TAPS> {
    /// Filter with a zeroed sample history.
    pub fn new(coefficients: [T; TAPS], shift: u32) -> Result<Self, FilterError> {
        if TAPS == 0 {
            return Err(FilterError::NoTaps);
        }
        if TAPS > FIR_GUARANTEED_TAPS {
            log::debug!(
                "FIR with {} taps exceeds the guaranteed range of {}",
                TAPS,
                FIR_GUARANTEED_TAPS
            );
        }
        Ok(Self {
            coefficients,
            state: [T::zero(); TAPS],
            head: 0,
            shift: shift.min(63),
        })
    }

    pub fn taps(&self) -> usize {
        TAPS
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    pub fn coefficients(&self) -> &[T; TAPS] {
        &self.coefficients
    }

    /// Push a sample without computing an output.
    pub fn add_sample(&mut self, sample: T) {
        self.head = if self.head == 0 { TAPS - 1 } else { self.head - 1 };
        self.state[self.head] = sample;
    }

    /// Push a sample and return the filtered output.
    pub fn apply(&mut self, sample: T) -> T {
        self.add_sample(sample);
        let acc = self.accumulate();
        let rounded = if self.shift == 0 {
            acc
        } else {
            acc.wrapping_add(1 << (self.shift - 1)) >> self.shift
        };
        T::saturate_symmetric(rounded as i128)
    }

    /// Zero the sample history.
    pub fn reset(&mut self) {
        self.state = [T::zero(); TAPS];
        self.head = 0;
    }

    /// Sample `age` steps old (0 is the newest).
    fn sample_at(&self, age: usize) -> T {
        let idx = self.head + age;
        self.state[if idx >= TAPS { idx - TAPS } else { idx }]
    }

    /// Tap sum spread over independent lanes and recombined. Integer addition
    /// is associative under wrapping, so the split never changes the result.
    fn accumulate(&self) -> i64 {
        let mut lanes = [0i64; FIR_ACCUMULATOR_LANES];
        for (i, &c) in self.coefficients.iter().enumerate() {
            let lane = &mut lanes[i % FIR_ACCUMULATOR_LANES];
            *lane = lane.wrapping_add(T::tap(c, self.sample_at(i)));
        }
        lanes.iter().fold(0i64, |acc, &l| acc.wrapping_add(l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const UNITY_Q30: i32 = 0x4000_0000;

    fn single_accumulator<T: FirSample, const N: usize>(fir: &Fir<T, N>) -> i64 {
        (0..N).fold(0i64, |acc, i| {
            acc.wrapping_add(T::tap(fir.coefficients[i], fir.sample_at(i)))
        })
    }

    #[test]
    fn two_tap_unity_sixteen_bit() {
        let mut fir = FirS16::new([1, 1], 0).unwrap();
        let out: Vec<i16> = (0..6).map(|i| fir.apply(i)).collect();
        assert_eq!(out, vec![0, 1, 3, 5, 7, 9]);
    }

    #[test]
    fn five_tap_running_sum() {
        let mut fir = FirS32::new([UNITY_Q30; 5], 0).unwrap();
        let mut window = Vec::new();
        for i in 0..20 {
            window.push(i);
            if window.len() > 5 {
                window.remove(0);
            }
            assert_eq!(fir.apply(i), window.iter().sum::<i32>(), "step {}", i);
        }
    }

    #[test]
    fn weighted_taps_against_constant_input() {
        let mut coefficients = [0i32; 16];
        for (i, c) in coefficients.iter_mut().enumerate() {
            *c = i as i32;
        }
        let mut fir = FirS32::new(coefficients, 0).unwrap();
        let mut y = 0;
        for _ in 0..16 {
            y = fir.apply(UNITY_Q30);
        }
        assert_eq!(y, 16 * 15 / 2);
    }

    #[test]
    fn output_shift_rounds() {
        let mut fir = FirS32::new([UNITY_Q30; 32], 6).unwrap();
        let mut y = 0;
        for _ in 0..32 {
            y = fir.apply(UNITY_Q30);
        }
        assert_eq!(y, ((32i64 << 30) >> 6) as i32);

        let mut fir = FirS16::new([1, 1, 1], 1).unwrap();
        fir.add_sample(1);
        fir.add_sample(1);
        assert_eq!(fir.apply(1), 2);
        assert_eq!(fir.apply(-2), 0);
    }

    #[test]
    fn saturation_is_symmetric() {
        let mut fir = FirS32::new([UNITY_Q30; 4], 0).unwrap();
        for _ in 0..4 {
            fir.apply(i32::MIN);
        }
        assert_eq!(fir.apply(i32::MIN), -i32::MAX);
        let mut fir = FirS16::new([i16::MAX; 2], 0).unwrap();
        assert_eq!(fir.apply(i16::MAX), i16::MAX);
    }

    #[test]
    fn add_sample_keeps_order() {
        let mut fir = FirS16::new([1, 10, 100], 0).unwrap();
        fir.add_sample(1);
        fir.add_sample(2);
        assert_eq!(fir.apply(3), 3 + 20 + 100);
        fir.reset();
        assert_eq!(fir.apply(4), 4);
    }

    #[test]
    fn lane_split_matches_single_accumulator() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xf1);
        let mut coefficients = [0i32; 61];
        for c in coefficients.iter_mut() {
            *c = rng.gen();
        }
        let mut fir = FirS32::new(coefficients, 9).unwrap();
        for _ in 0..200 {
            fir.add_sample(rng.gen());
            assert_eq!(fir.accumulate(), single_accumulator(&fir));
        }
    }

    #[test]
    fn zero_taps_rejected() {
        assert_eq!(FirS32::<0>::new([], 0).unwrap_err(), FilterError::NoTaps);
    }
}
