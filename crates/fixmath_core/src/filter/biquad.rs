//! Cascaded second-order IIR sections.
//!
//! Coefficients are Q2.30 and ordered `[b0, b1, b2, a1, a2]`, with the
//! feedback terms added:
//!
//! `y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] + a1·y[n-1] + a2·y[n-2]`
//!
//! Each product is rounded to nearest on its own before the sum. Adjacent
//! sections share history: the output history of section `s` is the input
//! history of section `s + 1`.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::filter::mul_q30;
use crate::word::Word;

pub const BIQUAD_MAX_SECTIONS: usize = 8;

/// Up to eight biquad sections run in series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiquadS32 {
    coefficients: [[i32; 5]; BIQUAD_MAX_SECTIONS],
    sections: usize,
    /// `state[s]` holds `[x[n-1], x[n-2]]` for section `s`.
    state: [[i32; 2]; BIQUAD_MAX_SECTIONS + 1],
}

impl BiquadS32 {
    pub fn new(sections: &[[i32; 5]]) -> Result<Self, FilterError> {
        if sections.is_empty() || sections.len() > BIQUAD_MAX_SECTIONS {
            return Err(FilterError::SectionCount {
                requested: sections.len(),
                max: BIQUAD_MAX_SECTIONS,
            });
        }
        let mut coefficients = [[0; 5]; BIQUAD_MAX_SECTIONS];
        coefficients[..sections.len()].copy_from_slice(sections);
        Ok(Self {
            coefficients,
            sections: sections.len(),
            state: [[0; 2]; BIQUAD_MAX_SECTIONS + 1],
        })
    }

    pub fn sections(&self) -> usize {
        self.sections
    }

    pub fn coefficients(&self) -> &[[i32; 5]] {
        &self.coefficients[..self.sections]
    }

    /// Run one sample through every section.
    pub fn apply(&mut self, sample: i32) -> i32 {
        let mut v = sample;
        for s in 0..self.sections {
            let [b0, b1, b2, a1, a2] = self.coefficients[s];
            let [x1, x2] = self.state[s];
            let [y1, y2] = self.state[s + 1];
            let acc = mul_q30(b0, v)
                + mul_q30(b1, x1)
                + mul_q30(b2, x2)
                + mul_q30(a1, y1)
                + mul_q30(a2, y2);
            self.state[s] = [v, x1];
            v = i32::saturate_symmetric(acc as i128);
        }
        let last = &mut self.state[self.sections];
        *last = [v, last[0]];
        v
    }

    /// Zero all section histories.
    pub fn reset(&mut self) {
        self.state = [[0; 2]; BIQUAD_MAX_SECTIONS + 1];
    }
}

/// Run one sample through a chain of cascades, for designs with more than
/// [`BIQUAD_MAX_SECTIONS`] sections.
pub fn apply_biquads(cascades: &mut [BiquadS32], sample: i32) -> i32 {
    cascades.iter_mut().fold(sample, |v, b| b.apply(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: i32 = 0x4000_0000;

    fn run(filter: &mut BiquadS32, input: &[i32]) -> Vec<i32> {
        input.iter().map(|&x| filter.apply(x)).collect()
    }

    #[test]
    fn single_section_unity_coefficients() {
        let mut f = BiquadS32::new(&[[ONE; 5]]).unwrap();
        assert_eq!(run(&mut f, &[100, 50, 4000]), vec![100, 250, 4500]);
    }

    #[test]
    fn sections_share_history() {
        let mut f = BiquadS32::new(&[[ONE; 5]; 2]).unwrap();
        assert_eq!(run(&mut f, &[100, 50, 4000]), vec![100, 450, 5400]);

        let mut f = BiquadS32::new(&[[ONE; 5], [ONE; 5], [0x2000_0000; 5]]).unwrap();
        assert_eq!(run(&mut f, &[100, 50, 4000]), vec![50, 300, 3150]);
    }

    #[test]
    fn output_saturates_symmetrically() {
        let mut f = BiquadS32::new(&[[0x6000_0000, 0, 0, 0, 0]]).unwrap();
        assert_eq!(
            run(&mut f, &[100, 50, i32::MAX, i32::MIN]),
            vec![150, 75, i32::MAX, -i32::MAX]
        );
    }

    #[test]
    fn per_product_rounding_accumulates_drift() {
        let coefficients = [
            ONE,
            0xa000_0000u32 as i32,
            0x2400_0000,
            0x6000_0000,
            0xdc00_0000u32 as i32,
        ];
        let mut f = BiquadS32::new(&[coefficients]).unwrap();
        assert_eq!(
            run(&mut f, &[1_073_741_823; 4]),
            vec![1_073_741_823, 1_073_741_824, 1_073_741_825, 1_073_741_826]
        );
    }

    #[test]
    fn reset_restores_initial_response() {
        let mut f = BiquadS32::new(&[[ONE; 5]; 2]).unwrap();
        let first = run(&mut f, &[100, 50, 4000]);
        f.reset();
        assert_eq!(run(&mut f, &[100, 50, 4000]), first);
    }

    #[test]
    fn section_count_is_bounded() {
        assert_eq!(
            BiquadS32::new(&[]).unwrap_err(),
            FilterError::SectionCount {
                requested: 0,
                max: 8
            }
        );
        assert!(BiquadS32::new(&[[ONE; 5]; 9]).is_err());
        assert_eq!(BiquadS32::new(&[[ONE; 5]; 8]).unwrap().sections(), 8);
    }

    #[test]
    fn chained_cascades_match_one_cascade() {
        let mut one = BiquadS32::new(&[[ONE; 5]; 2]).unwrap();
        let mut chain = [
            BiquadS32::new(&[[ONE; 5]]).unwrap(),
            BiquadS32::new(&[[ONE; 5]]).unwrap(),
        ];
        let input = [100, 50, 4000];
        let chained: Vec<i32> = input.iter().map(|&x| apply_biquads(&mut chain, x)).collect();
        assert_eq!(chained, run(&mut one, &input));
    }
}
