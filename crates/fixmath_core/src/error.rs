//! Error types.
//!
//! Only representability problems are errors. Saturation in filters and block
//! transforms is an expected outcome and is reported through the clamped
//! values themselves.

use core::fmt;

/// A value could not be expressed in the requested format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    /// The magnitude does not fit the target width at the forced exponent.
    Overflow { exponent: i32, target_exp: i32 },
    /// NaN or infinity where a finite value was required.
    NotFinite,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::Overflow {
                exponent,
                target_exp,
            } => write!(
                f,
                "value with exponent {} overflows at forced exponent {}",
                exponent, target_exp
            ),
            ConversionError::NotFinite => write!(f, "value is not finite"),
        }
    }
}

/// Invalid filter shape at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    NoTaps,
    SectionCount { requested: usize, max: usize },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::NoTaps => write!(f, "FIR filter needs at least one tap"),
            FilterError::SectionCount { requested, max } => write!(
                f,
                "biquad cascade needs 1..={} sections, got {}",
                max, requested
            ),
        }
    }
}

/// Buffer length does not match the transform size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthMismatch {
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for LengthMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buffer length {} does not match transform size {}",
            self.actual, self.expected
        )
    }
}

/// Any error raised by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixmathError {
    Conversion(ConversionError),
    Filter(FilterError),
    Length(LengthMismatch),
    UnsupportedDctSize(usize),
}

impl fmt::Display for FixmathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixmathError::Conversion(e) => write!(f, "conversion: {}", e),
            FixmathError::Filter(e) => write!(f, "filter: {}", e),
            FixmathError::Length(e) => write!(f, "dct: {}", e),
            FixmathError::UnsupportedDctSize(n) => write!(f, "dct: unsupported size {}", n),
        }
    }
}

impl From<ConversionError> for FixmathError {
    fn from(e: ConversionError) -> Self {
        FixmathError::Conversion(e)
    }
}

impl From<FilterError> for FixmathError {
    fn from(e: FilterError) -> Self {
        FixmathError::Filter(e)
    }
}

impl From<LengthMismatch> for FixmathError {
    fn from(e: LengthMismatch) -> Self {
        FixmathError::Length(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConversionError {}
#[cfg(feature = "std")]
impl std::error::Error for FilterError {}
#[cfg(feature = "std")]
impl std::error::Error for LengthMismatch {}
#[cfg(feature = "std")]
impl std::error::Error for FixmathError {}
