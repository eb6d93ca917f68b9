//! Error type shared by the measurement core

use core::fmt;

/// Errors reported by fallible core operations
///
/// All variants are recoverable; the caller keeps its previous state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Requested accuracy is zero or larger than the cycle buffer capacity
    AccuracyOutOfRange { requested: u16, capacity: usize },
    /// Sample block too short for the trimmed-mean window
    InsufficientSamples { available: usize, required: usize },
    /// Sample block larger than the extractor's working buffer
    TooManySamples { available: usize, capacity: usize },
    /// Interleaved block does not contain whole left/right pairs
    UnpairedSamples { len: usize },
    /// Calibration table is too short or not monotonic
    InvalidTable,
    /// Stall timeout of zero polls would abort every run immediately
    ZeroStallTimeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AccuracyOutOfRange { requested, capacity } => {
                write!(f, "accuracy {} outside 1..={}", requested, capacity)
            }
            Error::InsufficientSamples {
                available,
                required,
            } => write!(
                f,
                "{} samples per channel, at least {} required",
                available, required
            ),
            Error::TooManySamples {
                available,
                capacity,
            } => write!(
                f,
                "{} samples per channel exceed capacity {}",
                available, capacity
            ),
            Error::UnpairedSamples { len } => {
                write!(f, "interleaved block of {} samples is not paired", len)
            }
            Error::InvalidTable => write!(f, "calibration table is not monotonic"),
            Error::ZeroStallTimeout => write!(f, "stall timeout must be at least one poll"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
