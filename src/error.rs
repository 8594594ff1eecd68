use std::{
    error::Error,
    fmt::{Display, Formatter},
};

/// Convenience alias for functions that may fail with any error, mostly I/O facing code.
pub type TraceSightResult<T> = Result<T, Box<dyn Error>>;

/**
 * The errors that halt a processing run.
 *
 * A malformed record is never an error, it is silently dropped during cleaning and counted in the
 * [CleanReport](crate::CleanReport).
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceSightError {
    /// The raw input was not a sequence of records.
    InvalidInputShape {
        /// The JSON type that was found instead of an array.
        found: &'static str,
    },
    /// Cleaning left nothing to analyze.
    NoValidData {
        /// The number of raw records that were examined.
        total: usize,
    },
}

impl Display for TraceSightError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::InvalidInputShape { found } => {
                write!(f, "invalid input shape: expected an array of records, found {}", found)
            }
            Self::NoValidData { total } => {
                write!(f, "no valid data: all {} raw records were rejected", total)
            }
        }
    }
}

impl Error for TraceSightError {}
