use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PercentError {
    #[error("percentage must be between 0 and 100, got {0}")]
    OutOfRange(u8),

    #[error("cannot compute a percentage over zero questions")]
    ZeroTotal,

    #[error("correct answers cannot exceed total questions")]
    CorrectExceedsTotal,
}

//
// ─── PERCENT ───────────────────────────────────────────────────────────────────
//

/// An integer percentage in `[0, 100]`.
///
/// Quiz results and stored lesson progress are always expressed as a
/// `Percent`; out-of-range values cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const FULL: Percent = Percent(100);

    /// Minimum score treated as a completed lesson; see [`crate::unlock`].
    pub(crate) const UNLOCK_THRESHOLD: Percent = Percent(70);

    /// Creates a new `Percent`.
    ///
    /// # Errors
    ///
    /// Returns `PercentError::OutOfRange` if `value` exceeds 100.
    pub fn new(value: u8) -> Result<Self, PercentError> {
        if value > 100 {
            return Err(PercentError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Computes the percentage of `correct` answers out of `total`,
    /// rounded half-up.
    ///
    /// # Errors
    ///
    /// Returns `PercentError::ZeroTotal` if `total` is zero and
    /// `PercentError::CorrectExceedsTotal` if `correct > total`.
    pub fn from_ratio(correct: usize, total: usize) -> Result<Self, PercentError> {
        if total == 0 {
            return Err(PercentError::ZeroTotal);
        }
        if correct > total {
            return Err(PercentError::CorrectExceedsTotal);
        }
        let rounded = (200 * correct + total) / (2 * total);
        // rounded <= 100 because correct <= total
        Ok(Self(u8::try_from(rounded).unwrap_or(100)))
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Percent {
    type Error = PercentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Percent::new(value)
    }
}

impl From<Percent> for u8 {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
