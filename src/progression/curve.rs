//! Level cost curve
//!
//! Experience needed to advance from one level to the next.

use super::Level;
use crate::error::LevelError;

/// Cost curve `cost(level) = level * level^k + c`
///
/// `k` is the experience constant and `c` the flat per-level constant.
/// Both are fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelCurve {
    exponent: f64,
    constant: f64,
}

impl LevelCurve {
    /// Build a curve, rejecting constants that would allow a non-positive cost
    pub fn new(exponent: f64, constant: f64) -> Result<Self, LevelError> {
        if !exponent.is_finite() || exponent < 0.0 {
            return Err(LevelError::InvalidCurve(format!(
                "experience constant must be a finite number >= 0, got {}",
                exponent
            )));
        }
        if !constant.is_finite() || constant < 0.0 {
            return Err(LevelError::InvalidCurve(format!(
                "level constant must be a finite number >= 0, got {}",
                constant
            )));
        }
        Ok(Self { exponent, constant })
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Experience needed to go from `level` to `level + 1`
    pub fn cost(&self, level: Level) -> Result<f64, LevelError> {
        if level == 0 {
            return Err(LevelError::InvalidLevel(level));
        }
        Ok(self.cost_unchecked(level))
    }

    /// Same as [`cost`](Self::cost) for callers that already hold `level >= 1`.
    /// Always >= 1 because `level^(k+1) >= 1` and `c >= 0`.
    pub(crate) fn cost_unchecked(&self, level: Level) -> f64 {
        let l = level as f64;
        l * l.powf(self.exponent) + self.constant
    }
}
