//! Cumulative threshold cache
//!
//! `threshold[0] = 0` and `threshold[L]` is the total experience needed to
//! have completed level `L`. Entries are only ever appended, and never past
//! [`MAX_LEVEL`].

use parking_lot::RwLock;

use super::curve::LevelCurve;
use super::Level;
use crate::error::LevelError;

/// Highest level the cache will hold a threshold for
pub const MAX_LEVEL: Level = 100_000;

/// Append-only table of cumulative experience thresholds
///
/// Shared between callers via `Arc`. Reads take a shared lock; growth
/// re-checks the length under the write lock so concurrent `ensure` calls
/// never append the same level twice.
#[derive(Debug)]
pub struct LevelCache {
    curve: LevelCurve,
    thresholds: RwLock<Vec<f64>>,
}

impl LevelCache {
    pub fn new(curve: LevelCurve) -> Self {
        Self {
            curve,
            thresholds: RwLock::new(vec![0.0]),
        }
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    /// Number of thresholds held (always >= 1)
    pub fn len(&self) -> usize {
        self.thresholds.read().len()
    }

    /// Highest level whose threshold is cached
    pub fn highest_level(&self) -> Level {
        (self.len() - 1) as Level
    }

    /// Make sure `threshold[target_level]` exists
    pub fn ensure(&self, target_level: Level) -> Result<(), LevelError> {
        if target_level > MAX_LEVEL {
            return Err(LevelError::LevelTooHigh(target_level));
        }
        let target = target_level as usize;
        if target < self.thresholds.read().len() {
            return Ok(());
        }

        let mut thresholds = self.thresholds.write();
        let start = thresholds.len();
        if target < start {
            // Another caller grew it while we waited
            return Ok(());
        }
        thresholds.reserve(target + 1 - start);
        let mut total = thresholds[start - 1];
        for level in start..=target {
            total += self.curve.cost_unchecked(level as Level);
            thresholds.push(total);
        }
        log::debug!("Level cache grown to level {}", target);
        Ok(())
    }

    /// `threshold[0..=target_level]`, growing the cache first if needed
    pub fn thresholds_up_to(&self, target_level: Level) -> Result<Vec<f64>, LevelError> {
        self.ensure(target_level)?;
        let thresholds = self.thresholds.read();
        Ok(thresholds[..=target_level as usize].to_vec())
    }

    /// Single threshold, growing the cache first if needed
    pub fn threshold(&self, level: Level) -> Result<f64, LevelError> {
        self.ensure(level)?;
        Ok(self.thresholds.read()[level as usize])
    }

    /// Last cached threshold
    pub fn last_threshold(&self) -> f64 {
        let thresholds = self.thresholds.read();
        thresholds[thresholds.len() - 1]
    }

    /// Number of thresholds `<= total`, or `None` if the cache does not yet
    /// extend past `total`
    pub(crate) fn count_reached(&self, total: f64) -> Option<usize> {
        let thresholds = self.thresholds.read();
        if total >= thresholds[thresholds.len() - 1] {
            return None;
        }
        Some(thresholds.partition_point(|&t| t <= total))
    }
}
