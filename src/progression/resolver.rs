//! Experience total to level
//!
//! Levels use an inclusive boundary: reaching `threshold[L]` exactly means
//! level `L + 1`. A total of zero is level 1.

use std::sync::Arc;

use super::cache::{LevelCache, MAX_LEVEL};
use super::Level;
use crate::error::LevelError;

/// Default number of levels appended per cache growth step
pub const DEFAULT_BATCH: Level = 10;

/// Where a total sits inside its level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProgress {
    pub level: Level,
    /// Experience earned since reaching `level`
    pub into_level: f64,
    /// Experience between reaching `level` and reaching `level + 1`
    pub level_span: f64,
}

impl LevelProgress {
    /// Experience still missing for the next level
    pub fn remaining(&self) -> f64 {
        (self.level_span - self.into_level).max(0.0)
    }

    /// Fraction of the current level completed, 0.0 - 1.0
    pub fn fraction(&self) -> f64 {
        if self.level_span <= 0.0 {
            0.0
        } else {
            (self.into_level / self.level_span).clamp(0.0, 1.0)
        }
    }
}

/// Resolves levels against a shared [`LevelCache`]
#[derive(Debug, Clone)]
pub struct LevelResolver {
    cache: Arc<LevelCache>,
    batch: Level,
}

impl LevelResolver {
    pub fn new(cache: Arc<LevelCache>) -> Self {
        Self::with_batch(cache, DEFAULT_BATCH)
    }

    pub fn with_batch(cache: Arc<LevelCache>, batch: Level) -> Self {
        Self {
            cache,
            batch: batch.max(1),
        }
    }

    pub fn cache(&self) -> &Arc<LevelCache> {
        &self.cache
    }

    /// Level for a non-negative experience total
    ///
    /// Totals at or past `threshold[MAX_LEVEL]` have no level and are
    /// rejected.
    pub fn level_for(&self, total: f64) -> Result<Level, LevelError> {
        check_total(total)?;
        loop {
            if let Some(reached) = self.cache.count_reached(total) {
                // threshold[0] = 0 is always reached, so `reached >= 1`
                return Ok(reached as Level);
            }
            let highest = self.cache.highest_level();
            if highest >= MAX_LEVEL {
                return Err(LevelError::ExperienceTooHigh(total));
            }
            self.cache.ensure(highest.saturating_add(self.batch).min(MAX_LEVEL))?;
        }
    }

    /// Minimum total that resolves to `level`
    pub fn experience_for_level(&self, level: Level) -> Result<f64, LevelError> {
        if level == 0 {
            return Err(LevelError::InvalidLevel(level));
        }
        if level > MAX_LEVEL {
            return Err(LevelError::LevelTooHigh(level));
        }
        self.cache.threshold(level - 1)
    }

    /// Level plus position within it
    pub fn progress(&self, total: f64) -> Result<LevelProgress, LevelError> {
        let level = self.level_for(total)?;
        let floor = self.cache.threshold(level - 1)?;
        let ceiling = self.cache.threshold(level)?;
        Ok(LevelProgress {
            level,
            into_level: total - floor,
            level_span: ceiling - floor,
        })
    }
}

fn check_total(total: f64) -> Result<(), LevelError> {
    if !total.is_finite() {
        return Err(LevelError::NonFiniteExperience(total));
    }
    if total < 0.0 {
        return Err(LevelError::NegativeExperience(total));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::LevelCurve;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn resolver() -> LevelResolver {
        let curve = LevelCurve::new(1.5, 30.0).unwrap();
        LevelResolver::new(Arc::new(LevelCache::new(curve)))
    }

    #[test]
    fn test_concrete_scenario() {
        let r = resolver();
        assert_eq!(r.cache().threshold(1).unwrap(), 31.0);
        assert_eq!(r.level_for(0.0).unwrap(), 1);
        assert_eq!(r.level_for(30.0).unwrap(), 1);
        assert_eq!(r.level_for(31.0).unwrap(), 2);
    }

    #[test]
    fn test_boundaries_exact() {
        let r = resolver();
        for level in 1..80 {
            let t = r.cache().threshold(level).unwrap();
            assert_eq!(r.level_for(t).unwrap(), level + 1, "at threshold {}", level);
            assert_eq!(r.level_for(t - 0.001).unwrap(), level, "below threshold {}", level);
        }
    }

    #[test]
    fn test_monotonic() {
        let r = resolver();
        let mut rng = StdRng::seed_from_u64(42);
        let mut totals: Vec<f64> = (0..2000).map(|_| rng.gen_range(0.0..250_000.0)).collect();
        totals.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mut last = 1;
        for total in totals {
            let level = r.level_for(total).unwrap();
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn test_grows_cache_on_demand() {
        let r = resolver();
        assert_eq!(r.cache().len(), 1);
        let level = r.level_for(1_000_000.0).unwrap();
        assert!(level > 1);
        assert!(r.cache().last_threshold() > 1_000_000.0);
        // Grown in whole batches past the initial entry
        assert_eq!((r.cache().len() - 1) % DEFAULT_BATCH as usize, 0);
    }

    #[test]
    fn test_agrees_with_iterative_subtraction() {
        let r = resolver();
        let curve = *r.cache().curve();
        for total in [0.0, 12.5, 31.0, 64.0, 500.0, 4321.75, 99_999.0] {
            let mut remaining = total;
            let mut level = 1;
            while remaining >= curve.cost(level).unwrap() {
                remaining -= curve.cost(level).unwrap();
                level += 1;
            }
            assert_eq!(r.level_for(total).unwrap(), level, "total {}", total);
        }
    }

    #[test]
    fn test_rejects_bad_totals() {
        let r = resolver();
        assert_eq!(r.level_for(-1.0), Err(LevelError::NegativeExperience(-1.0)));
        assert!(matches!(
            r.level_for(f64::INFINITY),
            Err(LevelError::NonFiniteExperience(_))
        ));
        assert!(matches!(r.level_for(f64::NAN), Err(LevelError::NonFiniteExperience(_))));
    }

    #[test]
    fn test_experience_for_level() {
        let r = resolver();
        assert_eq!(r.experience_for_level(1).unwrap(), 0.0);
        assert_eq!(r.experience_for_level(2).unwrap(), 31.0);
        assert_eq!(r.experience_for_level(0), Err(LevelError::InvalidLevel(0)));
        for level in 1..30 {
            let xp = r.experience_for_level(level).unwrap();
            assert_eq!(r.level_for(xp).unwrap(), level);
        }
    }

    #[test]
    fn test_progress() {
        let r = resolver();
        let p = r.progress(40.0).unwrap();
        assert_eq!(p.level, 2);
        assert_eq!(p.into_level, 9.0);
        let span = r.cache().curve().cost(2).unwrap();
        assert!((p.level_span - span).abs() < 1e-9);
        assert!(p.fraction() > 0.0 && p.fraction() < 1.0);
        assert!((p.remaining() - (span - 9.0)).abs() < 1e-9);
    }

    #[test]
    fn test_level_is_capped() {
        let r = resolver();
        assert_eq!(r.experience_for_level(u32::MAX), Err(LevelError::LevelTooHigh(u32::MAX)));
        assert_eq!(
            r.experience_for_level(MAX_LEVEL + 1),
            Err(LevelError::LevelTooHigh(MAX_LEVEL + 1))
        );

        let top = r.experience_for_level(MAX_LEVEL).unwrap();
        assert_eq!(r.level_for(top).unwrap(), MAX_LEVEL);

        // Finite but past the last threshold: an error, not an endless grow
        assert_eq!(r.level_for(1e40), Err(LevelError::ExperienceTooHigh(1e40)));
        assert_eq!(r.cache().highest_level(), MAX_LEVEL);
    }
}
