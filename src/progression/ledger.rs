//! Experience ledger
//!
//! Applies signed deltas to a member's total. Persistence and locking belong
//! to the caller; at most one `apply` per member may be in flight.

use super::resolver::LevelResolver;
use super::Level;
use crate::error::LevelError;

/// A total and the level derived from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standing {
    pub experience: f64,
    pub level: Level,
}

/// Result of applying a delta
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerOutcome {
    pub previous: Standing,
    pub current: Standing,
    /// Level differs from the previous one, in either direction
    pub leveled_up: bool,
}

impl LedgerOutcome {
    pub fn new_total(&self) -> f64 {
        self.current.experience
    }

    pub fn new_level(&self) -> Level {
        self.current.level
    }

    /// Change in levels, negative when the member dropped
    pub fn level_delta(&self) -> i64 {
        self.current.level as i64 - self.previous.level as i64
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Smallest 2-decimal value that is `>= value`
///
/// Falls back to `value` itself when cent rounding would land below it.
pub fn ceil2(value: f64) -> f64 {
    let rounded = (value * 100.0).ceil() / 100.0;
    if rounded >= value {
        rounded
    } else {
        value
    }
}

#[derive(Debug, Clone)]
pub struct ExperienceLedger {
    resolver: LevelResolver,
}

impl ExperienceLedger {
    pub fn new(resolver: LevelResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &LevelResolver {
        &self.resolver
    }

    /// Apply `delta` to `current_total`
    ///
    /// `stored_level` is the level persisted alongside the total. It is only
    /// compared against the derived level so drift gets logged; the derived
    /// level always wins.
    pub fn apply(
        &self,
        current_total: f64,
        stored_level: Option<Level>,
        delta: f64,
    ) -> Result<LedgerOutcome, LevelError> {
        if !delta.is_finite() {
            return Err(LevelError::NonFiniteExperience(delta));
        }
        let previous = self.standing(current_total, stored_level)?;
        let new_total = round2(current_total + delta).max(0.0);
        let current = Standing {
            experience: new_total,
            level: self.resolver.level_for(new_total)?,
        };
        Ok(LedgerOutcome {
            previous,
            current,
            leveled_up: current.level != previous.level,
        })
    }

    /// Replace the total outright (admin override)
    ///
    /// `new_total` is stored as given, so callers that need a level
    /// boundary to hold can rely on exactly the value they pass.
    pub fn set_total(
        &self,
        current_total: f64,
        stored_level: Option<Level>,
        new_total: f64,
    ) -> Result<LedgerOutcome, LevelError> {
        if !new_total.is_finite() {
            return Err(LevelError::NonFiniteExperience(new_total));
        }
        if new_total < 0.0 {
            return Err(LevelError::NegativeExperience(new_total));
        }
        let previous = self.standing(current_total, stored_level)?;
        let current = Standing {
            experience: new_total,
            level: self.resolver.level_for(new_total)?,
        };
        Ok(LedgerOutcome {
            previous,
            current,
            leveled_up: current.level != previous.level,
        })
    }

    /// Derive the standing for a stored total, reporting stale stored levels
    pub fn standing(&self, total: f64, stored_level: Option<Level>) -> Result<Standing, LevelError> {
        let level = self.resolver.level_for(total)?;
        if let Some(stored) = stored_level {
            if stored != level {
                log::warn!(
                    "Stored level {} disagrees with derived level {} for total {}; using derived",
                    stored,
                    level,
                    total
                );
            }
        }
        Ok(Standing {
            experience: total,
            level,
        })
    }
}
