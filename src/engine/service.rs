//! Level engine service
//!
//! Wires activity events through the ledger, the store, role reconciliation
//! and level-change notification. All mutations of one member run under
//! that member's lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use super::announce::{LevelChange, LevelNotifier};
use super::leaderboard::{rank_members, LeaderboardEntry};
use super::locks::MemberLocks;
use crate::config::Config;
use crate::error::{ConfigError, EngineError, LevelError};
use crate::ids::{GuildId, MemberKey, RoleId, UserId};
use crate::progression::{
    ceil2, round2, ChatWindow, ExperienceLedger, LedgerOutcome, Level, LevelCache, LevelProgress,
    LevelResolver, VoicePresence,
};
use crate::roles::{apply_plan, reconcile_with, RoleApplyReport, RoleGateway, RolePlan};
use crate::save::{ExperienceStore, MemberRecord};

/// Member state reported by the platform alongside an activity event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberPresence {
    /// Status is idle
    pub idle: bool,
    /// Connected to a voice channel
    pub in_voice: bool,
    /// Boosting the guild
    pub booster: bool,
}

/// Why an activity award was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Blacklisted,
    IdleInVoice,
}

/// Role side of a member update
#[derive(Debug)]
pub enum RoleSync {
    /// Guild has no level roles configured
    NoLevelRoles,
    Applied { plan: RolePlan, report: RoleApplyReport },
    /// Roles could not be read; experience was still saved
    Unavailable(EngineError),
}

impl RoleSync {
    pub fn report(&self) -> Option<&RoleApplyReport> {
        match self {
            RoleSync::Applied { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Result of a saved experience change
#[derive(Debug)]
pub struct MemberUpdate {
    pub member: MemberKey,
    pub outcome: LedgerOutcome,
    pub roles: RoleSync,
}

/// Result of an activity award
#[derive(Debug)]
pub enum AwardResult {
    Skipped(SkipReason),
    Applied(MemberUpdate),
}

impl AwardResult {
    pub fn update(&self) -> Option<&MemberUpdate> {
        match self {
            AwardResult::Applied(update) => Some(update),
            AwardResult::Skipped(_) => None,
        }
    }
}

/// Result of re-deriving one member's level and roles
#[derive(Debug)]
pub struct MemberSync {
    pub member: MemberKey,
    pub level: Level,
    /// Stored level was stale and got rewritten
    pub corrected: bool,
    pub roles: RoleSync,
}

/// Result of a guild-wide sweep
#[derive(Debug, Default)]
pub struct SweepReport {
    pub synced: usize,
    pub corrected: usize,
    pub role_failures: usize,
    pub failures: Vec<(UserId, EngineError)>,
}

/// The experience and level-role engine
pub struct LevelEngine<S, G, N> {
    config: Config,
    ledger: ExperienceLedger,
    store: S,
    gateway: G,
    notifier: N,
    locks: MemberLocks,
    chat: Mutex<HashMap<MemberKey, ChatWindow>>,
}

impl<S, G, N> LevelEngine<S, G, N>
where
    S: ExperienceStore,
    G: RoleGateway,
    N: LevelNotifier,
{
    /// Validate `config` and build an engine with its own threshold cache
    pub fn new(config: Config, store: S, gateway: G, notifier: N) -> Result<Self, ConfigError> {
        config.validate()?;
        let cache = Arc::new(LevelCache::new(config.curve()?));
        Self::with_cache(config, cache, store, gateway, notifier)
    }

    /// Build an engine sharing an existing cache
    pub fn with_cache(
        config: Config,
        cache: Arc<LevelCache>,
        store: S,
        gateway: G,
        notifier: N,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if *cache.curve() != config.curve()? {
            return Err(ConfigError::Invalid(
                "shared level cache was built from different constants".to_string(),
            ));
        }
        let resolver = LevelResolver::with_batch(cache, config.cache_batch);
        log::info!(
            "Level engine ready (experience constant {}, level constant {})",
            config.experience_constant,
            config.level_constant
        );
        Ok(Self {
            config,
            ledger: ExperienceLedger::new(resolver),
            store,
            gateway,
            notifier,
            locks: MemberLocks::new(),
            chat: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &LevelResolver {
        self.ledger.resolver()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ------------------------------------------------------------------
    // Activity
    // ------------------------------------------------------------------

    /// Award activity experience, honoring blacklist, idle and booster rules
    pub fn award(
        &self,
        member: MemberKey,
        amount: f64,
        presence: MemberPresence,
    ) -> Result<AwardResult, EngineError> {
        if !amount.is_finite() {
            return Err(LevelError::NonFiniteExperience(amount).into());
        }
        let amount = round2(self.config.activity.boosted(amount, presence.booster));

        self.locks.with_member(member, || -> Result<AwardResult, EngineError> {
            let record = self.store.load_member(member)?;
            if record.blacklisted {
                log::debug!("No experience for {}: blacklisted", member);
                return Ok(AwardResult::Skipped(SkipReason::Blacklisted));
            }
            if presence.idle && presence.in_voice {
                log::debug!("No experience for {}: idle in voice", member);
                return Ok(AwardResult::Skipped(SkipReason::IdleInVoice));
            }
            // A zero award still goes through so level roles get reconciled
            let outcome = self.ledger.apply(record.experience, Some(record.level), amount)?;
            self.commit(member, record, outcome).map(AwardResult::Applied)
        })
    }

    /// A chat message at `now`
    pub fn record_chat(
        &self,
        member: MemberKey,
        now: Instant,
        presence: MemberPresence,
    ) -> Result<AwardResult, EngineError> {
        let recent = {
            let mut chat = self.chat.lock();
            let recent = chat.entry(member).or_default().record(now);
            chat.retain(|_, window| !window.expired(now));
            recent
        };
        let amount = self.config.activity.chat_reward(recent, presence.in_voice);
        self.award(member, amount, presence)
    }

    /// One voice tick for a connected member
    pub fn record_voice(
        &self,
        member: MemberKey,
        voice: &VoicePresence,
        presence: MemberPresence,
    ) -> Result<AwardResult, EngineError> {
        let amount = self.config.activity.voice_reward(voice);
        self.award(member, amount, presence)
    }

    // ------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------

    /// Add or remove experience directly. Ignores blacklist and presence.
    pub fn adjust_experience(&self, member: MemberKey, delta: f64) -> Result<MemberUpdate, EngineError> {
        self.locks.with_member(member, || -> Result<MemberUpdate, EngineError> {
            let record = self.store.load_member(member)?;
            let outcome = self.ledger.apply(record.experience, Some(record.level), delta)?;
            self.commit(member, record, outcome)
        })
    }

    /// Put a member at the start of `level`
    pub fn set_level(&self, member: MemberKey, level: Level) -> Result<MemberUpdate, EngineError> {
        // Round up so the stored total never lands below the threshold
        let total = ceil2(self.resolver().experience_for_level(level)?);
        self.locks.with_member(member, || -> Result<MemberUpdate, EngineError> {
            let record = self.store.load_member(member)?;
            let outcome = self.ledger.set_total(record.experience, Some(record.level), total)?;
            self.commit(member, record, outcome)
        })
    }

    /// Flip the blacklist flag, returning the new value
    pub fn toggle_blacklist(&self, member: MemberKey) -> Result<bool, EngineError> {
        self.locks.with_member(member, || -> Result<bool, EngineError> {
            let mut record = self.store.load_member(member)?;
            record.blacklisted = !record.blacklisted;
            self.store.save_member(member, &record)?;
            log::info!("Member {} blacklisted: {}", member, record.blacklisted);
            Ok(record.blacklisted)
        })
    }

    /// Map `level` to `role` for `guild`
    pub fn set_level_role(&self, guild: GuildId, level: Level, role: RoleId) -> Result<(), EngineError> {
        if level == 0 {
            return Err(LevelError::InvalidLevel(level).into());
        }
        self.store.set_level_role(guild, level, role)?;
        log::info!("Guild {}: level {} now grants role {}", guild, level, role);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reconciliation
    // ------------------------------------------------------------------

    /// Re-derive a member's level from their total and reconcile roles
    pub fn sync_member(&self, member: MemberKey) -> Result<MemberSync, EngineError> {
        self.locks.with_member(member, || -> Result<MemberSync, EngineError> {
            let mut record = self.store.load_member(member)?;
            let standing = self.ledger.standing(record.experience, Some(record.level))?;
            let corrected = standing.level != record.level;
            if corrected {
                record.level = standing.level;
                self.store.save_member(member, &record)?;
            }
            Ok(MemberSync {
                member,
                level: standing.level,
                corrected,
                roles: self.sync_roles(member, standing.level),
            })
        })
    }

    /// Sync every stored member of `guild`. One member failing does not
    /// stop the sweep.
    pub fn sync_guild(&self, guild: GuildId) -> Result<SweepReport, EngineError> {
        let members = self.store.guild_members(guild)?;
        let mut report = SweepReport::default();

        for (user, _) in members {
            match self.sync_member(MemberKey { guild, user }) {
                Ok(sync) => {
                    report.synced += 1;
                    if sync.corrected {
                        report.corrected += 1;
                    }
                    if let Some(roles) = sync.roles.report() {
                        report.role_failures += roles.failures.len();
                    }
                }
                Err(e) => {
                    log::warn!("Failed to sync member {} of guild {}: {}", user, guild, e);
                    report.failures.push((user, e));
                }
            }
        }

        log::info!(
            "Guild {} sweep: {} synced, {} corrected, {} failed",
            guild,
            report.synced,
            report.corrected,
            report.failures.len()
        );
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn record(&self, member: MemberKey) -> Result<MemberRecord, EngineError> {
        Ok(self.store.load_member(member)?)
    }

    /// Level and progress derived from the stored total
    pub fn progress(&self, member: MemberKey) -> Result<LevelProgress, EngineError> {
        let record = self.store.load_member(member)?;
        Ok(self.resolver().progress(record.experience)?)
    }

    /// Top `limit` members of `guild`
    pub fn leaderboard(&self, guild: GuildId, limit: usize) -> Result<Vec<LeaderboardEntry>, EngineError> {
        Ok(rank_members(self.store.guild_members(guild)?, limit))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Persist `outcome`, reconcile roles, notify. Caller holds the member lock.
    fn commit(
        &self,
        member: MemberKey,
        mut record: MemberRecord,
        outcome: LedgerOutcome,
    ) -> Result<MemberUpdate, EngineError> {
        record.experience = outcome.current.experience;
        record.level = outcome.current.level;
        self.store.save_member(member, &record)?;

        log::debug!(
            "Member {}: {} -> {} xp, level {} -> {}",
            member,
            outcome.previous.experience,
            outcome.current.experience,
            outcome.previous.level,
            outcome.current.level
        );

        let roles = self.sync_roles(member, outcome.current.level);

        if outcome.leveled_up {
            self.notifier.level_changed(LevelChange {
                member,
                old_level: outcome.previous.level,
                new_level: outcome.current.level,
            });
        }

        Ok(MemberUpdate { member, outcome, roles })
    }

    fn sync_roles(&self, member: MemberKey, level: Level) -> RoleSync {
        let map = match self.store.level_roles(member.guild) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Could not load level roles for guild {}: {}", member.guild, e);
                return RoleSync::Unavailable(e.into());
            }
        };
        if map.is_empty() {
            log::debug!("No level roles configured for guild {}", member.guild);
            return RoleSync::NoLevelRoles;
        }
        let current = match self.gateway.member_roles(member) {
            Ok(roles) => roles,
            Err(e) => {
                log::warn!("Could not read roles of member {}: {}", member, e);
                return RoleSync::Unavailable(e.into());
            }
        };

        let plan = reconcile_with(&current, &map, level, |role| self.gateway.role_exists(member, role));
        let report = apply_plan(&self.gateway, member, &plan, self.config.role_attempts);
        RoleSync::Applied { plan, report }
    }
}
