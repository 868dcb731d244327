//! Leaderboard ranking

use crate::ids::UserId;
use crate::progression::Level;
use crate::save::MemberRecord;

/// One ranked row
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based
    pub rank: usize,
    pub user: UserId,
    pub experience: f64,
    pub level: Level,
}

/// Rank members by experience, highest first
///
/// Ties keep user id order so the board is stable between refreshes.
/// Blacklisted members are left off.
pub fn rank_members(mut members: Vec<(UserId, MemberRecord)>, limit: usize) -> Vec<LeaderboardEntry> {
    members.retain(|(_, record)| !record.blacklisted);
    members.sort_by(|(a_user, a), (b_user, b)| {
        b.experience
            .total_cmp(&a.experience)
            .then_with(|| a_user.cmp(b_user))
    });
    members
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (user, record))| LeaderboardEntry {
            rank: i + 1,
            user,
            experience: record.experience,
            level: record.level,
        })
        .collect()
}
