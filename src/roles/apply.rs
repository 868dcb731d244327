//! Applying role plans against the platform

use std::collections::BTreeSet;

use super::reconcile::RolePlan;
use crate::error::RoleError;
use crate::ids::{MemberKey, RoleId};

/// Platform role operations
///
/// Implementations wrap the chat platform SDK. Methods take `&self` so one
/// gateway can serve concurrent event sources.
pub trait RoleGateway: Send + Sync {
    /// Whether the role still exists in the member's guild
    fn role_exists(&self, member: MemberKey, role: RoleId) -> bool;

    /// Roles the member currently holds
    fn member_roles(&self, member: MemberKey) -> Result<BTreeSet<RoleId>, RoleError>;

    fn grant_role(&self, member: MemberKey, role: RoleId) -> Result<(), RoleError>;

    fn revoke_role(&self, member: MemberKey, role: RoleId) -> Result<(), RoleError>;
}

/// Which way a role operation went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOp {
    Grant,
    Revoke,
}

/// A single failed role operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleFailure {
    pub role: RoleId,
    pub op: RoleOp,
    pub error: RoleError,
}

/// Outcome of applying a plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleApplyReport {
    pub granted: Vec<RoleId>,
    pub revoked: Vec<RoleId>,
    pub failures: Vec<RoleFailure>,
}

impl RoleApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Apply every grant and revoke in `plan`
///
/// Each operation stands alone: a failure is recorded and the rest still
/// run. Transient errors are retried until `attempts` tries are used.
pub fn apply_plan<G: RoleGateway + ?Sized>(
    gateway: &G,
    member: MemberKey,
    plan: &RolePlan,
    attempts: u32,
) -> RoleApplyReport {
    let mut report = RoleApplyReport::default();

    for &role in &plan.grants {
        match with_retry(attempts, || gateway.grant_role(member, role)) {
            Ok(()) => {
                log::info!("Granted role {} to member {}", role, member);
                report.granted.push(role);
            }
            Err(error) => {
                log::warn!("Failed to grant role {} to member {}: {}", role, member, error);
                report.failures.push(RoleFailure { role, op: RoleOp::Grant, error });
            }
        }
    }

    for &role in &plan.revokes {
        match with_retry(attempts, || gateway.revoke_role(member, role)) {
            Ok(()) => {
                log::info!("Revoked role {} from member {}", role, member);
                report.revoked.push(role);
            }
            Err(error) => {
                log::warn!("Failed to revoke role {} from member {}: {}", role, member, error);
                report.failures.push(RoleFailure { role, op: RoleOp::Revoke, error });
            }
        }
    }

    report
}

fn with_retry<F>(attempts: u32, mut op: F) -> Result<(), RoleError>
where
    F: FnMut() -> Result<(), RoleError>,
{
    let attempts = attempts.max(1);
    let mut tried = 0;
    loop {
        tried += 1;
        match op() {
            Err(e) if e.is_transient() && tried < attempts => {
                log::debug!("Transient role error (attempt {}/{}): {}", tried, attempts, e);
            }
            result => return result,
        }
    }
}
