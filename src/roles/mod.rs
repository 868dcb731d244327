//! Level roles
//!
//! Keeps a member's roles in step with their level.

pub mod reconcile;
pub mod apply;

pub use crate::ids::RoleId;
pub use reconcile::{LevelRoleMap, RolePlan, reconcile, reconcile_with};
pub use apply::{RoleGateway, RoleOp, RoleFailure, RoleApplyReport, apply_plan};
