use std::collections::HashSet;

use crate::error::ApiError;

/// Standard role granted to every task-list user.
pub const TASK_USER: &str = "TaskUser";
/// Administrative role permitting cross-owner reads.
pub const TASK_ADMIN: &str = "TaskAdmin";

/// Named authorization policies. Item-level CRUD uses `Standard`; the
/// cross-owner list endpoint uses `Admin`. Two fixed policies only, this is
/// not a general policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    Standard,
    Admin,
}

impl AccessPolicy {
    /// Roles that satisfy this policy. Admission is OR-of-roles: holding any
    /// one of them is enough.
    pub fn required_roles(&self) -> &'static [&'static str] {
        match self {
            AccessPolicy::Standard => &[TASK_USER],
            AccessPolicy::Admin => &[TASK_ADMIN],
        }
    }
}

/// Admit the caller iff their role set intersects the policy's required
/// roles. An empty caller set is an ordinary rejection; absence of a matching
/// role is the only rejection reason at this layer.
pub fn authorize(policy: AccessPolicy, caller_roles: &HashSet<String>) -> Result<(), ApiError> {
    let admitted = policy
        .required_roles()
        .iter()
        .any(|role| caller_roles.contains(*role));

    if admitted {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Not authorized"))
    }
}
