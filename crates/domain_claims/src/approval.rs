//! Approval audit records
//!
//! An [`Approval`] captures a single review decision. It is immutable once
//! created; the struct exposes read access only and carries no mutators, so
//! the audit trail can never be rewritten by domain code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ApprovalId, ClaimId, UserId};

use crate::error::ClaimError;

/// Role an actor holds when interacting with the claims workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApproverRole {
    /// Submits claims; cannot decide on them
    Lecturer,
    /// First-stage reviewer
    Coordinator,
    /// Manager-stage reviewer
    Manager,
    /// Views records for payroll; cannot decide
    Hr,
}

impl ApproverRole {
    /// Returns the canonical string form used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ApproverRole::Lecturer => "Lecturer",
            ApproverRole::Coordinator => "Coordinator",
            ApproverRole::Manager => "Manager",
            ApproverRole::Hr => "HR",
        }
    }

    /// True iff this role is authorized to decide on a submitted claim
    pub fn can_decide(&self) -> bool {
        matches!(self, ApproverRole::Coordinator | ApproverRole::Manager)
    }
}

impl fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApproverRole {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lecturer" => Ok(ApproverRole::Lecturer),
            "Coordinator" => Ok(ApproverRole::Coordinator),
            "Manager" => Ok(ApproverRole::Manager),
            "HR" => Ok(ApproverRole::Hr),
            other => Err(ClaimError::Validation(format!("Unknown role: {other}"))),
        }
    }
}

/// An immutable record of one review decision on a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    id: ApprovalId,
    claim_id: ClaimId,
    approver_id: UserId,
    /// Role held at decision time; recorded, not derived, because the
    /// approver's role may change later
    role: ApproverRole,
    approved: bool,
    comments: String,
    decided_at: DateTime<Utc>,
}

impl Approval {
    /// Records a new decision
    pub fn record(
        claim_id: ClaimId,
        approver_id: UserId,
        role: ApproverRole,
        approved: bool,
        comments: impl Into<String>,
    ) -> Self {
        Self {
            id: ApprovalId::new_v7(),
            claim_id,
            approver_id,
            role,
            approved,
            comments: comments.into(),
            decided_at: Utc::now(),
        }
    }

    /// Reconstructs a stored approval; for storage adapters only
    #[allow(clippy::too_many_arguments)]
    pub fn from_stored(
        id: ApprovalId,
        claim_id: ClaimId,
        approver_id: UserId,
        role: ApproverRole,
        approved: bool,
        comments: String,
        decided_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            claim_id,
            approver_id,
            role,
            approved,
            comments,
            decided_at,
        }
    }

    pub fn id(&self) -> ApprovalId {
        self.id
    }

    pub fn claim_id(&self) -> ClaimId {
        self.claim_id
    }

    pub fn approver_id(&self) -> UserId {
        self.approver_id
    }

    pub fn role(&self) -> ApproverRole {
        self.role
    }

    pub fn approved(&self) -> bool {
        self.approved
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn decided_at(&self) -> DateTime<Utc> {
        self.decided_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            ApproverRole::Lecturer,
            ApproverRole::Coordinator,
            ApproverRole::Manager,
            ApproverRole::Hr,
        ] {
            let parsed: ApproverRole = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = "Dean".parse::<ApproverRole>();
        assert!(matches!(result, Err(ClaimError::Validation(_))));
    }

    #[test]
    fn test_only_reviewers_can_decide() {
        assert!(ApproverRole::Coordinator.can_decide());
        assert!(ApproverRole::Manager.can_decide());
        assert!(!ApproverRole::Lecturer.can_decide());
        assert!(!ApproverRole::Hr.can_decide());
    }

    #[test]
    fn test_record_captures_decision() {
        let claim_id = ClaimId::new();
        let approver = UserId::new();
        let approval = Approval::record(
            claim_id,
            approver,
            ApproverRole::Coordinator,
            true,
            "Looks right",
        );

        assert_eq!(approval.claim_id(), claim_id);
        assert_eq!(approval.approver_id(), approver);
        assert_eq!(approval.role(), ApproverRole::Coordinator);
        assert!(approval.approved());
        assert_eq!(approval.comments(), "Looks right");
    }
}
