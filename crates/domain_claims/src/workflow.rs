//! Approval workflow coordination
//!
//! Sequences role-gated review decisions over submitted claims, applies them
//! to the claim state machine, and appends immutable approval records. Each
//! operation is one read, one pure computation, and one atomic write; the
//! store is the sole arbiter of consistency.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use core_kernel::{ClaimId, UserId};

use crate::approval::{Approval, ApproverRole};
use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;
use crate::ports::ClaimStore;
use crate::verification::{evaluate, VerificationResult, HOURS_LIMIT};

/// Request to submit a new monthly claim
#[derive(Debug, Clone)]
pub struct SubmitClaim {
    pub lecturer_id: UserId,
    pub claim_month: NaiveDate,
    pub hours_worked: Decimal,
    pub hourly_rate: Decimal,
    pub description: Option<String>,
}

/// Result of a successful claim submission
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub claim: Claim,
    pub verification: VerificationResult,
    /// User-facing notice: passed, warned, or flagged for review
    pub message: String,
}

/// Request for a review decision on a submitted claim
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    pub claim_id: ClaimId,
    pub approver_id: UserId,
    pub role: ApproverRole,
    pub approved: bool,
    pub comments: String,
}

/// Result of a successful review decision
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub status: ClaimStatus,
    pub approval: Approval,
    /// User-facing notice distinguishing plain, override, and warned
    /// approvals from rejections
    pub message: String,
}

/// Coordinates claim submission and the review decision protocol
#[derive(Clone)]
pub struct ClaimWorkflow {
    store: Arc<dyn ClaimStore>,
}

impl ClaimWorkflow {
    /// Creates a workflow over the given store
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self { store }
    }

    /// Submits a new claim after automated policy screening
    ///
    /// The claim always lands as `Submitted`; violations set the auto-flag
    /// and notes for human reviewers but never auto-reject or re-route.
    /// The document count is fetched for the outcome message only; if that
    /// read fails the suffix is omitted and the submission still succeeds.
    ///
    /// # Errors
    ///
    /// [`ClaimError::Validation`] for non-positive measures;
    /// [`ClaimError::Storage`] when the insert fails (nothing persisted).
    pub async fn submit_claim(&self, request: SubmitClaim) -> Result<SubmissionOutcome, ClaimError> {
        let verification = evaluate(request.hours_worked, request.hourly_rate)?;

        let mut claim = Claim::submission(
            request.lecturer_id,
            request.claim_month,
            request.hours_worked,
            request.hourly_rate,
            request.description,
        );
        claim.recalculate_total();
        claim.apply_auto_verification(&verification)?;

        self.store.insert_claim(&claim).await?;

        let mut message = if claim.exceeds_hours_limit() {
            warn!(claim_id = %claim.id, hours = %claim.hours_worked, "claim flagged by hours policy");
            format!(
                "Claim submitted but flagged for review: {} hours exceeds {}-hour limit.",
                claim.hours_worked, HOURS_LIMIT
            )
        } else if verification.has_warnings() {
            "Claim submitted but has warnings that require review.".to_string()
        } else {
            "Claim submitted successfully and passed all policy checks!".to_string()
        };

        // The count feeds messaging only; the claim is already persisted, so
        // a failed read must not surface as a submission error.
        match self.store.document_count(claim.id).await {
            Ok(documents) if documents > 0 => {
                message.push_str(&format!(" {documents} document(s) uploaded."));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(claim_id = %claim.id, error = %e, "document count unavailable");
            }
        }

        info!(claim_id = %claim.id, lecturer_id = %claim.lecturer_id,
              flagged = claim.is_auto_flagged, "claim submitted");

        Ok(SubmissionOutcome {
            claim,
            verification,
            message,
        })
    }

    /// Applies a review decision to a submitted claim
    ///
    /// Re-runs the policy evaluator against the claim's current measures,
    /// augments the reviewer's comments with policy annotations, transitions
    /// the status, and persists status plus approval atomically. Either
    /// reviewer stage alone finalizes the claim.
    ///
    /// # Errors
    ///
    /// [`ClaimError::NotFound`] when the claim does not exist;
    /// [`ClaimError::Unauthorized`] when the role cannot decide;
    /// [`ClaimError::InvalidStatusTransition`] when the claim was already
    /// decided; [`ClaimError::Storage`] when the atomic write fails, in
    /// which case the claim and its prior approvals are unchanged.
    pub async fn decide(&self, request: DecisionRequest) -> Result<DecisionOutcome, ClaimError> {
        if !request.role.can_decide() {
            return Err(ClaimError::Unauthorized { role: request.role });
        }

        let mut claim = self.store.get_claim(request.claim_id).await.map_err(|e| {
            if e.is_not_found() {
                ClaimError::NotFound(request.claim_id)
            } else {
                ClaimError::Storage(e)
            }
        })?;

        // The stored measures are authoritative; never assume a stale verdict
        let verification = evaluate(claim.hours_worked, claim.hourly_rate)?;
        let exceeds_limit = claim.exceeds_hours_limit();

        let mut comments = request.comments;
        if request.approved {
            if exceeds_limit {
                comments.push_str(&format!(
                    " [POLICY OVERRIDE: Claim exceeds {}-hour limit ({} hours)]",
                    HOURS_LIMIT, claim.hours_worked
                ));
            } else if verification.has_warnings() {
                comments.push_str(&format!(
                    " [Reviewed with warnings: {}]",
                    verification.warnings.join(", ")
                ));
            }
        } else if exceeds_limit {
            comments.push_str(&format!(
                " [Rejected: Exceeds {}-hour policy limit]",
                HOURS_LIMIT
            ));
        }

        let target = if request.approved {
            ClaimStatus::Approved
        } else {
            ClaimStatus::Rejected
        };
        claim.update_status(target)?;
        claim.recalculate_total();

        let approval = Approval::record(
            claim.id,
            request.approver_id,
            request.role,
            request.approved,
            comments,
        );

        self.store.record_decision(&claim, &approval).await?;

        let message = if request.approved {
            if exceeds_limit {
                format!(
                    "Claim {} approved with policy override - {} hours exceeds {}-hour limit.",
                    claim.id, claim.hours_worked, HOURS_LIMIT
                )
            } else if verification.has_warnings() {
                format!("Claim {} approved with warnings.", claim.id)
            } else {
                format!("Claim {} approved successfully.", claim.id)
            }
        } else {
            format!("Claim {} has been rejected.", claim.id)
        };

        info!(claim_id = %claim.id, approver_id = %request.approver_id,
              role = %request.role, approved = request.approved,
              status = %claim.status, "review decision recorded");

        Ok(DecisionOutcome {
            status: claim.status,
            approval,
            message,
        })
    }

    /// All claims owned by a lecturer, newest first
    pub async fn claims_for_lecturer(&self, lecturer_id: UserId) -> Result<Vec<Claim>, ClaimError> {
        Ok(self.store.claims_for_lecturer(lecturer_id).await?)
    }

    /// Submitted claims awaiting review, newest first
    pub async fn claims_pending_review(&self) -> Result<Vec<Claim>, ClaimError> {
        Ok(self.store.claims_pending_review().await?)
    }

    /// Approval trail for a claim, newest first
    pub async fn approvals_for_claim(&self, claim_id: ClaimId) -> Result<Vec<Approval>, ClaimError> {
        Ok(self.store.approvals_for_claim(claim_id).await?)
    }
}
