//! Custom Test Assertions
//!
//! Specialized assertion helpers for domain types that give more meaningful
//! error messages than standard assertions.

use domain_claims::approval::Approval;
use domain_claims::claim::{Claim, ClaimStatus};

/// Asserts that a claim is in the expected status
pub fn assert_claim_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status, expected,
        "Claim {} is {}, expected {}",
        claim.id, claim.status, expected
    );
}

/// Asserts that a claim's total equals hours x rate
pub fn assert_total_consistent(claim: &Claim) {
    let expected = claim.hours_worked * claim.hourly_rate;
    assert_eq!(
        claim.total_amount, expected,
        "Claim {} total {} does not equal {} hours x {} rate",
        claim.id, claim.total_amount, claim.hours_worked, claim.hourly_rate
    );
}

/// Asserts that a claim was flagged by automated verification
pub fn assert_auto_flagged(claim: &Claim) {
    assert!(
        claim.is_auto_flagged,
        "Claim {} was not auto-flagged; notes: {:?}",
        claim.id, claim.auto_verification_notes
    );
    assert!(
        claim.auto_verified_at.is_some(),
        "Claim {} has no verification timestamp",
        claim.id
    );
}

/// Asserts that an approval's comments end with the given annotation
pub fn assert_comment_annotation(approval: &Approval, annotation: &str) {
    assert!(
        approval.comments().ends_with(annotation),
        "Approval {} comments {:?} do not end with {:?}",
        approval.id(),
        approval.comments(),
        annotation
    );
}
