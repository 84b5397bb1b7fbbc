//! Claim aggregate

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, UserId};

use crate::error::ClaimError;
use crate::verification::{HoursBand, VerificationResult, HOURS_LIMIT};

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Captured but not yet submitted
    Draft,
    /// Submitted and awaiting a review decision
    Submitted,
    /// Escalated for closer inspection
    UnderReview,
    /// Approved by a reviewer
    Approved,
    /// Rejected by a reviewer
    Rejected,
    /// Paid out and archived
    Completed,
}

impl ClaimStatus {
    /// Returns the canonical string form used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Draft => "Draft",
            ClaimStatus::Submitted => "Submitted",
            ClaimStatus::UnderReview => "UnderReview",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
            ClaimStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monthly pay claim raised by a lecturer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Owning lecturer, immutable after creation
    pub lecturer_id: UserId,
    /// Claim month, normalized to the first of the month
    pub claim_month: NaiveDate,
    /// Hours worked in the claim month
    pub hours_worked: Decimal,
    /// Agreed hourly rate
    pub hourly_rate: Decimal,
    /// Derived total, always hours x rate
    pub total_amount: Decimal,
    /// Free-text work description
    pub description: Option<String>,
    /// Status
    pub status: ClaimStatus,
    /// Submission timestamp, set once at creation
    pub submitted_at: DateTime<Utc>,
    /// Whether automated verification flagged this claim
    pub is_auto_flagged: bool,
    /// Summary written by automated verification
    pub auto_verification_notes: Option<String>,
    /// When automated verification ran
    pub auto_verified_at: Option<DateTime<Utc>>,
}

impl Claim {
    /// Creates a newly submitted claim
    ///
    /// The claim always starts as `Submitted`; policy violations annotate it
    /// for reviewers but never change the initial status. The claim month is
    /// normalized to the first day of its month and the total is derived from
    /// the measures.
    pub fn submission(
        lecturer_id: UserId,
        claim_month: NaiveDate,
        hours_worked: Decimal,
        hourly_rate: Decimal,
        description: Option<String>,
    ) -> Self {
        let claim_month = first_of_month(claim_month);
        Self {
            id: ClaimId::new_v7(),
            lecturer_id,
            claim_month,
            hours_worked,
            hourly_rate,
            total_amount: hours_worked * hourly_rate,
            description,
            status: ClaimStatus::Submitted,
            submitted_at: Utc::now(),
            is_auto_flagged: false,
            auto_verification_notes: None,
            auto_verified_at: None,
        }
    }

    /// Changes the claim's measures, re-deriving the total
    pub fn update_measures(&mut self, hours_worked: Decimal, hourly_rate: Decimal) {
        self.hours_worked = hours_worked;
        self.hourly_rate = hourly_rate;
        self.recalculate_total();
    }

    /// Re-derives the total from the measures
    ///
    /// A pre-supplied total is never trusted; this runs before every
    /// persistence of the claim.
    pub fn recalculate_total(&mut self) {
        self.total_amount = self.hours_worked * self.hourly_rate;
    }

    /// Records the automated verification verdict on the claim
    ///
    /// Runs exactly once per claim, at submission time.
    pub fn apply_auto_verification(
        &mut self,
        result: &VerificationResult,
    ) -> Result<(), ClaimError> {
        if self.auto_verified_at.is_some() {
            return Err(ClaimError::AlreadyVerified(self.id));
        }

        self.auto_verified_at = Some(Utc::now());
        if result.has_errors() {
            self.is_auto_flagged = true;
            self.auto_verification_notes =
                Some(format!("AUTO-VERIFICATION: {}", result.summary()));
        } else {
            self.is_auto_flagged = false;
            self.auto_verification_notes =
                Some("AUTO-VERIFICATION: Passed all policy checks".to_string());
        }
        Ok(())
    }

    /// Updates the status through a validated transition
    pub fn update_status(&mut self, status: ClaimStatus) -> Result<(), ClaimError> {
        if !self.can_transition_to(status) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        self.status = status;
        Ok(())
    }

    /// True iff hours worked exceed the 160-hour cap
    pub fn exceeds_hours_limit(&self) -> bool {
        self.hours_worked > HOURS_LIMIT
    }

    /// Classifies the claim's hours against the monthly cap
    pub fn hours_band(&self) -> HoursBand {
        HoursBand::classify(self.hours_worked)
    }

    /// Checks if transition is valid
    ///
    /// Only submitted claims move, and only through a review decision. The
    /// remaining states have no defined exits in the core workflow.
    fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self.status, target),
            (Submitted, Approved) | (Submitted, Rejected)
        )
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    // from_ymd_opt cannot fail for day 1 of an existing month
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::evaluate;
    use rust_decimal_macros::dec;

    fn test_claim(hours: Decimal, rate: Decimal) -> Claim {
        Claim::submission(
            UserId::new(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            hours,
            rate,
            Some("March teaching hours".to_string()),
        )
    }

    #[test]
    fn test_submission_starts_submitted() {
        let claim = test_claim(dec!(120), dec!(50));
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert_eq!(claim.total_amount, dec!(6000));
        assert!(claim.auto_verified_at.is_none());
    }

    #[test]
    fn test_claim_month_normalized_to_first() {
        let claim = test_claim(dec!(120), dec!(50));
        assert_eq!(claim.claim_month, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_total_rederived_on_measure_change() {
        let mut claim = test_claim(dec!(120), dec!(50));
        claim.update_measures(dec!(100), dec!(60));
        assert_eq!(claim.total_amount, dec!(6000));

        claim.total_amount = dec!(1);
        claim.recalculate_total();
        assert_eq!(claim.total_amount, dec!(6000));
    }

    #[test]
    fn test_auto_verification_clean_claim() {
        let mut claim = test_claim(dec!(120), dec!(50));
        let result = evaluate(claim.hours_worked, claim.hourly_rate).unwrap();
        claim.apply_auto_verification(&result).unwrap();

        assert!(!claim.is_auto_flagged);
        assert_eq!(
            claim.auto_verification_notes.as_deref(),
            Some("AUTO-VERIFICATION: Passed all policy checks")
        );
        assert!(claim.auto_verified_at.is_some());
    }

    #[test]
    fn test_auto_verification_flagged_claim_stays_submitted() {
        let mut claim = test_claim(dec!(170), dec!(50));
        let result = evaluate(claim.hours_worked, claim.hourly_rate).unwrap();
        claim.apply_auto_verification(&result).unwrap();

        assert!(claim.is_auto_flagged);
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert_eq!(
            claim.auto_verification_notes.as_deref(),
            Some("AUTO-VERIFICATION: HOURS_EXCEEDED: 170 hours (Max: 160)")
        );
    }

    #[test]
    fn test_auto_verification_runs_only_once() {
        let mut claim = test_claim(dec!(120), dec!(50));
        let result = evaluate(claim.hours_worked, claim.hourly_rate).unwrap();
        claim.apply_auto_verification(&result).unwrap();

        let second = claim.apply_auto_verification(&result);
        assert!(matches!(second, Err(ClaimError::AlreadyVerified(_))));
    }

    #[test]
    fn test_submitted_can_be_approved() {
        let mut claim = test_claim(dec!(120), dec!(50));
        assert!(claim.update_status(ClaimStatus::Approved).is_ok());
        assert_eq!(claim.status, ClaimStatus::Approved);
    }

    #[test]
    fn test_submitted_can_be_rejected() {
        let mut claim = test_claim(dec!(120), dec!(50));
        assert!(claim.update_status(ClaimStatus::Rejected).is_ok());
    }

    #[test]
    fn test_approved_is_terminal() {
        let mut claim = test_claim(dec!(120), dec!(50));
        claim.update_status(ClaimStatus::Approved).unwrap();

        let result = claim.update_status(ClaimStatus::Rejected);
        assert!(matches!(
            result,
            Err(ClaimError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn test_submitted_cannot_jump_to_completed() {
        let mut claim = test_claim(dec!(120), dec!(50));
        assert!(claim.update_status(ClaimStatus::Completed).is_err());
        assert!(claim.update_status(ClaimStatus::Draft).is_err());
        assert!(claim.update_status(ClaimStatus::UnderReview).is_err());
    }

    #[test]
    fn test_serialization_round_trip() {
        let claim = test_claim(dec!(120), dec!(50));
        let json = serde_json::to_string(&claim).unwrap();
        let back: Claim = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, claim.id);
        assert_eq!(back.status, claim.status);
        assert_eq!(back.total_amount, claim.total_amount);
    }

    #[test]
    fn test_exceeds_hours_limit() {
        assert!(!test_claim(dec!(160), dec!(50)).exceeds_hours_limit());
        assert!(test_claim(dec!(160.25), dec!(50)).exceeds_hours_limit());
    }
}
