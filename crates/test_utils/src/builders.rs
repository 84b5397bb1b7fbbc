//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::UserId;
use domain_claims::claim::Claim;
use domain_claims::verification::evaluate;
use domain_claims::workflow::SubmitClaim;

use crate::fixtures::{MeasureFixtures, TemporalFixtures};

/// Builder for submitted test claims
pub struct TestClaimBuilder {
    lecturer_id: UserId,
    claim_month: NaiveDate,
    hours_worked: Decimal,
    hourly_rate: Decimal,
    description: Option<String>,
    auto_verified: bool,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// Creates a new builder with an in-policy claim
    pub fn new() -> Self {
        Self {
            lecturer_id: UserId::new(),
            claim_month: TemporalFixtures::claim_month(),
            hours_worked: MeasureFixtures::normal_hours(),
            hourly_rate: MeasureFixtures::normal_rate(),
            description: Some("Monthly teaching hours".to_string()),
            auto_verified: true,
        }
    }

    /// Sets the owning lecturer
    pub fn with_lecturer(mut self, lecturer_id: UserId) -> Self {
        self.lecturer_id = lecturer_id;
        self
    }

    /// Sets the claim month
    pub fn with_claim_month(mut self, month: NaiveDate) -> Self {
        self.claim_month = month;
        self
    }

    /// Sets hours worked
    pub fn with_hours(mut self, hours: Decimal) -> Self {
        self.hours_worked = hours;
        self
    }

    /// Sets the hourly rate
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.hourly_rate = rate;
        self
    }

    /// Sets the work description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Skips automated verification, leaving the claim unverified
    pub fn unverified(mut self) -> Self {
        self.auto_verified = false;
        self
    }

    /// Builds the claim
    pub fn build(self) -> Claim {
        let mut claim = Claim::submission(
            self.lecturer_id,
            self.claim_month,
            self.hours_worked,
            self.hourly_rate,
            self.description,
        );
        if self.auto_verified {
            let result = evaluate(self.hours_worked, self.hourly_rate)
                .expect("builder measures must be positive");
            claim
                .apply_auto_verification(&result)
                .expect("fresh claim is unverified");
        }
        claim
    }

    /// Builds a submission request instead of a claim
    pub fn build_request(self) -> SubmitClaim {
        SubmitClaim {
            lecturer_id: self.lecturer_id,
            claim_month: self.claim_month,
            hours_worked: self.hours_worked,
            hourly_rate: self.hourly_rate,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::claim::ClaimStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_builder_is_clean_and_submitted() {
        let claim = TestClaimBuilder::new().build();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert!(!claim.is_auto_flagged);
        assert_eq!(claim.total_amount, dec!(6000));
    }

    #[test]
    fn test_builder_flags_excessive_hours() {
        let claim = TestClaimBuilder::new()
            .with_hours(MeasureFixtures::excessive_hours())
            .build();
        assert!(claim.is_auto_flagged);
    }

    #[test]
    fn test_builder_flags_out_of_range_rates() {
        for rate in [MeasureFixtures::low_rate(), MeasureFixtures::high_rate()] {
            let claim = TestClaimBuilder::new().with_rate(rate).build();
            assert!(claim.is_auto_flagged, "rate {rate} should flag the claim");
        }
    }

    #[test]
    fn test_unverified_builder_skips_verification() {
        let claim = TestClaimBuilder::new().unverified().build();
        assert!(claim.auto_verified_at.is_none());
    }
}
