//! Automated policy verification
//!
//! Screens a claim's measures against the institutional pay policies. This is
//! a pure function: same inputs always produce the same outcome, no I/O, no
//! mutation of the claim. Out-of-range business values become violations, not
//! errors, because they are expected, recoverable conditions; structurally
//! invalid inputs (non-positive hours or rate) are rejected as validation
//! errors before any state change.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ClaimError;

/// Hard cap on monthly hours; anything above is a violation
pub const HOURS_LIMIT: Decimal = dec!(160);

/// Hours above this (and at or below the cap) are flagged as a warning
pub const HOURS_WARNING_THRESHOLD: Decimal = dec!(140);

/// Lowest hourly rate accepted by policy
pub const RATE_MIN: Decimal = dec!(15);

/// Highest hourly rate accepted by policy
pub const RATE_MAX: Decimal = dec!(200);

/// A hard policy violation found during verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyViolation {
    /// Hours worked exceed the 160-hour monthly cap
    HoursExceeded { hours: Decimal },
    /// Hourly rate falls outside the accepted $15-$200 window
    RateOutOfRange { rate: Decimal },
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::HoursExceeded { hours } => {
                write!(f, "HOURS_EXCEEDED: {} hours (Max: {})", hours, HOURS_LIMIT)
            }
            PolicyViolation::RateOutOfRange { rate } => {
                write!(
                    f,
                    "RATE_OUT_OF_RANGE: ${} (Allowed: ${}-${})",
                    rate, RATE_MIN, RATE_MAX
                )
            }
        }
    }
}

/// Classification of hours worked against the monthly cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoursBand {
    /// At or below the warning threshold
    WithinLimit,
    /// Above the warning threshold but within the cap
    Warning,
    /// Above the cap
    ExceedsLimit,
}

impl HoursBand {
    /// Classifies hours worked into a policy band
    pub fn classify(hours: Decimal) -> Self {
        if hours > HOURS_LIMIT {
            HoursBand::ExceedsLimit
        } else if hours > HOURS_WARNING_THRESHOLD {
            HoursBand::Warning
        } else {
            HoursBand::WithinLimit
        }
    }
}

/// Outcome of automated policy verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Hard violations, in evaluation order
    pub violations: Vec<PolicyViolation>,
    /// Non-blocking warning descriptions
    pub warnings: Vec<String>,
}

impl VerificationResult {
    /// True iff no violation was found
    pub fn is_approved(&self) -> bool {
        self.violations.is_empty()
    }

    /// True iff any hard violation is present
    pub fn has_errors(&self) -> bool {
        !self.violations.is_empty()
    }

    /// True iff hours fell in the warning band
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Human-readable issue strings, one per violation, in evaluation order
    pub fn issues(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }

    /// Renders all issues as a single summary string
    pub fn summary(&self) -> String {
        if self.violations.is_empty() {
            "No issues found".to_string()
        } else {
            self.issues().join(" | ")
        }
    }
}

/// Verifies hours worked and hourly rate against the pay policies
///
/// All violations are collected, never short-circuited:
/// 1. Hours-limit policy: hours above 160 is a violation; hours in
///    (140, 160] is a non-blocking warning.
/// 2. Rate-range policy: rate outside $15-$200 is a violation,
///    independent of hours.
///
/// # Errors
///
/// Returns [`ClaimError::Validation`] for non-positive hours or rate;
/// those never reach the policy rules.
pub fn evaluate(hours_worked: Decimal, hourly_rate: Decimal) -> Result<VerificationResult, ClaimError> {
    if hours_worked <= Decimal::ZERO {
        return Err(ClaimError::validation(format!(
            "Hours worked must be greater than zero (got {})",
            hours_worked
        )));
    }
    if hourly_rate <= Decimal::ZERO {
        return Err(ClaimError::validation(format!(
            "Hourly rate must be greater than zero (got {})",
            hourly_rate
        )));
    }

    let mut violations = Vec::new();
    let mut warnings = Vec::new();

    match HoursBand::classify(hours_worked) {
        HoursBand::ExceedsLimit => {
            violations.push(PolicyViolation::HoursExceeded { hours: hours_worked });
        }
        HoursBand::Warning => {
            warnings.push(format!(
                "Hours approaching {}-hour limit ({} hours)",
                HOURS_LIMIT, hours_worked
            ));
        }
        HoursBand::WithinLimit => {}
    }

    if hourly_rate < RATE_MIN || hourly_rate > RATE_MAX {
        violations.push(PolicyViolation::RateOutOfRange { rate: hourly_rate });
    }

    Ok(VerificationResult { violations, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_claim_passes() {
        let result = evaluate(dec!(120), dec!(50)).unwrap();
        assert!(result.is_approved());
        assert!(!result.has_errors());
        assert!(!result.has_warnings());
        assert!(result.issues().is_empty());
        assert_eq!(result.summary(), "No issues found");
    }

    #[test]
    fn test_hours_over_cap_is_violation() {
        let result = evaluate(dec!(170), dec!(50)).unwrap();
        assert!(!result.is_approved());
        assert!(result.has_errors());
        assert_eq!(
            result.issues(),
            vec!["HOURS_EXCEEDED: 170 hours (Max: 160)".to_string()]
        );
    }

    #[test]
    fn test_warning_band_is_not_a_violation() {
        let result = evaluate(dec!(150), dec!(50)).unwrap();
        assert!(result.is_approved());
        assert!(result.has_warnings());
        assert!(result.issues().is_empty());
    }

    #[test]
    fn test_cap_boundary_is_warning_not_violation() {
        let result = evaluate(dec!(160), dec!(50)).unwrap();
        assert!(result.is_approved());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_warning_threshold_boundary_is_clean() {
        let result = evaluate(dec!(140), dec!(50)).unwrap();
        assert!(result.is_approved());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_rate_below_minimum() {
        let result = evaluate(dec!(120), dec!(14.50)).unwrap();
        assert!(!result.is_approved());
        assert_eq!(
            result.issues(),
            vec!["RATE_OUT_OF_RANGE: $14.50 (Allowed: $15-$200)".to_string()]
        );
    }

    #[test]
    fn test_rate_above_maximum() {
        let result = evaluate(dec!(120), dec!(250)).unwrap();
        assert!(result.has_errors());
    }

    #[test]
    fn test_violations_are_collected_not_short_circuited() {
        let result = evaluate(dec!(170), dec!(250)).unwrap();
        assert_eq!(result.violations.len(), 2);
        assert_eq!(
            result.summary(),
            "HOURS_EXCEEDED: 170 hours (Max: 160) | RATE_OUT_OF_RANGE: $250 (Allowed: $15-$200)"
        );
    }

    #[test]
    fn test_non_positive_hours_rejected() {
        assert!(matches!(
            evaluate(dec!(0), dec!(50)),
            Err(ClaimError::Validation(_))
        ));
        assert!(matches!(
            evaluate(dec!(-5), dec!(50)),
            Err(ClaimError::Validation(_))
        ));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        assert!(matches!(
            evaluate(dec!(120), dec!(0)),
            Err(ClaimError::Validation(_))
        ));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let first = evaluate(dec!(150), dec!(50)).unwrap();
        let second = evaluate(dec!(150), dec!(50)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_hours_band_classification() {
        assert_eq!(HoursBand::classify(dec!(100)), HoursBand::WithinLimit);
        assert_eq!(HoursBand::classify(dec!(140)), HoursBand::WithinLimit);
        assert_eq!(HoursBand::classify(dec!(141)), HoursBand::Warning);
        assert_eq!(HoursBand::classify(dec!(160)), HoursBand::Warning);
        assert_eq!(HoursBand::classify(dec!(160.5)), HoursBand::ExceedsLimit);
    }
}
