//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for the claims system. Fixtures are consistent
//! and predictable so tests can assert on exact values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for claim measures
pub struct MeasureFixtures;

impl MeasureFixtures {
    /// Hours comfortably within policy
    pub fn normal_hours() -> Decimal {
        dec!(120)
    }

    /// Hours in the (140, 160] warning band
    pub fn warning_hours() -> Decimal {
        dec!(150)
    }

    /// Hours above the 160-hour cap
    pub fn excessive_hours() -> Decimal {
        dec!(170)
    }

    /// Rate within the $15-$200 window
    pub fn normal_rate() -> Decimal {
        dec!(50)
    }

    /// Rate below the $15 floor
    pub fn low_rate() -> Decimal {
        dec!(10)
    }

    /// Rate above the $200 ceiling
    pub fn high_rate() -> Decimal {
        dec!(250)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard claim month (March 2024)
    pub fn claim_month() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    /// A different claim month for multi-claim tests (April 2024)
    pub fn next_claim_month() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date")
    }
}
