//! Pre-built test data for common entities

use chrono::NaiveDate;
use core_kernel::Money;
use rust_decimal_macros::dec;

/// Common monetary amounts
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn billed_amount() -> Money {
        Money::usd(dec!(150.00))
    }

    pub fn partial_payment() -> Money {
        Money::usd(dec!(75.00))
    }
}

/// Common dates
pub struct DateFixtures;

impl DateFixtures {
    pub fn service_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date")
    }

    pub fn payment_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
    }
}

/// Common denial codes
pub struct DenialCodeFixtures;

impl DenialCodeFixtures {
    /// Appealable: not deemed medically necessary
    pub fn medical_necessity() -> &'static str {
        "CO-50"
    }

    /// Not appealable: timely filing limit expired
    pub fn timely_filing() -> &'static str {
        "CO-29"
    }
}
