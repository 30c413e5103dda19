//! Conversion between periodic and annual amounts.
//!
//! | Frequency     | Periods per year |
//! |---------------|------------------|
//! | weekly        | 52               |
//! | biweekly      | 26               |
//! | semimonthly   | 24               |
//! | bimonthly     | 24               |
//! | monthly       | 12               |
//! | annually      | 1                |
//!
//! Strings are parsed into [`Frequency`] before they reach these functions,
//! so an unknown frequency is rejected with
//! [`InvalidFrequencyError`](crate::models::InvalidFrequencyError) up front.
//! Annualizing can overflow a `Decimal`; [`to_annual`] returns `None` then.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::Frequency;
//! use budget_core::calculations::{from_annual, to_annual};
//!
//! let annual = to_annual(dec!(2500), Frequency::Biweekly).unwrap();
//! assert_eq!(annual, dec!(65000));
//! assert_eq!(from_annual(annual, Frequency::Biweekly), dec!(2500));
//! ```

use rust_decimal::Decimal;

use crate::models::Frequency;

pub fn to_annual(
    amount: Decimal,
    frequency: Frequency,
) -> Option<Decimal> {
    frequency.annualize(amount)
}

pub fn from_annual(
    annual_amount: Decimal,
    frequency: Frequency,
) -> Decimal {
    annual_amount / frequency.periods_per_year()
}
