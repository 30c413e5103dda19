//! Social Security and Medicare (FICA) tax.
//!
//! | Component            | Formula |
//! |----------------------|---------|
//! | Social Security      | `min(income, wage_base) × ss_rate` |
//! | Medicare             | `income × medicare_rate` |
//! | Additional Medicare  | `(income - threshold) × additional_rate`, only when `income > threshold` |
//!
//! Self-employed income pays both the employee and employer share, so both
//! components are doubled. Income treated as [`TaxTreatment::Other`]
//! (rental, investment) is not earned income and pays no FICA.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::{FicaParameters, TaxTreatment};
//! use budget_core::calculations::FicaCalculator;
//!
//! let params = FicaParameters {
//!     tax_year: 2023,
//!     social_security_rate: dec!(0.062),
//!     social_security_wage_base: dec!(160200),
//!     medicare_rate: dec!(0.0145),
//!     additional_medicare_rate: dec!(0.009),
//!     additional_medicare_threshold: dec!(200000),
//! };
//!
//! let fica = FicaCalculator::new(&params)
//!     .compute(dec!(200000), TaxTreatment::W2)
//!     .unwrap();
//!
//! assert_eq!(fica.social_security, dec!(9932.40));
//! assert_eq!(fica.medicare, dec!(2900.00));
//! assert_eq!(fica.total, dec!(12832.40));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use super::common::min;
use super::error::{CalculationError, ensure_non_negative};
use crate::models::{FicaBreakdown, FicaParameters, TaxTreatment};

#[derive(Debug, Clone, Copy)]
pub struct FicaCalculator<'a> {
    params: &'a FicaParameters,
}

impl<'a> FicaCalculator<'a> {
    pub fn new(params: &'a FicaParameters) -> Self {
        Self { params }
    }

    /// FICA on `annual_income` under the given treatment.
    ///
    /// # Errors
    ///
    /// [`CalculationError::NegativeInput`] when `annual_income` is negative.
    pub fn compute(
        &self,
        annual_income: Decimal,
        treatment: TaxTreatment,
    ) -> Result<FicaBreakdown, CalculationError> {
        let income = ensure_non_negative("annual_income", annual_income)?;

        let multiplier = match treatment {
            TaxTreatment::W2 => Decimal::ONE,
            TaxTreatment::SelfEmployed => Decimal::TWO,
            TaxTreatment::Other => return Ok(FicaBreakdown::default()),
        };

        let social_security = self.social_security(income) * multiplier;
        let medicare = self.medicare(income) * multiplier;

        debug!(
            income = %income,
            treatment = %treatment,
            social_security = %social_security,
            medicare = %medicare,
            "computed FICA"
        );

        Ok(FicaBreakdown::new(social_security, medicare))
    }

    /// Largest Social Security amount any income can owe under `treatment`.
    pub fn social_security_cap(
        &self,
        treatment: TaxTreatment,
    ) -> Decimal {
        let single_share =
            self.params.social_security_wage_base * self.params.social_security_rate;
        match treatment {
            TaxTreatment::W2 => single_share,
            TaxTreatment::SelfEmployed => single_share * Decimal::TWO,
            TaxTreatment::Other => Decimal::ZERO,
        }
    }

    fn social_security(
        &self,
        income: Decimal,
    ) -> Decimal {
        min(income, self.params.social_security_wage_base) * self.params.social_security_rate
    }

    fn medicare(
        &self,
        income: Decimal,
    ) -> Decimal {
        let base = income * self.params.medicare_rate;

        // Surtax applies to the excess only
        let excess = income - self.params.additional_medicare_threshold;
        if excess > Decimal::ZERO {
            base + excess * self.params.additional_medicare_rate
        } else {
            base
        }
    }
}
