//! Single-income "what-if" tax estimate.
//!
//! Annualizes one income figure and runs the same withholding steps as the
//! budget pipeline, returning the bracket-by-bracket detail as well.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::calculations::{TaxEstimateRequest, TaxEstimator};
//! use budget_core::{
//!     BracketTable, FicaParameters, FilingStatusCode, Frequency, Jurisdiction, ReferenceData,
//!     StateCode, TaxProfile, TaxTreatment,
//! };
//!
//! let mut builder = ReferenceData::builder();
//! builder
//!     .add_table(BracketTable::flat(2024, Jurisdiction::Federal, FilingStatusCode::Single, dec!(0.12)).unwrap())
//!     .unwrap()
//!     .add_table(BracketTable::flat(2024, Jurisdiction::state("IL").unwrap(), FilingStatusCode::Single, dec!(0.0495)).unwrap())
//!     .unwrap()
//!     .add_fica(FicaParameters {
//!         tax_year: 2024,
//!         social_security_rate: dec!(0.062),
//!         social_security_wage_base: dec!(168600),
//!         medicare_rate: dec!(0.0145),
//!         additional_medicare_rate: dec!(0.009),
//!         additional_medicare_threshold: dec!(200000),
//!     })
//!     .unwrap();
//! let reference = builder.build();
//!
//! let request = TaxEstimateRequest::new(
//!     dec!(1000),
//!     Frequency::Weekly,
//!     TaxTreatment::Other,
//!     TaxProfile {
//!         tax_year: 2024,
//!         state: StateCode::new("IL").unwrap(),
//!         filing_status: FilingStatusCode::Single,
//!     },
//! );
//!
//! let estimate = TaxEstimator::new(&reference).estimate(&request).unwrap();
//!
//! assert_eq!(estimate.taxes.gross_income, dec!(52000));
//! assert_eq!(estimate.taxes.federal_tax, dec!(6240.00));
//! assert_eq!(estimate.taxes.fica.total, dec!(0));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{CalculationError, ensure_non_negative, out_of_range};
use super::frequency::{from_annual, to_annual};
use super::options::{BudgetOptions, StandardDeductionPolicy};
use super::progressive::{BracketSlice, ProgressiveTaxCalculator};
use super::withholding::{ReferenceUsage, WithholdingCalculator};
use crate::models::{Frequency, TaxCalculationResult, TaxProfile, TaxTreatment};
use crate::reference::TaxTableSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEstimateRequest {
    pub income: Decimal,
    pub frequency: Frequency,
    pub tax_treatment: TaxTreatment,
    pub profile: TaxProfile,
    /// Annual pre-tax deductions taken before the bracket walks.
    #[serde(default)]
    pub pre_tax_deductions: Decimal,
    #[serde(default)]
    pub standard_deduction: StandardDeductionPolicy,
}

impl TaxEstimateRequest {
    pub fn new(
        income: Decimal,
        frequency: Frequency,
        tax_treatment: TaxTreatment,
        profile: TaxProfile,
    ) -> Self {
        Self {
            income,
            frequency,
            tax_treatment,
            profile,
            pre_tax_deductions: Decimal::ZERO,
            standard_deduction: StandardDeductionPolicy::Ignore,
        }
    }
}

/// Tax amounts for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodicTaxes {
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub fica_tax: Decimal,
    pub total_tax: Decimal,
}

impl PeriodicTaxes {
    fn from_annual(
        taxes: &TaxCalculationResult,
        frequency: Frequency,
    ) -> Self {
        Self {
            federal_tax: from_annual(taxes.federal_tax, frequency),
            state_tax: from_annual(taxes.state_tax, frequency),
            fica_tax: from_annual(taxes.fica.total, frequency),
            total_tax: from_annual(taxes.total_tax, frequency),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxEstimate {
    pub taxes: TaxCalculationResult,
    pub reference: ReferenceUsage,
    pub federal_brackets: Vec<BracketSlice>,
    pub state_brackets: Vec<BracketSlice>,
    pub monthly: PeriodicTaxes,
    pub biweekly: PeriodicTaxes,
}

#[derive(Clone, Copy)]
pub struct TaxEstimator<'a> {
    source: &'a dyn TaxTableSource,
}

impl<'a> TaxEstimator<'a> {
    pub fn new(source: &'a dyn TaxTableSource) -> Self {
        Self { source }
    }

    /// Estimates the annual taxes on the requested income.
    ///
    /// # Errors
    ///
    /// * [`CalculationError::NegativeInput`] for a negative income or
    ///   deduction.
    /// * [`CalculationError::NoIncome`] for zero income.
    /// * [`CalculationError::AmountOutOfRange`] when the income cannot be
    ///   annualized.
    /// * [`CalculationError::ReferenceData`] when reference data is missing.
    pub fn estimate(
        &self,
        request: &TaxEstimateRequest,
    ) -> Result<TaxEstimate, CalculationError> {
        let income = ensure_non_negative("income", request.income)?;
        if income.is_zero() {
            return Err(CalculationError::NoIncome);
        }
        let pre_tax_deductions =
            ensure_non_negative("pre_tax_deductions", request.pre_tax_deductions)?;

        let gross =
            to_annual(income, request.frequency).ok_or_else(|| out_of_range("income", income))?;
        let options = BudgetOptions {
            standard_deduction: request.standard_deduction,
            ..BudgetOptions::default()
        };

        let withholding = WithholdingCalculator::new(self.source, options).compute(
            &request.profile,
            gross,
            pre_tax_deductions,
            request.tax_treatment,
        )?;

        let federal_brackets = ProgressiveTaxCalculator::new(withholding.federal_table)
            .tax_by_bracket(withholding.federal_taxable);
        let state_brackets = ProgressiveTaxCalculator::new(withholding.state_table)
            .tax_by_bracket(withholding.taxes.taxable_income);

        let monthly = PeriodicTaxes::from_annual(&withholding.taxes, Frequency::Monthly);
        let biweekly = PeriodicTaxes::from_annual(&withholding.taxes, Frequency::Biweekly);

        Ok(TaxEstimate {
            taxes: withholding.taxes,
            reference: withholding.reference,
            federal_brackets,
            state_brackets,
            monthly,
            biweekly,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;
    use crate::models::{FilingStatusCode, StateCode};
    use crate::reference::fixtures::reference_2023;

    fn request(
        income: Decimal,
        state: &str,
        tax_treatment: TaxTreatment,
    ) -> TaxEstimateRequest {
        TaxEstimateRequest::new(
            income,
            Frequency::Annually,
            tax_treatment,
            TaxProfile {
                tax_year: 2023,
                state: StateCode::new(state).unwrap(),
                filing_status: FilingStatusCode::Single,
            },
        )
    }

    #[test]
    fn estimate_california_salary() {
        let reference = reference_2023();

        let result = TaxEstimator::new(&reference)
            .estimate(&request(dec!(85000), "CA", TaxTreatment::W2))
            .unwrap();

        assert_eq!(result.taxes.federal_tax, dec!(14007.50));
        assert_eq!(result.taxes.state_tax, dec!(4658.475));
        assert_eq!(result.taxes.fica.total, dec!(6502.50));
        assert_eq!(result.taxes.total_tax, dec!(25168.475));
        assert_eq!(round_half_up(result.monthly.total_tax), dec!(2097.37));
        assert_eq!(result.federal_brackets.len(), 3);
        assert_eq!(result.state_brackets.len(), 6);
    }

    #[test]
    fn estimate_with_standard_deduction() {
        let reference = reference_2023();
        let request = TaxEstimateRequest {
            standard_deduction: StandardDeductionPolicy::Apply,
            ..request(dec!(85000), "TX", TaxTreatment::W2)
        };

        let result = TaxEstimator::new(&reference).estimate(&request).unwrap();

        assert_eq!(result.taxes.federal_tax, dec!(10960.50));
        assert_eq!(result.taxes.state_tax, dec!(0));
    }

    #[test]
    fn estimate_self_employed_pays_both_shares() {
        let reference = reference_2023();

        let result = TaxEstimator::new(&reference)
            .estimate(&request(dec!(250000), "TX", TaxTreatment::SelfEmployed))
            .unwrap();

        assert_eq!(result.taxes.fica.total, dec!(28014.80));
    }

    #[test]
    fn estimate_zero_income_is_rejected() {
        let reference = reference_2023();

        let result =
            TaxEstimator::new(&reference).estimate(&request(dec!(0), "CA", TaxTreatment::W2));

        assert_eq!(result, Err(CalculationError::NoIncome));
    }

    #[test]
    fn estimate_negative_income_is_rejected() {
        let reference = reference_2023();

        let result =
            TaxEstimator::new(&reference).estimate(&request(dec!(-10), "CA", TaxTreatment::W2));

        assert_eq!(
            result,
            Err(CalculationError::NegativeInput {
                field: "income".to_string(),
                value: dec!(-10),
            })
        );
    }

    #[test]
    fn estimate_income_too_large_to_annualize_is_rejected() {
        let reference = reference_2023();
        let huge = Decimal::MAX / dec!(10);
        let request = TaxEstimateRequest {
            frequency: Frequency::Weekly,
            ..request(huge, "CA", TaxTreatment::W2)
        };

        let result = TaxEstimator::new(&reference).estimate(&request);

        assert_eq!(
            result,
            Err(CalculationError::AmountOutOfRange {
                field: "income".to_string(),
                value: huge,
            })
        );
    }
}
