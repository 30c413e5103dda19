//! Aggregation of pre-tax deductions into one annual figure.
//!
//! | Component          | Annual amount |
//! |--------------------|---------------|
//! | Retirement (percent) | `gross × percent / 100` |
//! | Retirement (fixed) | the fixed annual amount |
//! | Health insurance   | premium, annualized |
//! | HSA / FSA          | both contributions, annualized |
//! | Other benefits     | every item, annualized |
//!
//! Only pre-tax retirement contributions reduce taxable income. A post-tax
//! (Roth) contribution is reported in
//! [`DeductionBreakdown::post_tax_retirement`] and left out of the total.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::{CalculationError, checked_add, ensure_non_negative, out_of_range};
use crate::models::{
    ContributionKind, DeductionConfigError, DeductionSet, PeriodicAmount, RetirementContribution,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeductionBreakdown {
    pub retirement: Decimal,
    pub health_insurance: Decimal,
    pub hsa_fsa: Decimal,
    pub other_benefits: Decimal,
    /// Sum of the four pre-tax components above.
    pub total: Decimal,
    pub post_tax_retirement: Decimal,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeductionAggregator;

impl DeductionAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Annual pre-tax deductions for `annual_gross` of income.
    ///
    /// # Errors
    ///
    /// * [`CalculationError::InvalidDeductionConfiguration`] for a retirement
    ///   percentage outside 0–100.
    /// * [`CalculationError::NegativeInput`] for any negative amount.
    /// * [`CalculationError::AmountOutOfRange`] when an amount or the total
    ///   overflows once annualized.
    pub fn aggregate(
        &self,
        deductions: &DeductionSet,
        annual_gross: Decimal,
    ) -> Result<DeductionBreakdown, CalculationError> {
        let (retirement, post_tax_retirement) =
            Self::retirement(&deductions.retirement, annual_gross)?;

        let health_insurance = Self::optional_annual(
            "health_insurance_premium",
            deductions.health_insurance_premium.as_ref(),
        )?;

        let hsa = Self::optional_annual("hsa_contribution", deductions.hsa_contribution.as_ref())?;
        let fsa = Self::optional_annual("fsa_contribution", deductions.fsa_contribution.as_ref())?;
        let hsa_fsa = checked_add("fsa_contribution", hsa, fsa)?;

        let mut other_benefits = Decimal::ZERO;
        for benefit in &deductions.other_pretax_benefits {
            let annual = Self::annual("other_pretax_benefits", benefit)?;
            other_benefits = checked_add("other_pretax_benefits", other_benefits, annual)?;
        }

        let mut total = retirement;
        for (field, amount) in [
            ("health_insurance_premium", health_insurance),
            ("hsa_fsa", hsa_fsa),
            ("other_pretax_benefits", other_benefits),
        ] {
            total = checked_add(field, total, amount)?;
        }

        Ok(DeductionBreakdown {
            retirement,
            health_insurance,
            hsa_fsa,
            other_benefits,
            total,
            post_tax_retirement,
        })
    }

    /// Returns `(pre_tax, post_tax)` retirement amounts.
    fn retirement(
        contribution: &RetirementContribution,
        annual_gross: Decimal,
    ) -> Result<(Decimal, Decimal), CalculationError> {
        let (amount, kind) = match contribution {
            RetirementContribution::None => return Ok((Decimal::ZERO, Decimal::ZERO)),
            RetirementContribution::Percent { percent, kind } => {
                if *percent < Decimal::ZERO || *percent > Decimal::ONE_HUNDRED {
                    return Err(DeductionConfigError::PercentOutOfRange(*percent).into());
                }
                let amount = annual_gross
                    .checked_mul(*percent / Decimal::ONE_HUNDRED)
                    .ok_or_else(|| out_of_range("retirement.percent", annual_gross))?;
                (amount, *kind)
            }
            RetirementContribution::Fixed {
                annual_amount,
                kind,
            } => (
                ensure_non_negative("retirement.annual_amount", *annual_amount)?,
                *kind,
            ),
        };

        Ok(match kind {
            ContributionKind::PreTax => (amount, Decimal::ZERO),
            ContributionKind::PostTax => (Decimal::ZERO, amount),
        })
    }

    fn optional_annual(
        field: &str,
        amount: Option<&PeriodicAmount>,
    ) -> Result<Decimal, CalculationError> {
        amount.map_or(Ok(Decimal::ZERO), |amount| Self::annual(field, amount))
    }

    fn annual(
        field: &str,
        amount: &PeriodicAmount,
    ) -> Result<Decimal, CalculationError> {
        ensure_non_negative(field, amount.amount)?;
        amount
            .annual()
            .ok_or_else(|| out_of_range(field, amount.amount))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Frequency;

    #[test]
    fn aggregate_empty_set_is_zero() {
        let result = DeductionAggregator::new()
            .aggregate(&DeductionSet::default(), dec!(80000))
            .unwrap();

        assert_eq!(result, DeductionBreakdown::default());
    }

    #[test]
    fn aggregate_percent_retirement_and_monthly_benefits() {
        let deductions = DeductionSet {
            retirement: RetirementContribution::Percent {
                percent: dec!(6),
                kind: ContributionKind::PreTax,
            },
            health_insurance_premium: Some(PeriodicAmount::monthly(dec!(250))),
            hsa_contribution: Some(PeriodicAmount::monthly(dec!(100))),
            fsa_contribution: Some(PeriodicAmount::new(dec!(1200), Frequency::Annually)),
            other_pretax_benefits: vec![
                PeriodicAmount::monthly(dec!(20)),
                PeriodicAmount::new(dec!(10), Frequency::Biweekly),
            ],
        };

        let result = DeductionAggregator::new()
            .aggregate(&deductions, dec!(80000))
            .unwrap();

        assert_eq!(
            result,
            DeductionBreakdown {
                retirement: dec!(4800),
                health_insurance: dec!(3000),
                hsa_fsa: dec!(2400),
                other_benefits: dec!(500),
                total: dec!(10700),
                post_tax_retirement: dec!(0),
            }
        );
    }

    #[test]
    fn aggregate_fixed_retirement_is_used_directly() {
        let deductions = DeductionSet {
            retirement: RetirementContribution::Fixed {
                annual_amount: dec!(22500),
                kind: ContributionKind::PreTax,
            },
            ..DeductionSet::default()
        };

        let result = DeductionAggregator::new()
            .aggregate(&deductions, dec!(150000))
            .unwrap();

        assert_eq!(result.retirement, dec!(22500));
        assert_eq!(result.total, dec!(22500));
    }

    #[test]
    fn aggregate_post_tax_retirement_is_reported_not_deducted() {
        let deductions = DeductionSet {
            retirement: RetirementContribution::Percent {
                percent: dec!(10),
                kind: ContributionKind::PostTax,
            },
            ..DeductionSet::default()
        };

        let result = DeductionAggregator::new()
            .aggregate(&deductions, dec!(50000))
            .unwrap();

        assert_eq!(result.total, dec!(0));
        assert_eq!(result.post_tax_retirement, dec!(5000));
    }

    #[test]
    fn aggregate_rejects_percent_over_hundred() {
        let deductions = DeductionSet {
            retirement: RetirementContribution::Percent {
                percent: dec!(150),
                kind: ContributionKind::PreTax,
            },
            ..DeductionSet::default()
        };

        let result = DeductionAggregator::new().aggregate(&deductions, dec!(50000));

        assert_eq!(
            result,
            Err(CalculationError::InvalidDeductionConfiguration(
                DeductionConfigError::PercentOutOfRange(dec!(150))
            ))
        );
    }

    #[test]
    fn aggregate_rejects_premium_that_overflows_when_annualized() {
        let deductions = DeductionSet {
            health_insurance_premium: Some(PeriodicAmount::new(
                Decimal::MAX / dec!(10),
                Frequency::Weekly,
            )),
            ..DeductionSet::default()
        };

        let result = DeductionAggregator::new().aggregate(&deductions, dec!(50000));

        assert_eq!(
            result,
            Err(CalculationError::AmountOutOfRange {
                field: "health_insurance_premium".to_string(),
                value: Decimal::MAX / dec!(10),
            })
        );
    }

    #[test]
    fn aggregate_percent_of_largest_gross_does_not_overflow() {
        let deductions = DeductionSet {
            retirement: RetirementContribution::Percent {
                percent: dec!(100),
                kind: ContributionKind::PreTax,
            },
            ..DeductionSet::default()
        };

        let result = DeductionAggregator::new()
            .aggregate(&deductions, Decimal::MAX)
            .unwrap();

        assert_eq!(result.retirement, Decimal::MAX);
    }

    #[test]
    fn aggregate_rejects_total_that_overflows() {
        let deductions = DeductionSet {
            retirement: RetirementContribution::Fixed {
                annual_amount: Decimal::MAX,
                kind: ContributionKind::PreTax,
            },
            fsa_contribution: Some(PeriodicAmount::new(dec!(1), Frequency::Annually)),
            ..DeductionSet::default()
        };

        let result = DeductionAggregator::new().aggregate(&deductions, dec!(50000));

        assert!(matches!(
            result,
            Err(CalculationError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn aggregate_rejects_negative_premium() {
        let deductions = DeductionSet {
            health_insurance_premium: Some(PeriodicAmount::monthly(dec!(-50))),
            ..DeductionSet::default()
        };

        let result = DeductionAggregator::new().aggregate(&deductions, dec!(50000));

        assert_eq!(
            result,
            Err(CalculationError::NegativeInput {
                field: "health_insurance_premium".to_string(),
                value: dec!(-50),
            })
        );
    }
}
