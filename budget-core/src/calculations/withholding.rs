//! Federal, state and FICA withholding for one annual income.
//!
//! Shared by [`BudgetComposer`](super::BudgetComposer) and
//! [`TaxEstimator`](super::TaxEstimator) so both run the same pipeline from
//! gross income to total tax.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::common::{max, ratio};
use super::error::CalculationError;
use super::fica::FicaCalculator;
use super::options::{BudgetOptions, OverDeductionPolicy, StandardDeductionPolicy};
use super::progressive::ProgressiveTaxCalculator;
use crate::models::{
    BracketTable, DeductionConfigError, Jurisdiction, TaxCalculationResult, TaxProfile,
    TaxTreatment,
};
use crate::reference::{TableUsage, TaxTableSource};

/// Which reference records a calculation actually used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceUsage {
    pub federal: TableUsage,
    pub state: TableUsage,
    pub fica: TableUsage,
    pub standard_deduction: Option<TableUsage>,
}

impl ReferenceUsage {
    pub fn any_fallback(&self) -> bool {
        self.federal.is_fallback()
            || self.state.is_fallback()
            || self.fica.is_fallback()
            || self
                .standard_deduction
                .as_ref()
                .is_some_and(TableUsage::is_fallback)
    }
}

pub(crate) struct Withholding<'a> {
    pub taxes: TaxCalculationResult,
    pub reference: ReferenceUsage,
    pub federal_table: &'a BracketTable,
    pub state_table: &'a BracketTable,
    pub federal_taxable: Decimal,
}

pub(crate) struct WithholdingCalculator<'a> {
    source: &'a dyn TaxTableSource,
    options: BudgetOptions,
}

impl<'a> WithholdingCalculator<'a> {
    pub fn new(
        source: &'a dyn TaxTableSource,
        options: BudgetOptions,
    ) -> Self {
        Self { source, options }
    }

    pub fn compute(
        &self,
        profile: &TaxProfile,
        gross: Decimal,
        pre_tax_deductions: Decimal,
        fica_treatment: TaxTreatment,
    ) -> Result<Withholding<'a>, CalculationError> {
        // Taxable income never drops below zero
        let taxable = self.taxable_income(gross, pre_tax_deductions)?;

        let source = self.source;
        let federal = source.bracket_table(
            &Jurisdiction::Federal,
            profile.tax_year,
            profile.filing_status,
        )?;
        let state = source.bracket_table(
            &Jurisdiction::State(profile.state.clone()),
            profile.tax_year,
            profile.filing_status,
        )?;
        let fica_params = source.fica_parameters(profile.tax_year)?;

        // Standard deduction only reduces the federal base
        let (standard_deduction, standard_usage) = match self.options.standard_deduction {
            StandardDeductionPolicy::Ignore => (Decimal::ZERO, None),
            StandardDeductionPolicy::Apply => {
                let resolved =
                    source.standard_deduction(profile.tax_year, profile.filing_status)?;
                (resolved.value.amount, Some(resolved.usage))
            }
        };
        let federal_taxable = max(taxable - standard_deduction, Decimal::ZERO);

        let federal_calculator = ProgressiveTaxCalculator::new(federal.value);
        let state_calculator = ProgressiveTaxCalculator::new(state.value);

        let federal_tax = federal_calculator.compute(federal_taxable);
        let state_tax = state_calculator.compute(taxable);

        // FICA is levied on gross wages, not taxable income
        let fica = FicaCalculator::new(fica_params.value).compute(gross, fica_treatment)?;

        let total_tax = federal_tax + state_tax + fica.total;

        debug!(
            gross = %gross,
            taxable = %taxable,
            federal_taxable = %federal_taxable,
            federal_tax = %federal_tax,
            state_tax = %state_tax,
            fica = %fica.total,
            "computed withholding"
        );

        let taxes = TaxCalculationResult {
            tax_year_used: federal.usage.used_year,
            gross_income: gross,
            pre_tax_deductions,
            standard_deduction,
            taxable_income: taxable,
            federal_tax,
            state_tax,
            fica,
            total_tax,
            effective_rate: ratio(total_tax, gross),
            marginal_federal_rate: federal_calculator.marginal_rate(federal_taxable),
            marginal_state_rate: state_calculator.marginal_rate(taxable),
        };

        Ok(Withholding {
            taxes,
            reference: ReferenceUsage {
                federal: federal.usage,
                state: state.usage,
                fica: fica_params.usage,
                standard_deduction: standard_usage,
            },
            federal_table: federal.value,
            state_table: state.value,
            federal_taxable,
        })
    }

    fn taxable_income(
        &self,
        gross: Decimal,
        pre_tax_deductions: Decimal,
    ) -> Result<Decimal, CalculationError> {
        if pre_tax_deductions <= gross {
            return Ok(gross - pre_tax_deductions);
        }

        match self.options.over_deduction {
            OverDeductionPolicy::Clamp => {
                warn!(
                    gross = %gross,
                    deductions = %pre_tax_deductions,
                    "pre-tax deductions exceed gross income; taxable income clamped to zero"
                );
                Ok(Decimal::ZERO)
            }
            OverDeductionPolicy::Reject => Err(DeductionConfigError::ExceedsGross {
                deductions: pre_tax_deductions,
                gross,
            }
            .into()),
        }
    }
}
