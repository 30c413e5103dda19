//! The budget pipeline, from income sources to remaining money.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross: aggregate and annualize income sources |
//! | 2    | Pre-tax deductions against gross |
//! | 3    | Taxable = max(0, gross - deductions) |
//! | 4    | Federal tax: bracket walk over taxable income |
//! | 5    | State tax: same walk over the state's table (flat and no-tax states use one bracket) |
//! | 6    | FICA on gross, using the dominant tax treatment |
//! | 7    | Net = gross - deductions - federal - state - FICA |
//! | 8    | Expenses: preferred payment when set, otherwise minimum |
//! | 9    | Remaining = net - expenses |
//! | 10   | Monthly and biweekly views divide the annual figures |
//!
//! A budget with no income source of positive amount is rejected with
//! [`CalculationError::NoIncome`] before any tax is computed. Every other
//! error from the steps above is returned unchanged.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::calculations::BudgetComposer;
//! use budget_core::{
//!     BracketTable, BudgetInput, DeductionSet, FicaParameters, FilingStatusCode, Frequency,
//!     IncomeSource, Jurisdiction, ReferenceData, StateCode, TaxProfile, TaxTreatment,
//! };
//!
//! let mut builder = ReferenceData::builder();
//! builder
//!     .add_table(BracketTable::flat(2023, Jurisdiction::Federal, FilingStatusCode::Single, dec!(0.10)).unwrap())
//!     .unwrap()
//!     .add_table(BracketTable::flat(2023, Jurisdiction::state("TX").unwrap(), FilingStatusCode::Single, dec!(0)).unwrap())
//!     .unwrap()
//!     .add_fica(FicaParameters {
//!         tax_year: 2023,
//!         social_security_rate: dec!(0.062),
//!         social_security_wage_base: dec!(160200),
//!         medicare_rate: dec!(0.0145),
//!         additional_medicare_rate: dec!(0.009),
//!         additional_medicare_threshold: dec!(200000),
//!     })
//!     .unwrap();
//! let reference = builder.build();
//!
//! let input = BudgetInput {
//!     profile: TaxProfile {
//!         tax_year: 2023,
//!         state: StateCode::new("TX").unwrap(),
//!         filing_status: FilingStatusCode::Single,
//!     },
//!     income_sources: vec![IncomeSource {
//!         id: "job".into(),
//!         category: "W2 Job".into(),
//!         label: "Day job".into(),
//!         amount: dec!(4000),
//!         frequency: Frequency::Monthly,
//!         tax_treatment: TaxTreatment::W2,
//!     }],
//!     deductions: DeductionSet::default(),
//!     expenses: vec![],
//! };
//!
//! let result = BudgetComposer::new(&reference).compute_budget(&input).unwrap();
//!
//! // 48,000 - 4,800 federal - 3,672 FICA
//! assert_eq!(result.annual.net_income, dec!(39528.00));
//! assert_eq!(result.monthly.net_income, dec!(3294));
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::common::{ratio, round_half_up};
use super::deductions::{DeductionAggregator, DeductionBreakdown};
use super::error::{CalculationError, checked_add, ensure_non_negative, out_of_range};
use super::frequency::from_annual;
use super::income::{IncomeAggregate, IncomeAggregator};
use super::options::BudgetOptions;
use super::withholding::{ReferenceUsage, WithholdingCalculator};
use crate::models::{
    BudgetInput, DeductionSet, ExpenseItem, Frequency, IncomeSource, TaxCalculationResult,
    TaxProfile,
};
use crate::reference::TaxTableSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Annual,
    Monthly,
    Biweekly,
}

impl Period {
    fn frequency(&self) -> Frequency {
        match self {
            Self::Annual => Frequency::Annually,
            Self::Monthly => Frequency::Monthly,
            Self::Biweekly => Frequency::Biweekly,
        }
    }
}

/// Every monetary figure of the budget for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodBreakdown {
    pub period: Period,
    pub gross_income: Decimal,
    pub pre_tax_deductions: Decimal,
    pub taxable_income: Decimal,
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub fica_tax: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    pub expenses: Decimal,
    pub remaining: Decimal,
}

impl PeriodBreakdown {
    /// Divides each annual figure by the number of periods in a year.
    fn from_annual(
        period: Period,
        annual: &PeriodBreakdown,
    ) -> Self {
        let frequency = period.frequency();
        annual.map(period, |value| from_annual(value, frequency))
    }

    /// Copy with every amount rounded half-up to cents, for display.
    pub fn rounded(&self) -> Self {
        self.map(self.period, round_half_up)
    }

    fn map(
        &self,
        period: Period,
        f: impl Fn(Decimal) -> Decimal,
    ) -> Self {
        Self {
            period,
            gross_income: f(self.gross_income),
            pre_tax_deductions: f(self.pre_tax_deductions),
            taxable_income: f(self.taxable_income),
            federal_tax: f(self.federal_tax),
            state_tax: f(self.state_tax),
            fica_tax: f(self.fica_tax),
            total_tax: f(self.total_tax),
            net_income: f(self.net_income),
            expenses: f(self.expenses),
            remaining: f(self.remaining),
        }
    }
}

/// Net income attributed to one income source.
///
/// Deductions and total tax are prorated by the source's share of gross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceNetIncome {
    pub id: String,
    pub label: String,
    pub share: Decimal,
    pub gross_income: Decimal,
    pub deductions: Decimal,
    pub taxes: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetResult {
    pub reference: ReferenceUsage,
    pub income: IncomeAggregate,
    pub deductions: DeductionBreakdown,
    pub taxes: TaxCalculationResult,
    pub expenses_total: Decimal,
    pub annual: PeriodBreakdown,
    pub monthly: PeriodBreakdown,
    pub biweekly: PeriodBreakdown,
    pub per_source: Vec<SourceNetIncome>,
}

impl BudgetResult {
    pub fn remaining(&self) -> Decimal {
        self.annual.remaining
    }

    pub fn is_over_budget(&self) -> bool {
        self.annual.remaining < Decimal::ZERO
    }
}

/// Runs the budget pipeline against a reference data source.
#[derive(Clone, Copy)]
pub struct BudgetComposer<'a> {
    source: &'a dyn TaxTableSource,
    options: BudgetOptions,
}

impl<'a> BudgetComposer<'a> {
    pub fn new(source: &'a dyn TaxTableSource) -> Self {
        Self {
            source,
            options: BudgetOptions::default(),
        }
    }

    pub fn with_options(
        mut self,
        options: BudgetOptions,
    ) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> BudgetOptions {
        self.options
    }

    /// Computes the full budget for `input`.
    ///
    /// # Errors
    ///
    /// * [`CalculationError::NoIncome`] when no source has a positive amount.
    /// * [`CalculationError::InvalidDeductionConfiguration`] and
    ///   [`CalculationError::NegativeInput`] from the deduction and expense
    ///   steps.
    /// * [`CalculationError::AmountOutOfRange`] when an amount is too large
    ///   to annualize or total.
    /// * [`CalculationError::ReferenceData`] when a jurisdiction has no
    ///   bracket table at all, or no FICA parameters exist.
    pub fn compute_budget(
        &self,
        input: &BudgetInput,
    ) -> Result<BudgetResult, CalculationError> {
        if input.income_sources.is_empty() {
            return Err(CalculationError::NoIncome);
        }

        // Step 1: Gross income
        let income = IncomeAggregator::new().aggregate(&input.income_sources)?;
        let treatment = income.dominant_treatment().ok_or(CalculationError::NoIncome)?;
        let gross = income.total_annual_gross;

        // Step 2: Pre-tax deductions
        let deductions = DeductionAggregator::new().aggregate(&input.deductions, gross)?;

        // Steps 3-6: Taxable income and withholding
        let withholding = WithholdingCalculator::new(self.source, self.options).compute(
            &input.profile,
            gross,
            deductions.total,
            treatment,
        )?;
        let taxes = withholding.taxes;

        // Step 7: Net income
        let net = (gross - deductions.total)
            .checked_sub(taxes.total_tax)
            .ok_or_else(|| out_of_range("net_income", taxes.total_tax))?;

        // Steps 8-9: Expenses and remaining money
        let expenses_total = Self::expenses_total(&input.expenses)?;
        let remaining = net
            .checked_sub(expenses_total)
            .ok_or_else(|| out_of_range("expenses", expenses_total))?;

        // Step 10: Period views
        let annual = PeriodBreakdown {
            period: Period::Annual,
            gross_income: gross,
            pre_tax_deductions: deductions.total,
            taxable_income: taxes.taxable_income,
            federal_tax: taxes.federal_tax,
            state_tax: taxes.state_tax,
            fica_tax: taxes.fica.total,
            total_tax: taxes.total_tax,
            net_income: net,
            expenses: expenses_total,
            remaining,
        };
        let monthly = PeriodBreakdown::from_annual(Period::Monthly, &annual);
        let biweekly = PeriodBreakdown::from_annual(Period::Biweekly, &annual);

        let per_source = Self::per_source(&income, deductions.total, taxes.total_tax);

        info!(
            tax_year = input.profile.tax_year,
            federal_year = withholding.reference.federal.used_year,
            state = %input.profile.state,
            state_year = withholding.reference.state.used_year,
            fica_year = withholding.reference.fica.used_year,
            "budget computed"
        );
        debug!(
            gross = %gross,
            net = %net,
            expenses = %expenses_total,
            remaining = %remaining,
            "budget totals"
        );

        Ok(BudgetResult {
            reference: withholding.reference,
            income,
            deductions,
            taxes,
            expenses_total,
            annual,
            monthly,
            biweekly,
            per_source,
        })
    }

    fn expenses_total(expenses: &[ExpenseItem]) -> Result<Decimal, CalculationError> {
        let mut total = Decimal::ZERO;
        for item in expenses {
            ensure_non_negative("expense.minimum_payment", item.minimum_payment)?;
            if let Some(preferred) = item.preferred_payment {
                ensure_non_negative("expense.preferred_payment", preferred)?;
            }
            let annual = item
                .annual_payment()
                .ok_or_else(|| out_of_range("expense.payment", item.payment()))?;
            total = checked_add("expense.payment", total, annual)?;
        }
        Ok(total)
    }

    /// Prorates deductions and tax over the included sources.
    ///
    /// The last source takes whatever the division leaves over, so the
    /// per-source nets always add up to the budget's net income.
    fn per_source(
        income: &IncomeAggregate,
        total_deductions: Decimal,
        total_tax: Decimal,
    ) -> Vec<SourceNetIncome> {
        let mut allocated_deductions = Decimal::ZERO;
        let mut allocated_taxes = Decimal::ZERO;
        let last = income.sources.len().saturating_sub(1);

        income
            .sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let share = ratio(source.annual_amount, income.total_annual_gross);
                let (deductions, taxes) = if index == last {
                    (
                        total_deductions - allocated_deductions,
                        total_tax - allocated_taxes,
                    )
                } else {
                    (total_deductions * share, total_tax * share)
                };
                allocated_deductions += deductions;
                allocated_taxes += taxes;

                SourceNetIncome {
                    id: source.id.clone(),
                    label: source.label.clone(),
                    share,
                    gross_income: source.annual_amount,
                    deductions,
                    taxes,
                    net_income: source.annual_amount - deductions - taxes,
                }
            })
            .collect()
    }
}

/// Free-function form of [`BudgetComposer::compute_budget`] with default
/// options.
pub fn compute_budget(
    profile: &TaxProfile,
    income_sources: &[IncomeSource],
    deduction_set: &DeductionSet,
    expense_items: &[ExpenseItem],
    reference: &dyn TaxTableSource,
) -> Result<BudgetResult, CalculationError> {
    let input = BudgetInput {
        profile: profile.clone(),
        income_sources: income_sources.to_vec(),
        deductions: deduction_set.clone(),
        expenses: expense_items.to_vec(),
    };
    BudgetComposer::new(reference).compute_budget(&input)
}
