//! Tax and budget calculators.
//!
//! The calculators build on each other, leaf to root:
//!
//! | Module          | Computes |
//! |-----------------|----------|
//! | [`frequency`]   | periodic ↔ annual amounts |
//! | [`progressive`] | bracket-walk income tax |
//! | [`fica`]        | Social Security and Medicare |
//! | [`income`]      | annual gross from income sources |
//! | [`deductions`]  | annual pre-tax deductions |
//! | [`budget`]      | the full budget pipeline |
//! | [`estimate`]    | a single-income what-if estimate |
//!
//! All arithmetic is exact [`rust_decimal::Decimal`]; rounding is left to
//! display code via [`common::round_half_up`].

pub mod budget;
pub mod common;
pub mod deductions;
mod error;
pub mod estimate;
pub mod fica;
pub mod frequency;
pub mod income;
mod options;
pub mod progressive;
mod withholding;

pub use budget::{
    BudgetComposer, BudgetResult, Period, PeriodBreakdown, SourceNetIncome, compute_budget,
};
pub use deductions::{DeductionAggregator, DeductionBreakdown};
pub use error::CalculationError;
pub use estimate::{PeriodicTaxes, TaxEstimate, TaxEstimateRequest, TaxEstimator};
pub use fica::FicaCalculator;
pub use frequency::{from_annual, to_annual};
pub use income::{
    ExcludedSource, ExclusionReason, IncomeAggregate, IncomeAggregator, SourceContribution,
};
pub use options::{BudgetOptions, OverDeductionPolicy, StandardDeductionPolicy};
pub use progressive::{BracketSlice, ProgressiveTaxCalculator};
pub use withholding::ReferenceUsage;
