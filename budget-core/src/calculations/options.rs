use serde::{Deserialize, Serialize};

/// Whether the federal standard deduction is subtracted before the federal
/// bracket walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardDeductionPolicy {
    /// Brackets are applied to income after pre-tax deductions only.
    #[default]
    Ignore,
    Apply,
}

/// What to do when pre-tax deductions exceed gross income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverDeductionPolicy {
    /// Taxable income is clamped at zero.
    #[default]
    Clamp,
    /// The budget is rejected as an invalid deduction configuration.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetOptions {
    #[serde(default)]
    pub standard_deduction: StandardDeductionPolicy,
    #[serde(default)]
    pub over_deduction: OverDeductionPolicy,
}
