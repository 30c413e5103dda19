use serde::{Deserialize, Serialize};

use super::{DeductionSet, ExpenseItem, FilingStatusCode, IncomeSource, StateCode};

/// Who is being taxed: year, state of residence and filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxProfile {
    pub tax_year: i32,
    pub state: StateCode,
    #[serde(default)]
    pub filing_status: FilingStatusCode,
}

/// Everything a budget computation consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetInput {
    pub profile: TaxProfile,
    pub income_sources: Vec<IncomeSource>,
    #[serde(default)]
    pub deductions: DeductionSet,
    #[serde(default)]
    pub expenses: Vec<ExpenseItem>,
}
