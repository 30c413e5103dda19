use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaBreakdown {
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub total: Decimal,
}

impl FicaBreakdown {
    pub fn new(
        social_security: Decimal,
        medicare: Decimal,
    ) -> Self {
        Self {
            social_security,
            medicare,
            total: social_security + medicare,
        }
    }
}

/// Withholding figures for one year of income. Amounts are unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    /// Year of the federal table actually used, after any fallback.
    pub tax_year_used: i32,

    // Inputs to the bracket walks
    pub gross_income: Decimal,
    pub pre_tax_deductions: Decimal,
    pub standard_deduction: Decimal,
    pub taxable_income: Decimal,

    // Withholdings
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub fica: FicaBreakdown,
    pub total_tax: Decimal,

    // Rates, as fractions
    pub effective_rate: Decimal,
    pub marginal_federal_rate: Decimal,
    pub marginal_state_rate: Decimal,
}
