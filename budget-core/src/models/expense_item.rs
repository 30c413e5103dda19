use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Frequency;

/// A budgeted expense. Only used for the remaining-money step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub category: String,
    pub name: String,
    pub minimum_payment: Decimal,
    #[serde(default)]
    pub preferred_payment: Option<Decimal>,
    pub frequency: Frequency,
}

impl ExpenseItem {
    /// The amount actually budgeted: the preferred payment when one is set.
    pub fn payment(&self) -> Decimal {
        self.preferred_payment.unwrap_or(self.minimum_payment)
    }

    /// `None` when the annual figure overflows.
    pub fn annual_payment(&self) -> Option<Decimal> {
        self.frequency.annualize(self.payment())
    }
}
