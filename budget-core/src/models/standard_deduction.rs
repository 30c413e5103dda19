use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatusCode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardDeduction {
    pub tax_year: i32,
    pub filing_status: FilingStatusCode,
    pub amount: Decimal,
}
