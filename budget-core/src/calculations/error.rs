use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{DeductionConfigError, InvalidFrequencyError};
use crate::reference::ReferenceDataError;

/// Errors raised by the calculators and passed through the budget pipeline
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error(transparent)]
    InvalidFrequency(#[from] InvalidFrequencyError),

    #[error("budget has no income sources with a positive amount")]
    NoIncome,

    #[error("invalid deduction configuration: {0}")]
    InvalidDeductionConfiguration(#[from] DeductionConfigError),

    #[error("{field} must be non-negative, got {value}")]
    NegativeInput { field: String, value: Decimal },

    #[error("{field} is too large to calculate with: {value}")]
    AmountOutOfRange { field: String, value: Decimal },

    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),
}

pub(crate) fn out_of_range(
    field: &str,
    value: Decimal,
) -> CalculationError {
    CalculationError::AmountOutOfRange {
        field: field.to_string(),
        value,
    }
}

/// Adds `value` to `total`, failing with
/// [`CalculationError::AmountOutOfRange`] instead of overflowing.
pub(crate) fn checked_add(
    field: &str,
    total: Decimal,
    value: Decimal,
) -> Result<Decimal, CalculationError> {
    total.checked_add(value).ok_or_else(|| out_of_range(field, value))
}

/// Fails with [`CalculationError::NegativeInput`] when `value` is below zero.
pub(crate) fn ensure_non_negative(
    field: &str,
    value: Decimal,
) -> Result<Decimal, CalculationError> {
    if value < Decimal::ZERO {
        Err(CalculationError::NegativeInput {
            field: field.to_string(),
            value,
        })
    } else {
        Ok(value)
    }
}
