use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FicaParametersError {
    #[error("social security rate must be between 0 and 1, got {0}")]
    InvalidSocialSecurityRate(Decimal),

    #[error("social security wage base must be positive, got {0}")]
    InvalidWageBase(Decimal),

    #[error("medicare rate must be between 0 and 1, got {0}")]
    InvalidMedicareRate(Decimal),

    #[error("additional medicare rate must be between 0 and 1, got {0}")]
    InvalidAdditionalMedicareRate(Decimal),

    #[error("additional medicare threshold must be non-negative, got {0}")]
    InvalidAdditionalMedicareThreshold(Decimal),
}

/// Payroll tax constants for one tax year.
///
/// Rates are the employee share; self-employed income pays both halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaParameters {
    pub tax_year: i32,
    pub social_security_rate: Decimal,
    pub social_security_wage_base: Decimal,
    pub medicare_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_threshold: Decimal,
}

impl FicaParameters {
    pub fn validate(&self) -> Result<(), FicaParametersError> {
        if !is_rate(self.social_security_rate) {
            return Err(FicaParametersError::InvalidSocialSecurityRate(
                self.social_security_rate,
            ));
        }
        if self.social_security_wage_base <= Decimal::ZERO {
            return Err(FicaParametersError::InvalidWageBase(
                self.social_security_wage_base,
            ));
        }
        if !is_rate(self.medicare_rate) {
            return Err(FicaParametersError::InvalidMedicareRate(self.medicare_rate));
        }
        if !is_rate(self.additional_medicare_rate) {
            return Err(FicaParametersError::InvalidAdditionalMedicareRate(
                self.additional_medicare_rate,
            ));
        }
        if self.additional_medicare_threshold < Decimal::ZERO {
            return Err(FicaParametersError::InvalidAdditionalMedicareThreshold(
                self.additional_medicare_threshold,
            ));
        }
        Ok(())
    }
}

fn is_rate(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn params_2023() -> FicaParameters {
        FicaParameters {
            tax_year: 2023,
            social_security_rate: dec!(0.062),
            social_security_wage_base: dec!(160200),
            medicare_rate: dec!(0.0145),
            additional_medicare_rate: dec!(0.009),
            additional_medicare_threshold: dec!(200000),
        }
    }

    #[test]
    fn validate_accepts_published_parameters() {
        assert_eq!(params_2023().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_wage_base() {
        let params = FicaParameters {
            social_security_wage_base: dec!(0),
            ..params_2023()
        };

        assert_eq!(
            params.validate(),
            Err(FicaParametersError::InvalidWageBase(dec!(0)))
        );
    }

    #[test]
    fn validate_rejects_percentage_style_rate() {
        let params = FicaParameters {
            medicare_rate: dec!(1.45),
            ..params_2023()
        };

        assert_eq!(
            params.validate(),
            Err(FicaParametersError::InvalidMedicareRate(dec!(1.45)))
        );
    }

    #[test]
    fn validate_rejects_negative_threshold() {
        let params = FicaParameters {
            additional_medicare_threshold: dec!(-1),
            ..params_2023()
        };

        assert_eq!(
            params.validate(),
            Err(FicaParametersError::InvalidAdditionalMedicareThreshold(
                dec!(-1)
            ))
        );
    }
}
