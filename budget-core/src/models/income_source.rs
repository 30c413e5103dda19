use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Frequency;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised income tax treatment '{0}'")]
pub struct InvalidTaxTreatmentError(pub String);

/// How an income source is treated for payroll tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TaxTreatment {
    /// Wages reported on a W-2; employee share of FICA.
    W2,
    /// Net self-employment earnings; both shares of FICA.
    SelfEmployed,
    /// Rental, investment and other passive income; no FICA.
    Other,
}

impl TaxTreatment {
    pub const ALL: [TaxTreatment; 3] = [Self::W2, Self::SelfEmployed, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::W2 => "W2",
            Self::SelfEmployed => "Self-Employed",
            Self::Other => "Other",
        }
    }

    pub fn is_earned(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for TaxTreatment {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxTreatment {
    type Err = InvalidTaxTreatmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "w2" | "salary" | "wages" => Ok(Self::W2),
            "selfemployed" | "1099" => Ok(Self::SelfEmployed),
            "other" | "rental" | "investment" | "passive" => Ok(Self::Other),
            _ => Err(InvalidTaxTreatmentError(s.to_string())),
        }
    }
}

impl TryFrom<String> for TaxTreatment {
    type Error = InvalidTaxTreatmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaxTreatment> for String {
    fn from(treatment: TaxTreatment) -> Self {
        treatment.as_str().to_string()
    }
}

/// One stream of income entered in its native pay frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSource {
    pub id: String,
    pub category: String,
    pub label: String,
    pub amount: Decimal,
    pub frequency: Frequency,
    pub tax_treatment: TaxTreatment,
}

impl IncomeSource {
    /// `None` when the annual figure overflows.
    pub fn annual_amount(&self) -> Option<Decimal> {
        self.frequency.annualize(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_accepts_stored_tags() {
        assert_eq!("W2".parse::<TaxTreatment>(), Ok(TaxTreatment::W2));
        assert_eq!(
            "Self-Employed".parse::<TaxTreatment>(),
            Ok(TaxTreatment::SelfEmployed)
        );
        assert_eq!("Other".parse::<TaxTreatment>(), Ok(TaxTreatment::Other));
    }

    #[test]
    fn parse_tolerates_separators_and_case() {
        assert_eq!(
            "self_employed".parse::<TaxTreatment>(),
            Ok(TaxTreatment::SelfEmployed)
        );
        assert_eq!(
            "SELF EMPLOYED".parse::<TaxTreatment>(),
            Ok(TaxTreatment::SelfEmployed)
        );
        assert_eq!("rental".parse::<TaxTreatment>(), Ok(TaxTreatment::Other));
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        assert_eq!(
            "barter".parse::<TaxTreatment>(),
            Err(InvalidTaxTreatmentError("barter".to_string()))
        );
    }

    #[test]
    fn annual_amount_uses_source_frequency() {
        let source = IncomeSource {
            id: "job".to_string(),
            category: "W2 Job".to_string(),
            label: "Day job".to_string(),
            amount: dec!(2500),
            frequency: Frequency::Biweekly,
            tax_treatment: TaxTreatment::W2,
        };

        assert_eq!(source.annual_amount(), Some(dec!(65000)));
    }
}
