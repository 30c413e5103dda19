use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported payment frequency '{value}'")]
pub struct InvalidFrequencyError {
    pub value: String,
}

/// How often a periodic amount is paid.
///
/// Parsing never guesses: an unrecognised string is an error rather than a
/// silent monthly or annual default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Semimonthly,
    Bimonthly,
    Monthly,
    Annually,
}

impl Frequency {
    pub const ALL: [Frequency; 6] = [
        Self::Weekly,
        Self::Biweekly,
        Self::Semimonthly,
        Self::Bimonthly,
        Self::Monthly,
        Self::Annually,
    ];

    /// Number of payments in a year.
    ///
    /// `Bimonthly` counts as twice a month, matching how pay cycles are entered.
    pub fn periods_per_year(&self) -> Decimal {
        match self {
            Self::Weekly => Decimal::from(52),
            Self::Biweekly => Decimal::from(26),
            Self::Semimonthly | Self::Bimonthly => Decimal::from(24),
            Self::Monthly => Decimal::from(12),
            Self::Annually => Decimal::ONE,
        }
    }

    /// `amount` paid at this frequency over a year, or `None` when the
    /// product does not fit in a `Decimal`.
    pub fn annualize(
        &self,
        amount: Decimal,
    ) -> Option<Decimal> {
        amount.checked_mul(self.periods_per_year())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Semimonthly => "semimonthly",
            Self::Bimonthly => "bimonthly",
            Self::Monthly => "monthly",
            Self::Annually => "annually",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = InvalidFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "semimonthly" => Ok(Self::Semimonthly),
            "bimonthly" => Ok(Self::Bimonthly),
            "monthly" => Ok(Self::Monthly),
            "annually" | "annual" | "yearly" => Ok(Self::Annually),
            _ => Err(InvalidFrequencyError {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = InvalidFrequencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.as_str().to_string()
    }
}
