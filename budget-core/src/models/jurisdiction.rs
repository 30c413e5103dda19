use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid state code '{0}': expected two letters")]
pub struct InvalidStateCodeError(pub String);

/// Two-letter US state code, always stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(String);

impl StateCode {
    pub fn new(code: &str) -> Result<Self, InvalidStateCodeError> {
        let trimmed = code.trim();
        if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(InvalidStateCodeError(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StateCode {
    type Err = InvalidStateCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StateCode {
    type Error = InvalidStateCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<StateCode> for String {
    fn from(code: StateCode) -> Self {
        code.0
    }
}

/// Taxing authority a bracket table belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Jurisdiction {
    Federal,
    State(StateCode),
}

impl Jurisdiction {
    pub fn state(code: &str) -> Result<Self, InvalidStateCodeError> {
        StateCode::new(code).map(Self::State)
    }

    pub fn is_federal(&self) -> bool {
        matches!(self, Self::Federal)
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Federal => f.write_str("US"),
            Self::State(code) => write!(f, "{code}"),
        }
    }
}

impl FromStr for Jurisdiction {
    type Err = InvalidStateCodeError;

    /// `US`, `FED` and `federal` select the federal schedule; anything else
    /// must be a two-letter state code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" | "fed" | "federal" => Ok(Self::Federal),
            _ => Self::state(s),
        }
    }
}

impl TryFrom<String> for Jurisdiction {
    type Error = InvalidStateCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Jurisdiction> for String {
    fn from(jurisdiction: Jurisdiction) -> Self {
        jurisdiction.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn state_code_is_upper_cased() {
        let code = StateCode::new(" ca ").unwrap();

        assert_eq!(code.as_str(), "CA");
    }

    #[test]
    fn state_code_rejects_wrong_length_and_digits() {
        assert_eq!(
            StateCode::new("CAL"),
            Err(InvalidStateCodeError("CAL".to_string()))
        );
        assert!(StateCode::new("C1").is_err());
        assert!(StateCode::new("").is_err());
    }

    #[test]
    fn jurisdiction_parses_federal_aliases() {
        for alias in ["US", "fed", "Federal"] {
            assert_eq!(alias.parse::<Jurisdiction>(), Ok(Jurisdiction::Federal));
        }
    }

    #[test]
    fn jurisdiction_parses_state_and_round_trips_display() {
        let jurisdiction: Jurisdiction = "ny".parse().unwrap();

        assert_eq!(jurisdiction, Jurisdiction::state("NY").unwrap());
        assert_eq!(jurisdiction.to_string(), "NY");
        assert!(!jurisdiction.is_federal());
    }
}
