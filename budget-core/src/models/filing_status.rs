use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised filing status '{0}'")]
pub struct InvalidFilingStatusError(pub String);

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum FilingStatusCode {
    #[default]
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatusCode {
    pub const ALL: [FilingStatusCode; 5] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
        Self::QualifyingSurvivingSpouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
            Self::QualifyingSurvivingSpouse => "QSS",
        }
    }

    /// Long form used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
            Self::QualifyingSurvivingSpouse => "Qualifying Surviving Spouse",
        }
    }

    /// Accepts the short codes (`S`, `MFJ`, ...) as well as the snake-case
    /// keys stored on user profiles (`single`, `married_joint`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        match trimmed {
            "S" => return Some(Self::Single),
            "MFJ" => return Some(Self::MarriedFilingJointly),
            "MFS" => return Some(Self::MarriedFilingSeparately),
            "HOH" => return Some(Self::HeadOfHousehold),
            "QSS" => return Some(Self::QualifyingSurvivingSpouse),
            _ => {}
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "married_joint" | "married_filing_jointly" => Some(Self::MarriedFilingJointly),
            "married_separate" | "married_filing_separately" => {
                Some(Self::MarriedFilingSeparately)
            }
            "head_of_household" => Some(Self::HeadOfHousehold),
            "qualifying_surviving_spouse" | "qualifying_widow" => {
                Some(Self::QualifyingSurvivingSpouse)
            }
            _ => None,
        }
    }

    /// The status whose table is used when no table exists for this one.
    ///
    /// A qualifying surviving spouse files on the joint schedule; every other
    /// status degrades to the single schedule. `Single` has no fallback.
    pub fn fallback(&self) -> Option<Self> {
        match self {
            Self::QualifyingSurvivingSpouse => Some(Self::MarriedFilingJointly),
            Self::MarriedFilingJointly | Self::MarriedFilingSeparately | Self::HeadOfHousehold => {
                Some(Self::Single)
            }
            Self::Single => None,
        }
    }
}

impl fmt::Display for FilingStatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilingStatusCode {
    type Err = InvalidFilingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidFilingStatusError(s.to_string()))
    }
}

impl TryFrom<String> for FilingStatusCode {
    type Error = InvalidFilingStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilingStatusCode> for String {
    fn from(code: FilingStatusCode) -> Self {
        code.as_str().to_string()
    }
}
