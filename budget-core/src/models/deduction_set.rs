use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Frequency;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeductionConfigError {
    #[error("retirement contribution sets both a percentage and a fixed amount")]
    MixedRetirementModes,

    #[error("retirement percentage must be between 0 and 100, got {0}")]
    PercentOutOfRange(Decimal),

    #[error("pre-tax deductions {deductions} exceed gross income {gross}")]
    ExceedsGross { deductions: Decimal, gross: Decimal },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    #[default]
    PreTax,
    PostTax,
}

/// Retirement contribution, either a share of gross pay or a fixed yearly sum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RetirementInput", into = "RetirementInput")]
pub enum RetirementContribution {
    #[default]
    None,
    Percent {
        percent: Decimal,
        kind: ContributionKind,
    },
    Fixed {
        annual_amount: Decimal,
        kind: ContributionKind,
    },
}

impl RetirementContribution {
    pub fn kind(&self) -> Option<ContributionKind> {
        match self {
            Self::None => None,
            Self::Percent { kind, .. } | Self::Fixed { kind, .. } => Some(*kind),
        }
    }
}

/// Flat form of [`RetirementContribution`] as it appears in input files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_amount: Option<Decimal>,
    #[serde(default)]
    pub kind: ContributionKind,
}

impl TryFrom<RetirementInput> for RetirementContribution {
    type Error = DeductionConfigError;

    fn try_from(input: RetirementInput) -> Result<Self, Self::Error> {
        match (input.percent, input.annual_amount) {
            (Some(_), Some(_)) => Err(DeductionConfigError::MixedRetirementModes),
            (Some(percent), None) => {
                if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                    return Err(DeductionConfigError::PercentOutOfRange(percent));
                }
                Ok(Self::Percent {
                    percent,
                    kind: input.kind,
                })
            }
            (None, Some(annual_amount)) => Ok(Self::Fixed {
                annual_amount,
                kind: input.kind,
            }),
            (None, None) => Ok(Self::None),
        }
    }
}

impl From<RetirementContribution> for RetirementInput {
    fn from(contribution: RetirementContribution) -> Self {
        match contribution {
            RetirementContribution::None => Self::default(),
            RetirementContribution::Percent { percent, kind } => Self {
                percent: Some(percent),
                annual_amount: None,
                kind,
            },
            RetirementContribution::Fixed {
                annual_amount,
                kind,
            } => Self {
                percent: None,
                annual_amount: Some(annual_amount),
                kind,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicAmount {
    pub amount: Decimal,
    pub frequency: Frequency,
}

impl PeriodicAmount {
    pub fn new(
        amount: Decimal,
        frequency: Frequency,
    ) -> Self {
        Self { amount, frequency }
    }

    pub fn monthly(amount: Decimal) -> Self {
        Self::new(amount, Frequency::Monthly)
    }

    /// `None` when the annual figure overflows.
    pub fn annual(&self) -> Option<Decimal> {
        self.frequency.annualize(self.amount)
    }
}

/// Pre-tax elections attached to a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionSet {
    #[serde(default)]
    pub retirement: RetirementContribution,
    #[serde(default)]
    pub health_insurance_premium: Option<PeriodicAmount>,
    #[serde(default)]
    pub hsa_contribution: Option<PeriodicAmount>,
    #[serde(default)]
    pub fsa_contribution: Option<PeriodicAmount>,
    #[serde(default)]
    pub other_pretax_benefits: Vec<PeriodicAmount>,
}
