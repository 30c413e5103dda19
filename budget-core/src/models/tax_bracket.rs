use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{FilingStatusCode, Jurisdiction};

/// Reasons a bracket table is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BracketTableError {
    #[error("bracket table has no brackets")]
    Empty,

    #[error("lowest bracket must start at 0, starts at {0}")]
    FirstFloorNotZero(Decimal),

    #[error("bracket floor must be non-negative, got {0}")]
    NegativeFloor(Decimal),

    #[error("bracket rate must be between 0 and 1, got {0}")]
    InvalidRate(Decimal),

    #[error("bracket floors must strictly increase: {previous} then {next}")]
    FloorsNotIncreasing { previous: Decimal, next: Decimal },

    #[error("bracket ceiling {ceiling} is not above its floor {floor}")]
    InvertedBracket { floor: Decimal, ceiling: Decimal },

    #[error("bracket ending at {ceiling} is followed by a bracket starting at {next_floor}")]
    NotContiguous { ceiling: Decimal, next_floor: Decimal },

    #[error("only the top bracket may be uncapped; bracket at {floor} has no ceiling")]
    UncappedBelowTop { floor: Decimal },

    #[error("top bracket must be uncapped, ends at {ceiling}")]
    TopBracketCapped { ceiling: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub floor: Decimal,
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        floor: Decimal,
        ceiling: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            floor,
            ceiling,
            rate,
        }
    }

    /// Size of the band, `None` for the uncapped top bracket.
    pub fn width(&self) -> Option<Decimal> {
        self.ceiling.map(|ceiling| ceiling - self.floor)
    }
}

/// An ordered, validated schedule for one (year, jurisdiction, filing status).
///
/// Fields are private so a published table cannot be edited; a new year is
/// added as a new table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    tax_year: i32,
    jurisdiction: Jurisdiction,
    filing_status: FilingStatusCode,
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Sorts `brackets` by floor and checks that they form one contiguous
    /// schedule from zero with a single uncapped top bracket.
    pub fn new(
        tax_year: i32,
        jurisdiction: Jurisdiction,
        filing_status: FilingStatusCode,
        mut brackets: Vec<TaxBracket>,
    ) -> Result<Self, BracketTableError> {
        brackets.sort_by(|a, b| a.floor.cmp(&b.floor));
        Self::validate(&brackets)?;

        Ok(Self {
            tax_year,
            jurisdiction,
            filing_status,
            brackets,
        })
    }

    /// Single-bracket table taxing every dollar at `rate`.
    ///
    /// Flat-tax states and states without an income tax (rate 0) both use
    /// this form so they go through the same bracket walk.
    pub fn flat(
        tax_year: i32,
        jurisdiction: Jurisdiction,
        filing_status: FilingStatusCode,
        rate: Decimal,
    ) -> Result<Self, BracketTableError> {
        Self::new(
            tax_year,
            jurisdiction,
            filing_status,
            vec![TaxBracket::new(Decimal::ZERO, None, rate)],
        )
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub fn jurisdiction(&self) -> &Jurisdiction {
        &self.jurisdiction
    }

    pub fn filing_status(&self) -> FilingStatusCode {
        self.filing_status
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn is_flat(&self) -> bool {
        self.brackets.len() == 1
    }

    fn validate(brackets: &[TaxBracket]) -> Result<(), BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty)?;
        if first.floor != Decimal::ZERO {
            return Err(BracketTableError::FirstFloorNotZero(first.floor));
        }

        for bracket in brackets {
            if bracket.floor < Decimal::ZERO {
                return Err(BracketTableError::NegativeFloor(bracket.floor));
            }
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::InvalidRate(bracket.rate));
            }
            if let Some(ceiling) = bracket.ceiling {
                if ceiling <= bracket.floor {
                    return Err(BracketTableError::InvertedBracket {
                        floor: bracket.floor,
                        ceiling,
                    });
                }
            }
        }

        for pair in brackets.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if upper.floor <= lower.floor {
                return Err(BracketTableError::FloorsNotIncreasing {
                    previous: lower.floor,
                    next: upper.floor,
                });
            }
            let ceiling = lower
                .ceiling
                .ok_or(BracketTableError::UncappedBelowTop { floor: lower.floor })?;
            if ceiling != upper.floor {
                return Err(BracketTableError::NotContiguous {
                    ceiling,
                    next_floor: upper.floor,
                });
            }
        }

        match brackets.last().and_then(|top| top.ceiling) {
            Some(ceiling) => Err(BracketTableError::TopBracketCapped { ceiling }),
            None => Ok(()),
        }
    }
}
