use serde::Serialize;
use thiserror::Error;

use crate::models::{
    BracketTable, BracketTableError, FicaParameters, FicaParametersError, FilingStatusCode,
    Jurisdiction, StandardDeduction,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceDataError {
    #[error("no {jurisdiction} bracket table for {tax_year} or any other year")]
    MissingBracketTable {
        jurisdiction: Jurisdiction,
        tax_year: i32,
    },

    #[error("no FICA parameters for {0} or any other year")]
    MissingFicaParameters(i32),

    #[error("no standard deduction for {filing_status} in {tax_year} or any other year")]
    MissingStandardDeduction {
        tax_year: i32,
        filing_status: FilingStatusCode,
    },

    #[error("duplicate {jurisdiction} {filing_status} bracket table for {tax_year}")]
    DuplicateTable {
        jurisdiction: Jurisdiction,
        tax_year: i32,
        filing_status: FilingStatusCode,
    },

    #[error("duplicate FICA parameters for {0}")]
    DuplicateFicaYear(i32),

    #[error("duplicate {filing_status} standard deduction for {tax_year}")]
    DuplicateStandardDeduction {
        tax_year: i32,
        filing_status: FilingStatusCode,
    },

    #[error("standard deduction for {filing_status} in {tax_year} is negative")]
    InvalidStandardDeduction {
        tax_year: i32,
        filing_status: FilingStatusCode,
    },

    #[error("invalid bracket table: {0}")]
    InvalidTable(#[from] BracketTableError),

    #[error("invalid FICA parameters: {0}")]
    InvalidFica(#[from] FicaParametersError),
}

/// Which table a lookup asked for and which one it got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableUsage {
    pub jurisdiction: Jurisdiction,
    pub requested_year: i32,
    pub used_year: i32,
    pub requested_status: Option<FilingStatusCode>,
    pub used_status: Option<FilingStatusCode>,
}

impl TableUsage {
    pub fn is_fallback(&self) -> bool {
        self.requested_year != self.used_year || self.requested_status != self.used_status
    }
}

/// A reference record together with how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'a, T> {
    pub value: &'a T,
    pub usage: TableUsage,
}

/// Read access to versioned reference data.
///
/// Lookups never fail just because a year is missing: the most recent year
/// on file is used instead and reported through [`TableUsage`]. A missing
/// filing status falls back along [`FilingStatusCode::fallback`].
pub trait TaxTableSource: Send + Sync {
    fn bracket_table(
        &self,
        jurisdiction: &Jurisdiction,
        tax_year: i32,
        filing_status: FilingStatusCode,
    ) -> Result<Resolved<'_, BracketTable>, ReferenceDataError>;

    fn fica_parameters(
        &self,
        tax_year: i32,
    ) -> Result<Resolved<'_, FicaParameters>, ReferenceDataError>;

    fn standard_deduction(
        &self,
        tax_year: i32,
        filing_status: FilingStatusCode,
    ) -> Result<Resolved<'_, StandardDeduction>, ReferenceDataError>;

    /// Every year with at least one record, ascending.
    fn tax_years(&self) -> Vec<i32>;

    /// Every jurisdiction with at least one bracket table, federal first.
    fn jurisdictions(&self) -> Vec<Jurisdiction>;
}
