use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use tracing::warn;

use super::source::{ReferenceDataError, Resolved, TableUsage, TaxTableSource};
use crate::models::{
    BracketTable, FicaParameters, FilingStatusCode, Jurisdiction, StandardDeduction,
};

type TableKey = (Jurisdiction, FilingStatusCode, i32);

/// Immutable reference data, built once through [`ReferenceDataBuilder`].
///
/// Holds no interior mutability, so it can be shared across threads behind
/// an `Arc` or a plain reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    tables: BTreeMap<TableKey, BracketTable>,
    fica: BTreeMap<i32, FicaParameters>,
    standard_deductions: BTreeMap<(FilingStatusCode, i32), StandardDeduction>,
}

impl ReferenceData {
    pub fn builder() -> ReferenceDataBuilder {
        ReferenceDataBuilder::default()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Every table, ordered by jurisdiction, filing status then year.
    pub fn tables(&self) -> impl Iterator<Item = &BracketTable> {
        self.tables.values()
    }

    pub fn fica_years(&self) -> Vec<i32> {
        self.fica.keys().copied().collect()
    }

    fn table_years(
        &self,
        jurisdiction: &Jurisdiction,
        filing_status: FilingStatusCode,
    ) -> Vec<i32> {
        self.tables
            .keys()
            .filter(|(j, s, _)| j == jurisdiction && *s == filing_status)
            .map(|(_, _, year)| *year)
            .collect()
    }
}

/// The requested year when present, otherwise the most recent one.
fn pick_year(
    years: &[i32],
    requested: i32,
) -> Option<i32> {
    if years.contains(&requested) {
        Some(requested)
    } else {
        years.iter().copied().max()
    }
}

fn log_fallback(usage: &TableUsage) {
    if usage.is_fallback() {
        warn!(
            jurisdiction = %usage.jurisdiction,
            requested_year = usage.requested_year,
            used_year = usage.used_year,
            requested_status = ?usage.requested_status,
            used_status = ?usage.used_status,
            "reference data fallback"
        );
    }
}

impl TaxTableSource for ReferenceData {
    fn bracket_table(
        &self,
        jurisdiction: &Jurisdiction,
        tax_year: i32,
        filing_status: FilingStatusCode,
    ) -> Result<Resolved<'_, BracketTable>, ReferenceDataError> {
        let mut status = Some(filing_status);
        while let Some(candidate) = status {
            let years = self.table_years(jurisdiction, candidate);
            if let Some(year) = pick_year(&years, tax_year) {
                let key = (jurisdiction.clone(), candidate, year);
                if let Some(table) = self.tables.get(&key) {
                    let usage = TableUsage {
                        jurisdiction: jurisdiction.clone(),
                        requested_year: tax_year,
                        used_year: year,
                        requested_status: Some(filing_status),
                        used_status: Some(candidate),
                    };
                    log_fallback(&usage);
                    return Ok(Resolved {
                        value: table,
                        usage,
                    });
                }
            }
            status = candidate.fallback();
        }

        Err(ReferenceDataError::MissingBracketTable {
            jurisdiction: jurisdiction.clone(),
            tax_year,
        })
    }

    fn fica_parameters(
        &self,
        tax_year: i32,
    ) -> Result<Resolved<'_, FicaParameters>, ReferenceDataError> {
        let years = self.fica_years();
        let parameters = pick_year(&years, tax_year)
            .and_then(|year| self.fica.get(&year))
            .ok_or(ReferenceDataError::MissingFicaParameters(tax_year))?;

        let usage = TableUsage {
            jurisdiction: Jurisdiction::Federal,
            requested_year: tax_year,
            used_year: parameters.tax_year,
            requested_status: None,
            used_status: None,
        };
        log_fallback(&usage);
        Ok(Resolved {
            value: parameters,
            usage,
        })
    }

    fn standard_deduction(
        &self,
        tax_year: i32,
        filing_status: FilingStatusCode,
    ) -> Result<Resolved<'_, StandardDeduction>, ReferenceDataError> {
        let mut status = Some(filing_status);
        while let Some(candidate) = status {
            let years: Vec<i32> = self
                .standard_deductions
                .keys()
                .filter(|(s, _)| *s == candidate)
                .map(|(_, year)| *year)
                .collect();
            if let Some(deduction) = pick_year(&years, tax_year)
                .and_then(|year| self.standard_deductions.get(&(candidate, year)))
            {
                let usage = TableUsage {
                    jurisdiction: Jurisdiction::Federal,
                    requested_year: tax_year,
                    used_year: deduction.tax_year,
                    requested_status: Some(filing_status),
                    used_status: Some(candidate),
                };
                log_fallback(&usage);
                return Ok(Resolved {
                    value: deduction,
                    usage,
                });
            }
            status = candidate.fallback();
        }

        Err(ReferenceDataError::MissingStandardDeduction {
            tax_year,
            filing_status,
        })
    }

    fn tax_years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .tables
            .keys()
            .map(|(_, _, year)| *year)
            .chain(self.fica.keys().copied())
            .chain(self.standard_deductions.keys().map(|(_, year)| *year))
            .collect();
        years.into_iter().collect()
    }

    fn jurisdictions(&self) -> Vec<Jurisdiction> {
        let jurisdictions: BTreeSet<&Jurisdiction> =
            self.tables.keys().map(|(jurisdiction, _, _)| jurisdiction).collect();
        jurisdictions.into_iter().cloned().collect()
    }
}

/// Collects reference records and rejects duplicates before freezing them
/// into a [`ReferenceData`].
#[derive(Debug, Default)]
pub struct ReferenceDataBuilder {
    data: ReferenceData,
}

impl ReferenceDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(
        &mut self,
        table: BracketTable,
    ) -> Result<&mut Self, ReferenceDataError> {
        let key = (
            table.jurisdiction().clone(),
            table.filing_status(),
            table.tax_year(),
        );
        if self.data.tables.contains_key(&key) {
            return Err(ReferenceDataError::DuplicateTable {
                jurisdiction: key.0,
                tax_year: key.2,
                filing_status: key.1,
            });
        }
        self.data.tables.insert(key, table);
        Ok(self)
    }

    pub fn add_fica(
        &mut self,
        parameters: FicaParameters,
    ) -> Result<&mut Self, ReferenceDataError> {
        parameters.validate()?;
        if self.data.fica.contains_key(&parameters.tax_year) {
            return Err(ReferenceDataError::DuplicateFicaYear(parameters.tax_year));
        }
        self.data.fica.insert(parameters.tax_year, parameters);
        Ok(self)
    }

    pub fn add_standard_deduction(
        &mut self,
        deduction: StandardDeduction,
    ) -> Result<&mut Self, ReferenceDataError> {
        let key = (deduction.filing_status, deduction.tax_year);
        if deduction.amount < Decimal::ZERO {
            return Err(ReferenceDataError::InvalidStandardDeduction {
                tax_year: deduction.tax_year,
                filing_status: deduction.filing_status,
            });
        }
        if self.data.standard_deductions.contains_key(&key) {
            return Err(ReferenceDataError::DuplicateStandardDeduction {
                tax_year: deduction.tax_year,
                filing_status: deduction.filing_status,
            });
        }
        self.data.standard_deductions.insert(key, deduction);
        Ok(self)
    }

    pub fn contains_table(
        &self,
        jurisdiction: &Jurisdiction,
        tax_year: i32,
        filing_status: FilingStatusCode,
    ) -> bool {
        self.data
            .tables
            .contains_key(&(jurisdiction.clone(), filing_status, tax_year))
    }

    pub fn build(self) -> ReferenceData {
        self.data
    }
}
