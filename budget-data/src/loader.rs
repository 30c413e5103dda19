use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use budget_core::{
    BracketTable, BracketTableError, FicaParameters, FilingStatusCode, InvalidStateCodeError,
    Jurisdiction, ReferenceData, ReferenceDataBuilder, ReferenceDataError, StandardDeduction,
    TaxBracket,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading reference data.
#[derive(Debug, Error)]
pub enum ReferenceLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unrecognised filing status or schedule '{0}'")]
    InvalidFilingStatus(String),

    #[error("invalid jurisdiction: {0}")]
    InvalidJurisdiction(#[from] InvalidStateCodeError),

    #[error("{jurisdiction} {filing_status} brackets for {tax_year} are invalid: {source}")]
    InvalidTable {
        tax_year: i32,
        jurisdiction: Jurisdiction,
        filing_status: FilingStatusCode,
        #[source]
        source: BracketTableError,
    },

    #[error("{0}")]
    Reference(#[from] ReferenceDataError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for ReferenceLoadError {
    fn from(err: csv::Error) -> Self {
        ReferenceLoadError::CsvParse(err.to_string())
    }
}

/// Maps a `filing_status` cell to a filing status.
///
/// Federal rows may use the IRS schedule letters:
///
/// - Schedule X → Single (S)
/// - Schedule Y-1 → Married Filing Jointly (MFJ)
/// - Schedule Y-2 → Married Filing Separately (MFS)
/// - Schedule Z → Head of Household (HOH)
///
/// Anything else must be a filing status code or profile key.
fn filing_status_for(code: &str) -> Result<FilingStatusCode, ReferenceLoadError> {
    match code.trim() {
        "X" => Ok(FilingStatusCode::Single),
        "Y-1" => Ok(FilingStatusCode::MarriedFilingJointly),
        "Y-2" => Ok(FilingStatusCode::MarriedFilingSeparately),
        "Z" => Ok(FilingStatusCode::HeadOfHousehold),
        other => FilingStatusCode::parse(other)
            .ok_or_else(|| ReferenceLoadError::InvalidFilingStatus(code.to_string())),
    }
}

/// A single row of a bracket CSV file.
///
/// - `tax_year`: the tax year (e.g. 2025)
/// - `jurisdiction`: `US` for federal, otherwise a two-letter state code
/// - `filing_status`: a filing status code or IRS schedule (X, Y-1, Y-2, Z)
/// - `floor`: lowest income taxed in this bracket
/// - `ceiling`: highest income taxed in this bracket (empty for unlimited)
/// - `rate`: the marginal rate as a decimal (e.g. 0.10 for 10%)
///
/// A flat-tax state is a single row with floor 0, no ceiling and its rate;
/// a state without income tax uses rate 0.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub jurisdiction: String,
    pub filing_status: String,
    pub floor: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn parse_csv<R, T>(reader: R) -> Result<Vec<T>, ReferenceLoadError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    Ok(records)
}

/// Loader for bracket tables from CSV files.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, ReferenceLoadError> {
        parse_csv(reader)
    }

    /// Build a validated table for every (year, jurisdiction, filing status)
    /// group and add it to `builder`.
    ///
    /// Schedule Y-1 covers both joint filers and qualifying surviving
    /// spouses, so every MFJ table is also registered as QSS unless the
    /// records already contain a QSS table for that year and jurisdiction.
    ///
    /// Returns the number of tables added.
    pub fn load(
        builder: &mut ReferenceDataBuilder,
        records: &[BracketRecord],
    ) -> Result<usize, ReferenceLoadError> {
        let mut groups: BTreeMap<(i32, Jurisdiction, FilingStatusCode), Vec<TaxBracket>> =
            BTreeMap::new();

        for record in records {
            let jurisdiction: Jurisdiction = record.jurisdiction.parse()?;
            let filing_status = filing_status_for(&record.filing_status)?;
            groups
                .entry((record.tax_year, jurisdiction, filing_status))
                .or_default()
                .push(TaxBracket::new(record.floor, record.ceiling, record.rate));
        }

        let mut added = 0;
        let mut joint_tables = Vec::new();

        for ((tax_year, jurisdiction, filing_status), brackets) in groups {
            let table = BracketTable::new(tax_year, jurisdiction.clone(), filing_status, brackets)
                .map_err(|source| ReferenceLoadError::InvalidTable {
                    tax_year,
                    jurisdiction: jurisdiction.clone(),
                    filing_status,
                    source,
                })?;
            if filing_status == FilingStatusCode::MarriedFilingJointly {
                joint_tables.push(table.clone());
            }
            debug!(
                tax_year,
                jurisdiction = %jurisdiction,
                filing_status = %filing_status,
                brackets = table.brackets().len(),
                "loaded bracket table"
            );
            builder.add_table(table)?;
            added += 1;
        }

        for joint in joint_tables {
            let qss = FilingStatusCode::QualifyingSurvivingSpouse;
            if builder.contains_table(joint.jurisdiction(), joint.tax_year(), qss) {
                continue;
            }
            let table = BracketTable::new(
                joint.tax_year(),
                joint.jurisdiction().clone(),
                qss,
                joint.brackets().to_vec(),
            )
            .map_err(|source| ReferenceLoadError::InvalidTable {
                tax_year: joint.tax_year(),
                jurisdiction: joint.jurisdiction().clone(),
                filing_status: qss,
                source,
            })?;
            builder.add_table(table)?;
            added += 1;
        }

        Ok(added)
    }
}

/// Loader for FICA parameters, one row per year.
///
/// Columns match [`FicaParameters`]: `tax_year`, `social_security_rate`,
/// `social_security_wage_base`, `medicare_rate`, `additional_medicare_rate`,
/// `additional_medicare_threshold`.
pub struct FicaLoader;

impl FicaLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<FicaParameters>, ReferenceLoadError> {
        parse_csv(reader)
    }

    pub fn load(
        builder: &mut ReferenceDataBuilder,
        records: &[FicaParameters],
    ) -> Result<usize, ReferenceLoadError> {
        for record in records {
            builder.add_fica(record.clone())?;
        }
        Ok(records.len())
    }
}

/// A single row of the standard deduction CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StandardDeductionRecord {
    pub tax_year: i32,
    pub filing_status: String,
    pub amount: Decimal,
}

/// Loader for standard deductions (`tax_year`, `filing_status`, `amount`).
///
/// As with brackets, an MFJ amount also applies to QSS when no QSS row is
/// present for that year.
pub struct StandardDeductionLoader;

impl StandardDeductionLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<StandardDeductionRecord>, ReferenceLoadError> {
        parse_csv(reader)
    }

    pub fn load(
        builder: &mut ReferenceDataBuilder,
        records: &[StandardDeductionRecord],
    ) -> Result<usize, ReferenceLoadError> {
        let mut deductions: BTreeMap<(i32, FilingStatusCode), Decimal> = BTreeMap::new();
        for record in records {
            let filing_status = filing_status_for(&record.filing_status)?;
            if deductions
                .insert((record.tax_year, filing_status), record.amount)
                .is_some()
            {
                return Err(ReferenceDataError::DuplicateStandardDeduction {
                    tax_year: record.tax_year,
                    filing_status,
                }
                .into());
            }
        }

        let joint: Vec<(i32, Decimal)> = deductions
            .iter()
            .filter(|((_, status), _)| *status == FilingStatusCode::MarriedFilingJointly)
            .map(|((year, _), amount)| (*year, *amount))
            .collect();
        for (year, amount) in joint {
            deductions
                .entry((year, FilingStatusCode::QualifyingSurvivingSpouse))
                .or_insert(amount);
        }

        let added = deductions.len();
        for ((tax_year, filing_status), amount) in deductions {
            builder.add_standard_deduction(StandardDeduction {
                tax_year,
                filing_status,
                amount,
            })?;
        }
        Ok(added)
    }
}

/// Readers for each reference data file.
pub struct ReferenceReaders<F, S, I, D> {
    pub federal_brackets: F,
    pub state_brackets: S,
    pub fica: I,
    pub standard_deductions: D,
}

/// Parses and validates all four reference files into a [`ReferenceData`].
pub fn load_reference<F, S, I, D>(
    readers: ReferenceReaders<F, S, I, D>,
) -> Result<ReferenceData, ReferenceLoadError>
where
    F: Read,
    S: Read,
    I: Read,
    D: Read,
{
    let mut builder = ReferenceData::builder();

    let federal = BracketTableLoader::parse(readers.federal_brackets)?;
    let federal_tables = BracketTableLoader::load(&mut builder, &federal)?;

    let state = BracketTableLoader::parse(readers.state_brackets)?;
    let state_tables = BracketTableLoader::load(&mut builder, &state)?;

    let fica = FicaLoader::parse(readers.fica)?;
    let fica_years = FicaLoader::load(&mut builder, &fica)?;

    let deductions = StandardDeductionLoader::parse(readers.standard_deductions)?;
    let deduction_rows = StandardDeductionLoader::load(&mut builder, &deductions)?;

    info!(
        federal_tables,
        state_tables, fica_years, deduction_rows, "reference data loaded"
    );

    Ok(builder.build())
}

pub const FEDERAL_BRACKETS_FILE: &str = "federal_brackets.csv";
pub const STATE_BRACKETS_FILE: &str = "state_brackets.csv";
pub const FICA_FILE: &str = "fica.csv";
pub const STANDARD_DEDUCTIONS_FILE: &str = "standard_deductions.csv";

fn open(
    dir: &Path,
    name: &str,
) -> Result<File, ReferenceLoadError> {
    let path = dir.join(name);
    File::open(&path).map_err(|source| ReferenceLoadError::Io { path, source })
}

/// Loads reference data from a directory holding `federal_brackets.csv`,
/// `state_brackets.csv`, `fica.csv` and `standard_deductions.csv`.
pub fn load_directory(dir: impl AsRef<Path>) -> Result<ReferenceData, ReferenceLoadError> {
    let dir = dir.as_ref();
    info!(dir = %dir.display(), "loading reference data");

    load_reference(ReferenceReaders {
        federal_brackets: open(dir, FEDERAL_BRACKETS_FILE)?,
        state_brackets: open(dir, STATE_BRACKETS_FILE)?,
        fica: open(dir, FICA_FILE)?,
        standard_deductions: open(dir, STANDARD_DEDUCTIONS_FILE)?,
    })
}
