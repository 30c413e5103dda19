//! TOML loader for budget input files.
//!
//! ## File format
//!
//! ```toml
//! [profile]
//! tax_year = 2024          # optional, defaults to the current year
//! state = "CA"
//! filing_status = "single" # S, MFJ, MFS, HOH, QSS or the long keys
//!
//! [[income]]
//! id = "salary"            # optional, defaults to income-N
//! category = "Employment"  # optional
//! label = "Acme Corp"
//! amount = "5,000"         # number or string
//! frequency = "monthly"
//! tax_treatment = "W2"     # W2, Self-Employed or Other
//!
//! [deductions]
//! retirement_percent = 6           # or retirement_amount = 6000 (annual)
//! retirement_kind = "pre_tax"      # or "post_tax"
//! health_insurance = { amount = 250, frequency = "monthly" }
//! hsa = { amount = 100, frequency = "biweekly" }
//! fsa = { amount = 1200, frequency = "annually" }
//! other = [{ amount = 50, frequency = "monthly" }]
//!
//! [[expense]]
//! category = "Housing"
//! name = "Rent"
//! minimum_payment = 1800
//! preferred_payment = 2000 # optional
//! frequency = "monthly"
//! ```
//!
//! Every amount that recurs must say how often. A missing `frequency` or
//! `tax_treatment` is an error, not monthly or W2. Amounts, frequencies,
//! treatments and codes are validated while the file is converted; each
//! error names the field and the offending value.

use std::path::{Path, PathBuf};

use budget_core::{
    BudgetInput, ContributionKind, DeductionConfigError, DeductionSet, ExpenseItem,
    FilingStatusCode, Frequency, IncomeSource, InvalidStateCodeError, PeriodicAmount,
    RetirementContribution, RetirementInput, StateCode, TaxProfile, TaxTreatment,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::utils::parse_decimal;

// ---------------------------------------------------------------------------
// Serde-compatible layout that mirrors the TOML file
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BudgetFile {
    profile: ProfileSection,
    #[serde(default)]
    income: Vec<IncomeRow>,
    #[serde(default)]
    deductions: DeductionSection,
    #[serde(default)]
    expense: Vec<ExpenseRow>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileSection {
    tax_year: Option<i32>,
    state: String,
    filing_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IncomeRow {
    id: Option<String>,
    category: Option<String>,
    label: Option<String>,
    amount: RawAmount,
    frequency: Option<String>,
    tax_treatment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeductionSection {
    retirement_percent: Option<RawAmount>,
    retirement_amount: Option<RawAmount>,
    retirement_kind: Option<String>,
    health_insurance: Option<PeriodicRow>,
    hsa: Option<PeriodicRow>,
    fsa: Option<PeriodicRow>,
    #[serde(default)]
    other: Vec<PeriodicRow>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExpenseRow {
    category: Option<String>,
    name: String,
    minimum_payment: RawAmount,
    preferred_payment: Option<RawAmount>,
    frequency: Option<String>,
}

/// An amount written either as a TOML number or as text such as `"1,250.00"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PeriodicRow {
    amount: RawAmount,
    frequency: Option<String>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting a budget file.
#[derive(Debug, thiserror::Error)]
pub enum BudgetFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected layout.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid amount '{value}' for {field}")]
    InvalidAmount { field: String, value: String },

    #[error("{field} has no {key}")]
    MissingField { field: String, key: &'static str },

    #[error("invalid frequency '{value}' for {field}")]
    InvalidFrequency { field: String, value: String },

    #[error("invalid tax treatment '{value}' for {field}")]
    InvalidTaxTreatment { field: String, value: String },

    #[error("unrecognised filing status '{0}'")]
    InvalidFilingStatus(String),

    #[error(transparent)]
    InvalidStateCode(#[from] InvalidStateCodeError),

    #[error("unrecognised retirement kind '{0}': expected pre_tax or post_tax")]
    InvalidRetirementKind(String),

    #[error("invalid deductions: {0}")]
    InvalidDeductions(#[from] DeductionConfigError),
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

fn amount(
    field: &str,
    raw: RawAmount,
) -> Result<Decimal, BudgetFileError> {
    let text = match raw {
        RawAmount::Integer(value) => return Ok(Decimal::from(value)),
        // shortest round-trip form, so 0.1 stays 0.1
        RawAmount::Float(value) => value.to_string(),
        RawAmount::Text(text) => text,
    };
    parse_decimal(&text).map_err(|_| BudgetFileError::InvalidAmount {
        field: field.to_string(),
        value: text,
    })
}

fn frequency(
    field: &str,
    raw: Option<String>,
) -> Result<Frequency, BudgetFileError> {
    match raw {
        None => Err(BudgetFileError::MissingField {
            field: field.to_string(),
            key: "frequency",
        }),
        Some(value) => value
            .parse()
            .map_err(|_| BudgetFileError::InvalidFrequency {
                field: field.to_string(),
                value,
            }),
    }
}

fn periodic(
    field: &str,
    row: PeriodicRow,
) -> Result<PeriodicAmount, BudgetFileError> {
    Ok(PeriodicAmount::new(
        amount(field, row.amount)?,
        frequency(field, row.frequency)?,
    ))
}

fn optional_periodic(
    field: &str,
    raw: Option<PeriodicRow>,
) -> Result<Option<PeriodicAmount>, BudgetFileError> {
    raw.map(|raw| periodic(field, raw)).transpose()
}

fn convert_profile(
    section: ProfileSection,
    default_year: i32,
) -> Result<TaxProfile, BudgetFileError> {
    let filing_status = match section.filing_status {
        None => FilingStatusCode::default(),
        Some(code) => {
            FilingStatusCode::parse(&code).ok_or(BudgetFileError::InvalidFilingStatus(code))?
        }
    };

    Ok(TaxProfile {
        tax_year: section.tax_year.unwrap_or(default_year),
        state: StateCode::new(&section.state)?,
        filing_status,
    })
}

/// row_number is 1-based (for error messages and default ids).
fn convert_income(
    row: IncomeRow,
    row_number: usize,
) -> Result<IncomeSource, BudgetFileError> {
    let field = format!("income {row_number}");
    let pay_frequency = frequency(&field, row.frequency)?;
    let tax_treatment: TaxTreatment = match row.tax_treatment {
        None => {
            return Err(BudgetFileError::MissingField {
                field: field.clone(),
                key: "tax_treatment",
            });
        }
        Some(value) => value
            .parse()
            .map_err(|_| BudgetFileError::InvalidTaxTreatment {
                field: field.clone(),
                value,
            })?,
    };
    let id = row.id.unwrap_or_else(|| format!("income-{row_number}"));

    Ok(IncomeSource {
        label: row.label.unwrap_or_else(|| id.clone()),
        id,
        category: row.category.unwrap_or_else(|| "Income".to_string()),
        amount: amount(&field, row.amount)?,
        frequency: pay_frequency,
        tax_treatment,
    })
}

fn convert_deductions(section: DeductionSection) -> Result<DeductionSet, BudgetFileError> {
    let kind = match section.retirement_kind.as_deref() {
        None => ContributionKind::default(),
        Some(value) => match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pre_tax" | "pretax" => ContributionKind::PreTax,
            "post_tax" | "posttax" | "roth" => ContributionKind::PostTax,
            _ => return Err(BudgetFileError::InvalidRetirementKind(value.to_string())),
        },
    };
    let retirement = RetirementContribution::try_from(RetirementInput {
        percent: section
            .retirement_percent
            .map(|raw| amount("retirement_percent", raw))
            .transpose()?,
        annual_amount: section
            .retirement_amount
            .map(|raw| amount("retirement_amount", raw))
            .transpose()?,
        kind,
    })?;

    Ok(DeductionSet {
        retirement,
        health_insurance_premium: optional_periodic("health_insurance", section.health_insurance)?,
        hsa_contribution: optional_periodic("hsa", section.hsa)?,
        fsa_contribution: optional_periodic("fsa", section.fsa)?,
        other_pretax_benefits: section
            .other
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| periodic(&format!("other {}", idx + 1), raw))
            .collect::<Result<_, _>>()?,
    })
}

fn convert_expense(
    row: ExpenseRow,
    row_number: usize,
) -> Result<ExpenseItem, BudgetFileError> {
    let field = format!("expense {row_number} ({})", row.name);
    let preferred_payment = row
        .preferred_payment
        .map(|raw| amount(&field, raw))
        .transpose()?;

    Ok(ExpenseItem {
        category: row.category.unwrap_or_else(|| "Other".to_string()),
        minimum_payment: amount(&field, row.minimum_payment)?,
        preferred_payment,
        frequency: frequency(&field, row.frequency)?,
        name: row.name,
    })
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Parse a budget file's contents into a [`BudgetInput`].
///
/// `default_year` is used when the profile omits `tax_year`.
///
/// # Errors
///
/// * [`BudgetFileError::Parse`] if the TOML is invalid or has unknown keys.
/// * [`BudgetFileError::MissingField`] for a row without a frequency or an
///   income row without a tax treatment.
/// * The `Invalid*` variants for values that fail validation.
pub fn load_from_str(
    input: &str,
    default_year: i32,
) -> Result<BudgetInput, BudgetFileError> {
    let file: BudgetFile = toml::from_str(input)?;

    let profile = convert_profile(file.profile, default_year)?;
    let income_sources = file
        .income
        .into_iter()
        .enumerate()
        .map(|(idx, row)| convert_income(row, idx + 1))
        .collect::<Result<Vec<_>, _>>()?;
    let deductions = convert_deductions(file.deductions)?;
    let expenses = file
        .expense
        .into_iter()
        .enumerate()
        .map(|(idx, row)| convert_expense(row, idx + 1))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        tax_year = profile.tax_year,
        state = %profile.state,
        income_sources = income_sources.len(),
        expenses = expenses.len(),
        "budget file parsed"
    );

    Ok(BudgetInput {
        profile,
        income_sources,
        deductions,
        expenses,
    })
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(
    path: &Path,
    default_year: i32,
) -> Result<BudgetInput, BudgetFileError> {
    let contents = std::fs::read_to_string(path).map_err(|source| BudgetFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents, default_year)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const MINIMAL: &str = r#"
[profile]
state = "tx"

[[income]]
amount = 4000
frequency = "monthly"
tax_treatment = "W2"
"#;

    const FULL: &str = r#"
[profile]
tax_year = 2024
state = "CA"
filing_status = "married_joint"

[[income]]
id = "salary"
category = "Employment"
label = "Acme Corp"
amount = "5,000.00"
frequency = "biweekly"
tax_treatment = "W2"

[[income]]
id = "consulting"
label = "Side work"
amount = 12000
frequency = "annually"
tax_treatment = "1099"

[deductions]
retirement_percent = 6
health_insurance = { amount = 250, frequency = "monthly" }
hsa = { amount = 100, frequency = "semi-monthly" }
other = [{ amount = 25.5, frequency = "monthly" }]

[[expense]]
category = "Housing"
name = "Rent"
minimum_payment = 1800
preferred_payment = 2000
frequency = "monthly"

[[expense]]
name = "Car insurance"
minimum_payment = "600"
frequency = "annually"
"#;

    // -----------------------------------------------------------------------
    // Defaults
    // -----------------------------------------------------------------------

    #[test]
    fn test_minimal_file_fills_profile_and_id_defaults() {
        let input = load_from_str(MINIMAL, 2025).expect("should parse minimal file");

        assert_eq!(input.profile.tax_year, 2025);
        assert_eq!(input.profile.state.as_str(), "TX");
        assert_eq!(input.profile.filing_status, FilingStatusCode::Single);

        let source = &input.income_sources[0];
        assert_eq!(source.id, "income-1");
        assert_eq!(source.label, "income-1");
        assert_eq!(source.amount, dec!(4000));
        assert_eq!(source.frequency, Frequency::Monthly);
        assert_eq!(source.tax_treatment, TaxTreatment::W2);
        assert_eq!(input.deductions, DeductionSet::default());
        assert!(input.expenses.is_empty());
    }

    // -----------------------------------------------------------------------
    // Full file
    // -----------------------------------------------------------------------

    #[test]
    fn test_full_file_income_sources() {
        let input = load_from_str(FULL, 2025).unwrap();

        assert_eq!(input.profile.tax_year, 2024);
        assert_eq!(
            input.profile.filing_status,
            FilingStatusCode::MarriedFilingJointly
        );
        assert_eq!(input.income_sources.len(), 2);
        assert_eq!(input.income_sources[0].amount, dec!(5000.00));
        assert_eq!(input.income_sources[0].frequency, Frequency::Biweekly);
        assert_eq!(
            input.income_sources[1].tax_treatment,
            TaxTreatment::SelfEmployed
        );
        assert_eq!(input.income_sources[1].category, "Income");
    }

    #[test]
    fn test_full_file_deductions() {
        let input = load_from_str(FULL, 2025).unwrap();
        let deductions = &input.deductions;

        assert_eq!(
            deductions.retirement,
            RetirementContribution::Percent {
                percent: dec!(6),
                kind: ContributionKind::PreTax,
            }
        );
        assert_eq!(
            deductions.health_insurance_premium,
            Some(PeriodicAmount::monthly(dec!(250)))
        );
        assert_eq!(
            deductions.hsa_contribution,
            Some(PeriodicAmount::new(dec!(100), Frequency::Semimonthly))
        );
        assert_eq!(deductions.fsa_contribution, None);
        assert_eq!(
            deductions.other_pretax_benefits,
            vec![PeriodicAmount::monthly(dec!(25.5))]
        );
    }

    #[test]
    fn test_full_file_expenses() {
        let input = load_from_str(FULL, 2025).unwrap();

        assert_eq!(input.expenses[0].payment(), dec!(2000));
        assert_eq!(input.expenses[1].category, "Other");
        assert_eq!(input.expenses[1].frequency, Frequency::Annually);
        assert_eq!(input.expenses[1].annual_payment(), Some(dec!(600)));
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn test_invalid_frequency_names_value() {
        let toml = r#"
[profile]
state = "CA"

[[income]]
amount = 100
frequency = "fortnightly-ish"
tax_treatment = "W2"
"#;
        match load_from_str(toml, 2025) {
            Err(BudgetFileError::InvalidFrequency { field, value }) => {
                assert_eq!(field, "income 1");
                assert_eq!(value, "fortnightly-ish");
            }
            other => panic!("expected InvalidFrequency, got {other:?}"),
        }
    }

    #[test]
    fn test_income_without_frequency_is_rejected() {
        let toml = r#"
[profile]
tax_year = 2023
state = "TX"

[[income]]
amount = 85000
"#;
        match load_from_str(toml, 2023) {
            Err(BudgetFileError::MissingField { field, key }) => {
                assert_eq!(field, "income 1");
                assert_eq!(key, "frequency");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_income_without_tax_treatment_is_rejected() {
        let toml = r#"
[profile]
state = "TX"

[[income]]
amount = 85000
frequency = "annually"
"#;
        match load_from_str(toml, 2023) {
            Err(BudgetFileError::MissingField { field, key }) => {
                assert_eq!(field, "income 1");
                assert_eq!(key, "tax_treatment");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_deduction_without_frequency_is_rejected() {
        let toml = r#"
[profile]
state = "TX"

[deductions]
health_insurance = { amount = 250 }
"#;
        let err = load_from_str(toml, 2023).unwrap_err();

        assert!(matches!(
            err,
            BudgetFileError::MissingField { key: "frequency", .. }
        ));
    }

    #[test]
    fn test_bare_deduction_amount_is_rejected() {
        let toml = "[profile]\nstate = \"TX\"\n\n[deductions]\nhsa = 100\n";

        let err = load_from_str(toml, 2023).unwrap_err();

        assert!(matches!(err, BudgetFileError::Parse(_)));
    }

    #[test]
    fn test_expense_without_frequency_is_rejected() {
        let toml = r#"
[profile]
state = "TX"

[[expense]]
name = "Rent"
minimum_payment = 1800
"#;
        match load_from_str(toml, 2023) {
            Err(BudgetFileError::MissingField { field, key }) => {
                assert_eq!(field, "expense 1 (Rent)");
                assert_eq!(key, "frequency");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_amount_names_value() {
        let toml = r#"
[profile]
state = "CA"

[[expense]]
name = "Rent"
minimum_payment = "lots"
frequency = "monthly"
"#;
        match load_from_str(toml, 2025) {
            Err(BudgetFileError::InvalidAmount { value, .. }) => assert_eq!(value, "lots"),
            other => panic!("expected InvalidAmount, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_state_code() {
        let toml = "[profile]\nstate = \"California\"\n";

        let err = load_from_str(toml, 2025).unwrap_err();

        assert!(matches!(err, BudgetFileError::InvalidStateCode(_)));
    }

    #[test]
    fn test_invalid_tax_treatment() {
        let toml = "[profile]\nstate = \"CA\"\n\n[[income]]\namount = 1\nfrequency = \"weekly\"\ntax_treatment = \"lottery\"\n";

        let err = load_from_str(toml, 2025).unwrap_err();

        assert!(matches!(
            err,
            BudgetFileError::InvalidTaxTreatment { ref value, .. } if value == "lottery"
        ));
    }

    #[test]
    fn test_mixed_retirement_modes_rejected() {
        let toml = r#"
[profile]
state = "CA"

[deductions]
retirement_percent = 5
retirement_amount = 3000
"#;
        let err = load_from_str(toml, 2025).unwrap_err();

        assert!(matches!(
            err,
            BudgetFileError::InvalidDeductions(DeductionConfigError::MixedRetirementModes)
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let toml = "[profile]\nstate = \"CA\"\nincome = 5\n";

        let err = load_from_str(toml, 2025).unwrap_err();

        assert!(matches!(err, BudgetFileError::Parse(_)));
    }
}
