//! Integration tests that load the on-disk fixture and run it through the
//! budget pipeline with the bundled reference data.
//!
//! These complement the unit tests inside budget_file.rs (which all use
//! inline strings) by covering the read-from-disk path end to end.

use std::path::{Path, PathBuf};

use budget_cli::budget_file::{self, BudgetFileError};
use budget_core::calculations::BudgetComposer;
use budget_core::{
    FilingStatusCode, Frequency, PeriodicAmount, RetirementContribution, TaxTreatment,
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_budget.toml")
}

#[test]
fn test_load_fixture_profile() {
    let input = budget_file::load_from_file(&fixture_path(), 2025).expect("fixture should load");

    assert_eq!(input.profile.tax_year, 2023);
    assert_eq!(input.profile.state.as_str(), "CA");
    assert_eq!(input.profile.filing_status, FilingStatusCode::Single);
}

#[test]
fn test_load_fixture_income_sources() {
    let input = budget_file::load_from_file(&fixture_path(), 2025).unwrap();

    assert_eq!(input.income_sources.len(), 3);
    let salary = &input.income_sources[0];
    assert_eq!(salary.amount, dec!(3000));
    assert_eq!(salary.frequency, Frequency::Biweekly);
    assert_eq!(salary.annual_amount(), Some(dec!(78000)));
    assert_eq!(
        input.income_sources[1].tax_treatment,
        TaxTreatment::SelfEmployed
    );
}

#[test]
fn test_load_fixture_deductions_and_expenses() {
    let input = budget_file::load_from_file(&fixture_path(), 2025).unwrap();

    assert!(matches!(
        input.deductions.retirement,
        RetirementContribution::Percent { .. }
    ));
    assert_eq!(
        input.deductions.hsa_contribution,
        Some(PeriodicAmount::new(dec!(1200), Frequency::Annually))
    );
    let annual_expenses: rust_decimal::Decimal = input
        .expenses
        .iter()
        .map(|e| e.annual_payment().unwrap())
        .sum();
    // rent 26400 + car 4800 + insurance 180
    assert_eq!(annual_expenses, dec!(31380));
}

#[test]
fn test_fixture_budget_with_bundled_data() {
    let input = budget_file::load_from_file(&fixture_path(), 2025).unwrap();
    let reference = budget_data::reference_data().unwrap();

    let result = BudgetComposer::new(&reference)
        .compute_budget(&input)
        .expect("fixture budget should compute");

    // 78000 salary + 6000 tutoring; the zero-amount gig is excluded
    assert_eq!(result.annual.gross_income, dec!(84000));
    assert_eq!(result.income.excluded.len(), 1);
    // 5% retirement 4200 + insurance 2400 + HSA 1200
    assert_eq!(result.annual.pre_tax_deductions, dec!(7800));
    assert_eq!(result.annual.taxable_income, dec!(76200));
    assert_eq!(result.expenses_total, dec!(31380));
    assert_eq!(result.per_source.len(), 2);
    assert_eq!(
        result.per_source.iter().map(|s| s.net_income).sum::<rust_decimal::Decimal>(),
        result.annual.net_income
    );
    assert!(!result.reference.any_fallback());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = budget_file::load_from_file(Path::new("does-not-exist.toml"), 2025).unwrap_err();

    assert!(matches!(err, BudgetFileError::Io { .. }));
}
