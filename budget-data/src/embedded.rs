use budget_core::ReferenceData;

use crate::loader::{ReferenceLoadError, ReferenceReaders, load_reference};

pub const FEDERAL_BRACKETS_CSV: &str = include_str!("../data/federal_brackets.csv");
pub const STATE_BRACKETS_CSV: &str = include_str!("../data/state_brackets.csv");
pub const FICA_CSV: &str = include_str!("../data/fica.csv");
pub const STANDARD_DEDUCTIONS_CSV: &str = include_str!("../data/standard_deductions.csv");

/// Builds the bundled reference data.
pub fn reference_data() -> Result<ReferenceData, ReferenceLoadError> {
    load_reference(ReferenceReaders {
        federal_brackets: FEDERAL_BRACKETS_CSV.as_bytes(),
        state_brackets: STATE_BRACKETS_CSV.as_bytes(),
        fica: FICA_CSV.as_bytes(),
        standard_deductions: STANDARD_DEDUCTIONS_CSV.as_bytes(),
    })
}

#[cfg(test)]
mod tests {
    use budget_core::{FilingStatusCode, Jurisdiction, TaxTableSource};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bundled_data_loads() {
        let data = reference_data().expect("bundled data must be valid");

        // 12 federal + 3 QSS copies, 34 state + 10 QSS copies
        assert_eq!(data.table_count(), 59);
        assert_eq!(data.fica_years(), vec![2023, 2024, 2025]);
        assert_eq!(data.tax_years(), vec![2023, 2024, 2025]);
    }

    #[test]
    fn bundled_data_has_every_federal_status_for_each_year() {
        let data = reference_data().unwrap();

        for year in data.tax_years() {
            for status in FilingStatusCode::ALL {
                let resolved = data
                    .bracket_table(&Jurisdiction::Federal, year, status)
                    .unwrap();
                assert!(
                    !resolved.usage.is_fallback(),
                    "federal {status} {year} fell back"
                );
            }
        }
    }
}
