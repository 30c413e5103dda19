//! 2023 reference data shared by the calculator tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::ReferenceData;
use crate::models::{
    BracketTable, FicaParameters, FilingStatusCode, Jurisdiction, StandardDeduction, TaxBracket,
};

fn schedule(
    jurisdiction: Jurisdiction,
    filing_status: FilingStatusCode,
    rows: &[(Decimal, Option<Decimal>, Decimal)],
) -> BracketTable {
    let brackets = rows
        .iter()
        .map(|(floor, ceiling, rate)| TaxBracket::new(*floor, *ceiling, *rate))
        .collect();
    BracketTable::new(2023, jurisdiction, filing_status, brackets).unwrap()
}

pub fn federal_single_2023() -> BracketTable {
    schedule(
        Jurisdiction::Federal,
        FilingStatusCode::Single,
        &[
            (dec!(0), Some(dec!(11000)), dec!(0.10)),
            (dec!(11000), Some(dec!(44725)), dec!(0.12)),
            (dec!(44725), Some(dec!(95375)), dec!(0.22)),
            (dec!(95375), Some(dec!(182100)), dec!(0.24)),
            (dec!(182100), Some(dec!(231250)), dec!(0.32)),
            (dec!(231250), Some(dec!(578125)), dec!(0.35)),
            (dec!(578125), None, dec!(0.37)),
        ],
    )
}

pub fn federal_joint_2023() -> BracketTable {
    schedule(
        Jurisdiction::Federal,
        FilingStatusCode::MarriedFilingJointly,
        &[
            (dec!(0), Some(dec!(22000)), dec!(0.10)),
            (dec!(22000), Some(dec!(89450)), dec!(0.12)),
            (dec!(89450), Some(dec!(190750)), dec!(0.22)),
            (dec!(190750), Some(dec!(364200)), dec!(0.24)),
            (dec!(364200), Some(dec!(462500)), dec!(0.32)),
            (dec!(462500), Some(dec!(693750)), dec!(0.35)),
            (dec!(693750), None, dec!(0.37)),
        ],
    )
}

pub fn california_single_2023() -> BracketTable {
    schedule(
        Jurisdiction::state("CA").unwrap(),
        FilingStatusCode::Single,
        &[
            (dec!(0), Some(dec!(10099)), dec!(0.01)),
            (dec!(10099), Some(dec!(23942)), dec!(0.02)),
            (dec!(23942), Some(dec!(37788)), dec!(0.04)),
            (dec!(37788), Some(dec!(52455)), dec!(0.06)),
            (dec!(52455), Some(dec!(66295)), dec!(0.08)),
            (dec!(66295), Some(dec!(338639)), dec!(0.093)),
            (dec!(338639), Some(dec!(406364)), dec!(0.103)),
            (dec!(406364), Some(dec!(677275)), dec!(0.113)),
            (dec!(677275), None, dec!(0.123)),
        ],
    )
}

pub fn fica_2023() -> FicaParameters {
    FicaParameters {
        tax_year: 2023,
        social_security_rate: dec!(0.062),
        social_security_wage_base: dec!(160200),
        medicare_rate: dec!(0.0145),
        additional_medicare_rate: dec!(0.009),
        additional_medicare_threshold: dec!(200000),
    }
}

/// Federal single/joint, CA single, IL flat, TX without income tax.
pub fn reference_2023() -> ReferenceData {
    let mut builder = ReferenceData::builder();
    builder
        .add_table(federal_single_2023())
        .unwrap()
        .add_table(federal_joint_2023())
        .unwrap()
        .add_table(california_single_2023())
        .unwrap()
        .add_table(
            BracketTable::flat(
                2023,
                Jurisdiction::state("IL").unwrap(),
                FilingStatusCode::Single,
                dec!(0.0495),
            )
            .unwrap(),
        )
        .unwrap()
        .add_table(
            BracketTable::flat(
                2023,
                Jurisdiction::state("TX").unwrap(),
                FilingStatusCode::Single,
                Decimal::ZERO,
            )
            .unwrap(),
        )
        .unwrap()
        .add_fica(fica_2023())
        .unwrap()
        .add_standard_deduction(StandardDeduction {
            tax_year: 2023,
            filing_status: FilingStatusCode::Single,
            amount: dec!(13850),
        })
        .unwrap()
        .add_standard_deduction(StandardDeduction {
            tax_year: 2023,
            filing_status: FilingStatusCode::MarriedFilingJointly,
            amount: dec!(27700),
        })
        .unwrap();
    builder.build()
}
