//! Progressive (marginal-rate) tax over a [`BracketTable`].
//!
//! Income is split across the brackets in ascending floor order and each
//! slice is taxed at its own bracket's rate:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Start with `remaining = taxable_income` |
//! | 2    | Slice = `min(remaining, ceiling - floor)`, or all of `remaining` in the top bracket |
//! | 3    | Tax += slice × rate; `remaining -= slice` |
//! | 4    | Stop when `remaining <= 0` or the brackets run out |
//!
//! Income exactly at a ceiling is taxed entirely at the lower rates; the
//! next dollar is taxed at the higher rate. Taxable income at or below zero
//! yields zero tax, never a refund.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::{BracketTable, FilingStatusCode, Jurisdiction, TaxBracket};
//! use budget_core::calculations::ProgressiveTaxCalculator;
//!
//! let table = BracketTable::new(
//!     2023,
//!     Jurisdiction::Federal,
//!     FilingStatusCode::Single,
//!     vec![
//!         TaxBracket::new(dec!(0), Some(dec!(11000)), dec!(0.10)),
//!         TaxBracket::new(dec!(11000), Some(dec!(44725)), dec!(0.12)),
//!         TaxBracket::new(dec!(44725), None, dec!(0.22)),
//!     ],
//! )
//! .unwrap();
//!
//! let calculator = ProgressiveTaxCalculator::new(&table);
//!
//! // $1,100 + $4,047 + $1,160.50
//! assert_eq!(calculator.compute(dec!(50000)), dec!(6307.50));
//! assert_eq!(calculator.marginal_rate(dec!(50000)), dec!(0.22));
//! ```

use rust_decimal::Decimal;
use serde::Serialize;

use super::common::min;
use crate::models::{BracketTable, TaxBracket};

/// The part of an income taxed inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketSlice {
    pub floor: Decimal,
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressiveTaxCalculator<'a> {
    table: &'a BracketTable,
}

impl<'a> ProgressiveTaxCalculator<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a BracketTable {
        self.table
    }

    /// Total tax on `taxable_income`.
    pub fn compute(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        self.tax_by_bracket(taxable_income)
            .iter()
            .map(|slice| slice.tax)
            .sum()
    }

    /// The per-bracket slices that make up [`compute`](Self::compute).
    ///
    /// Brackets the income never reaches are omitted.
    pub fn tax_by_bracket(
        &self,
        taxable_income: Decimal,
    ) -> Vec<BracketSlice> {
        let mut slices = Vec::new();
        let mut remaining = taxable_income;

        for bracket in self.ordered_brackets() {
            if remaining <= Decimal::ZERO {
                break;
            }

            // Top bracket takes whatever is left
            let taxed_amount = match bracket.width() {
                Some(width) => min(remaining, width),
                None => remaining,
            };

            slices.push(BracketSlice {
                floor: bracket.floor,
                ceiling: bracket.ceiling,
                rate: bracket.rate,
                taxed_amount,
                tax: taxed_amount * bracket.rate,
            });
            remaining -= taxed_amount;
        }

        slices
    }

    /// Rate applied to the last dollar of `income`.
    ///
    /// This is the rate of the first bracket whose ceiling is absent or at
    /// least `income`; zero or negative income reports the lowest rate.
    pub fn marginal_rate(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.ordered_brackets()
            .into_iter()
            .find(|bracket| bracket.ceiling.is_none_or(|ceiling| income <= ceiling))
            .map(|bracket| bracket.rate)
            .unwrap_or(Decimal::ZERO)
    }

    fn ordered_brackets(&self) -> Vec<&'a TaxBracket> {
        // Tables are sorted on construction; sorting again keeps the walk
        // correct for any slice of brackets.
        let mut brackets: Vec<&TaxBracket> = self.table.brackets().iter().collect();
        brackets.sort_by(|a, b| a.floor.cmp(&b.floor));
        brackets
    }
}
