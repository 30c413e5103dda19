//! Aggregation of income sources into one annual gross figure.
//!
//! Every source is annualized with its own frequency and kept as a tagged
//! [`SourceContribution`], so later steps can prorate tax per source.
//! Sources with a zero or negative amount are left out of the totals and
//! listed in [`IncomeAggregate::excluded`] instead of being dropped silently.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::{Frequency, IncomeSource, TaxTreatment};
//! use budget_core::calculations::IncomeAggregator;
//!
//! let sources = vec![
//!     IncomeSource {
//!         id: "job".into(),
//!         category: "W2 Job".into(),
//!         label: "Day job".into(),
//!         amount: dec!(2500),
//!         frequency: Frequency::Biweekly,
//!         tax_treatment: TaxTreatment::W2,
//!     },
//!     IncomeSource {
//!         id: "flat".into(),
//!         category: "rental".into(),
//!         label: "Basement flat".into(),
//!         amount: dec!(900),
//!         frequency: Frequency::Monthly,
//!         tax_treatment: TaxTreatment::Other,
//!     },
//! ];
//!
//! let aggregate = IncomeAggregator::new().aggregate(&sources).unwrap();
//!
//! assert_eq!(aggregate.total_annual_gross, dec!(75800));
//! assert_eq!(aggregate.dominant_treatment(), Some(TaxTreatment::W2));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use super::common::ratio;
use super::error::{CalculationError, checked_add, out_of_range};
use crate::models::{IncomeSource, TaxTreatment};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceContribution {
    pub id: String,
    pub category: String,
    pub label: String,
    pub tax_treatment: TaxTreatment,
    pub annual_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    ZeroAmount,
    NegativeAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedSource {
    pub id: String,
    pub label: String,
    pub amount: Decimal,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncomeAggregate {
    pub total_annual_gross: Decimal,
    /// Included sources, ordered by id then label.
    pub sources: Vec<SourceContribution>,
    pub excluded: Vec<ExcludedSource>,
}

impl IncomeAggregate {
    /// Fraction of gross income contributed by the source with `id`.
    pub fn share_of(
        &self,
        id: &str,
    ) -> Option<Decimal> {
        self.sources
            .iter()
            .find(|source| source.id == id)
            .map(|source| ratio(source.annual_amount, self.total_annual_gross))
    }

    /// Annual gross per treatment, in treatment order.
    pub fn by_treatment(&self) -> BTreeMap<TaxTreatment, Decimal> {
        let mut totals = BTreeMap::new();
        for source in &self.sources {
            *totals.entry(source.tax_treatment).or_insert(Decimal::ZERO) += source.annual_amount;
        }
        totals
    }

    /// Annual gross per category tag.
    pub fn by_category(&self) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for source in &self.sources {
            *totals
                .entry(source.category.clone())
                .or_insert(Decimal::ZERO) += source.annual_amount;
        }
        totals
    }

    /// Treatment carrying the largest share of gross income.
    ///
    /// Ties go to `W2`, then `SelfEmployed`, then `Other`. `None` when no
    /// source was included.
    pub fn dominant_treatment(&self) -> Option<TaxTreatment> {
        let totals = self.by_treatment();
        let mut dominant: Option<(TaxTreatment, Decimal)> = None;
        // BTreeMap iterates in tie-break order, so only a strictly larger
        // total replaces the current pick.
        for (treatment, total) in totals {
            match dominant {
                Some((_, best)) if total <= best => {}
                _ => dominant = Some((treatment, total)),
            }
        }
        dominant.map(|(treatment, _)| treatment)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeAggregator;

impl IncomeAggregator {
    pub fn new() -> Self {
        Self
    }

    /// # Errors
    ///
    /// [`CalculationError::AmountOutOfRange`] when a source or the total no
    /// longer fits in a `Decimal` once annualized.
    pub fn aggregate(
        &self,
        income_sources: &[IncomeSource],
    ) -> Result<IncomeAggregate, CalculationError> {
        let mut aggregate = IncomeAggregate::default();

        for source in income_sources {
            if let Some(reason) = Self::exclusion_reason(source.amount) {
                warn!(
                    id = %source.id,
                    label = %source.label,
                    amount = %source.amount,
                    ?reason,
                    "income source excluded from gross income"
                );
                aggregate.excluded.push(ExcludedSource {
                    id: source.id.clone(),
                    label: source.label.clone(),
                    amount: source.amount,
                    reason,
                });
                continue;
            }

            let annual_amount = source
                .annual_amount()
                .ok_or_else(|| out_of_range("income.amount", source.amount))?;
            aggregate.total_annual_gross =
                checked_add("income.amount", aggregate.total_annual_gross, annual_amount)?;
            aggregate.sources.push(SourceContribution {
                id: source.id.clone(),
                category: source.category.clone(),
                label: source.label.clone(),
                tax_treatment: source.tax_treatment,
                annual_amount,
            });
        }

        aggregate
            .sources
            .sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.label.cmp(&b.label)));
        aggregate
            .excluded
            .sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.label.cmp(&b.label)));

        Ok(aggregate)
    }

    fn exclusion_reason(amount: Decimal) -> Option<ExclusionReason> {
        if amount.is_zero() {
            Some(ExclusionReason::ZeroAmount)
        } else if amount.is_sign_negative() {
            Some(ExclusionReason::NegativeAmount)
        } else {
            None
        }
    }
}
