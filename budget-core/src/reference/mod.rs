//! Versioned reference data: bracket tables, FICA parameters and standard
//! deductions.
//!
//! Calculators read reference data through the [`TaxTableSource`] trait.
//! [`ReferenceData`] is the in-memory implementation, assembled once with
//! [`ReferenceDataBuilder`] and never mutated afterwards.
//!
//! # Fallback
//!
//! | Missing                  | Used instead                          |
//! |--------------------------|---------------------------------------|
//! | requested year           | most recent year on file              |
//! | qualifying surviving spouse | married filing jointly             |
//! | any other non-single status | single                             |
//!
//! The year and filing status actually used are returned in
//! [`TableUsage`] so callers can tell the user.

pub mod source;
pub mod store;

pub use source::{ReferenceDataError, Resolved, TableUsage, TaxTableSource};
pub use store::{ReferenceData, ReferenceDataBuilder};

#[cfg(test)]
pub(crate) mod fixtures;
