//! Tax and budget calculation engine.
//!
//! Turns a user's income sources, pre-tax deductions and expenses into a
//! budget: gross income, taxable income, federal/state/FICA withholding,
//! net income and remaining money, in annual, monthly and biweekly views.
//!
//! Reference data (bracket tables, FICA parameters, standard deductions) is
//! injected through [`TaxTableSource`]; the engine performs no I/O.

pub mod calculations;
pub mod models;
pub mod reference;

pub use models::*;
pub use reference::{
    ReferenceData, ReferenceDataBuilder, ReferenceDataError, Resolved, TableUsage, TaxTableSource,
};
