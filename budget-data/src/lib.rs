//! Reference data for the budget engine.
//!
//! Bracket tables, FICA parameters and standard deductions are kept as CSV
//! files under `data/`. [`embedded::reference_data`] builds a
//! [`budget_core::ReferenceData`] from the copies compiled into the crate;
//! [`load_directory`] reads a directory with the same file layout so newer
//! years can be dropped in without a rebuild.

pub mod embedded;
pub mod loader;

pub use embedded::reference_data;
pub use loader::{
    BracketRecord, BracketTableLoader, FicaLoader, ReferenceLoadError, ReferenceReaders,
    StandardDeductionLoader, StandardDeductionRecord, load_directory, load_reference,
};
