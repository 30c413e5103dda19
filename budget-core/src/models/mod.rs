mod deduction_set;
mod expense_item;
mod fica_parameters;
mod filing_status;
mod frequency;
mod income_source;
mod jurisdiction;
mod profile;
mod standard_deduction;
mod tax_bracket;
mod tax_calculation;

pub use deduction_set::{
    ContributionKind, DeductionConfigError, DeductionSet, PeriodicAmount, RetirementContribution,
    RetirementInput,
};
pub use expense_item::ExpenseItem;
pub use fica_parameters::{FicaParameters, FicaParametersError};
pub use filing_status::{FilingStatusCode, InvalidFilingStatusError};
pub use frequency::{Frequency, InvalidFrequencyError};
pub use income_source::{IncomeSource, InvalidTaxTreatmentError, TaxTreatment};
pub use jurisdiction::{InvalidStateCodeError, Jurisdiction, StateCode};
pub use profile::{BudgetInput, TaxProfile};
pub use standard_deduction::StandardDeduction;
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
pub use tax_calculation::{FicaBreakdown, TaxCalculationResult};
