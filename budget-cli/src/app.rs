use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use budget_core::calculations::{BudgetComposer, BudgetOptions, TaxEstimateRequest, TaxEstimator};
use budget_core::{ReferenceData, TaxTableSource};
use tracing::{debug, info, warn};

use crate::budget_file;
use crate::report::{self, OutputFormat};

/// Loads reference data from `dir`, or the bundled copy when `dir` is `None`.
pub fn load_reference_data(dir: Option<&Path>) -> Result<ReferenceData> {
    let data = match dir {
        Some(dir) => budget_data::load_directory(dir)
            .with_context(|| format!("Failed to load reference data from {}", dir.display()))?,
        None => budget_data::reference_data().context("Bundled reference data is invalid")?,
    };
    debug!(
        tables = data.table_count(),
        years = ?data.tax_years(),
        "reference data ready"
    );
    Ok(data)
}

/// Everything `budget compute` needs.
#[derive(Debug, Clone)]
pub struct ComputeRequest {
    pub file: PathBuf,
    pub default_year: i32,
    pub options: BudgetOptions,
    pub format: OutputFormat,
}

/// Computes the budget described by a TOML file and renders it.
pub fn run_compute(
    reference: &ReferenceData,
    request: &ComputeRequest,
) -> Result<String> {
    let input = budget_file::load_from_file(&request.file, request.default_year)
        .with_context(|| format!("Failed to load budget file {}", request.file.display()))?;
    info!(
        file = %request.file.display(),
        tax_year = input.profile.tax_year,
        state = %input.profile.state,
        "computing budget"
    );

    let result = BudgetComposer::new(reference)
        .with_options(request.options)
        .compute_budget(&input)
        .context("Budget computation failed")?;

    if result.reference.any_fallback() {
        warn!(
            requested = input.profile.tax_year,
            used = result.taxes.tax_year_used,
            "reference data for the requested year is incomplete; older tables were used"
        );
    }
    if result.is_over_budget() {
        warn!(remaining = %result.remaining(), "expenses exceed net income");
    }

    report::render_budget(&input.profile, &result, request.format)
        .context("Failed to render budget report")
}

/// Runs a single-income estimate and renders it.
pub fn run_estimate(
    reference: &ReferenceData,
    request: &TaxEstimateRequest,
    format: OutputFormat,
) -> Result<String> {
    info!(
        income = %request.income,
        frequency = %request.frequency,
        tax_year = request.profile.tax_year,
        state = %request.profile.state,
        "estimating taxes"
    );

    let estimate = TaxEstimator::new(reference)
        .estimate(request)
        .context("Tax estimate failed")?;

    report::render_estimate(&request.profile, &estimate, format)
        .context("Failed to render estimate report")
}
