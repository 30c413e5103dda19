use std::path::PathBuf;

use anyhow::{Context, Result};
use budget_core::{ReferenceData, TaxTableSource};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "budget-data-check")]
#[command(version, about = "Validate reference data CSV files")]
struct Args {
    /// Directory holding federal_brackets.csv, state_brackets.csv, fica.csv
    /// and standard_deductions.csv. Defaults to the bundled data.
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Print every table found
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let data = match &args.dir {
        Some(dir) => {
            println!("Loading reference data from {}", dir.display());
            budget_data::load_directory(dir)
                .with_context(|| format!("Failed to load reference data from {}", dir.display()))?
        }
        None => {
            println!("Loading bundled reference data");
            budget_data::reference_data().context("Bundled reference data is invalid")?
        }
    };

    report(&data, args.verbose);
    Ok(())
}

fn report(
    data: &ReferenceData,
    verbose: bool,
) {
    println!("Tax years: {:?}", data.tax_years());
    println!("FICA years: {:?}", data.fica_years());
    println!(
        "Jurisdictions: {}",
        data.jurisdictions()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Bracket tables: {}", data.table_count());

    if verbose {
        for table in data.tables() {
            println!(
                "  {} {} {}: {} bracket(s)",
                table.tax_year(),
                table.jurisdiction(),
                table.filing_status(),
                table.brackets().len()
            );
        }
    }

    println!("Reference data OK");
}
