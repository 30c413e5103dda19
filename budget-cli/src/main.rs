use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use budget_cli::app::{self, ComputeRequest};
use budget_cli::report::OutputFormat;
use budget_cli::{logging, utils};
use budget_core::calculations::{
    BudgetOptions, OverDeductionPolicy, StandardDeductionPolicy, TaxEstimateRequest,
};
use budget_core::{FilingStatusCode, Frequency, StateCode, TaxProfile, TaxTreatment};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Personal budget calculator.
///
/// Turns income sources, pre-tax deductions and expenses into a budget with
/// federal, state and FICA withholding, using bundled or supplied tax tables.
#[derive(Debug, Parser)]
#[command(name = "budget", version, about)]
struct Cli {
    /// Log level or filter directive (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Directory with federal_brackets.csv, state_brackets.csv, fica.csv and
    /// standard_deductions.csv. Defaults to the bundled tables.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute a full budget from a TOML budget file.
    Compute(ComputeArgs),
    /// Estimate taxes on a single income figure.
    Estimate(EstimateArgs),
}

#[derive(Debug, Args)]
struct ComputeArgs {
    /// Budget file (TOML).
    #[arg(long, short)]
    file: PathBuf,

    /// Subtract the federal standard deduction before the federal brackets.
    #[arg(long)]
    standard_deduction: bool,

    /// Fail instead of clamping when pre-tax deductions exceed gross income.
    #[arg(long)]
    reject_over_deduction: bool,
}

#[derive(Debug, Args)]
struct EstimateArgs {
    /// Income per period, e.g. `85,000` or `$3,200.50`.
    #[arg(long, value_parser = parse_amount)]
    income: Decimal,

    /// Pay frequency of `income`.
    #[arg(long, default_value = "annually")]
    frequency: Frequency,

    /// W2, Self-Employed or Other.
    #[arg(long, default_value = "W2")]
    treatment: TaxTreatment,

    /// Two-letter state of residence.
    #[arg(long)]
    state: StateCode,

    /// S, MFJ, MFS, HOH or QSS.
    #[arg(long, default_value = "S")]
    filing_status: FilingStatusCode,

    /// Tax year; defaults to the current calendar year.
    #[arg(long)]
    year: Option<i32>,

    /// Annual pre-tax deductions.
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pre_tax: Decimal,

    /// Subtract the federal standard deduction before the federal brackets.
    #[arg(long)]
    standard_deduction: bool,
}

fn parse_amount(s: &str) -> Result<Decimal, utils::ParseDecimalError> {
    utils::parse_decimal(s)
}

fn standard_deduction_policy(apply: bool) -> StandardDeductionPolicy {
    if apply {
        StandardDeductionPolicy::Apply
    } else {
        StandardDeductionPolicy::Ignore
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&cli.log_level, cli.log_file.as_deref())?;

    let current_year = chrono::Local::now().year();
    debug!(current_year, command = ?cli.command, "starting");

    let reference = app::load_reference_data(cli.data_dir.as_deref())?;

    let output = match cli.command {
        Command::Compute(args) => {
            let request = ComputeRequest {
                file: args.file,
                default_year: current_year,
                options: BudgetOptions {
                    standard_deduction: standard_deduction_policy(args.standard_deduction),
                    over_deduction: if args.reject_over_deduction {
                        OverDeductionPolicy::Reject
                    } else {
                        OverDeductionPolicy::Clamp
                    },
                },
                format: cli.format,
            };
            app::run_compute(&reference, &request)?
        }
        Command::Estimate(args) => {
            let mut request = TaxEstimateRequest::new(
                args.income,
                args.frequency,
                args.treatment,
                TaxProfile {
                    tax_year: args.year.unwrap_or(current_year),
                    state: args.state,
                    filing_status: args.filing_status,
                },
            );
            request.pre_tax_deductions = args.pre_tax;
            request.standard_deduction = standard_deduction_policy(args.standard_deduction);
            app::run_estimate(&reference, &request, cli.format)?
        }
    };

    std::io::stdout()
        .write_all(output.as_bytes())
        .context("Failed to write report")?;
    Ok(())
}
