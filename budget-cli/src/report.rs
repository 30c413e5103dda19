//! Renders budget and estimate results as text tables or JSON.
//!
//! Results carry unrounded amounts; everything is rounded half-up to cents
//! here and nowhere earlier.

use std::fmt::Write;

use budget_core::calculations::{
    BracketSlice, BudgetResult, ExclusionReason, PeriodBreakdown, ReferenceUsage, TaxEstimate,
};
use budget_core::{TableUsage, TaxProfile};
use clap::ValueEnum;
use serde::Serialize;

use crate::utils::{format_money, format_rate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const LABEL_WIDTH: usize = 20;
const AMOUNT_WIDTH: usize = 16;

pub fn render_budget(
    profile: &TaxProfile,
    result: &BudgetResult,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(budget_text(profile, result)),
        OutputFormat::Json => to_json(result),
    }
}

pub fn render_estimate(
    profile: &TaxProfile,
    estimate: &TaxEstimate,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(estimate_text(profile, estimate)),
        OutputFormat::Json => to_json(estimate),
    }
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

// Writing to a String cannot fail, so the fmt::Results below are discarded.

fn heading(
    out: &mut String,
    title: &str,
    profile: &TaxProfile,
) {
    let _ = writeln!(
        out,
        "{title} for {} ({}, {})",
        profile.tax_year,
        profile.state,
        profile.filing_status.label()
    );
}

fn usage_line(
    out: &mut String,
    name: &str,
    usage: &TableUsage,
) {
    let status = usage
        .used_status
        .map(|status| format!(" {status}"))
        .unwrap_or_default();
    let _ = write!(out, "  {name:<18} {} {}{status}", usage.jurisdiction, usage.used_year);
    if usage.is_fallback() {
        let requested = usage
            .requested_status
            .map(|status| format!(" {status}"))
            .unwrap_or_default();
        let _ = write!(out, "  (requested {}{requested})", usage.requested_year);
    }
    out.push('\n');
}

fn reference_block(
    out: &mut String,
    reference: &ReferenceUsage,
) {
    out.push_str("Reference data\n");
    usage_line(out, "Federal brackets", &reference.federal);
    usage_line(out, "State brackets", &reference.state);
    usage_line(out, "FICA", &reference.fica);
    if let Some(standard) = &reference.standard_deduction {
        usage_line(out, "Standard deduction", standard);
    }
}

fn row(
    out: &mut String,
    label: &str,
    amounts: &[rust_decimal::Decimal],
) {
    let _ = write!(out, "{label:<LABEL_WIDTH$}");
    for amount in amounts {
        let _ = write!(out, "{:>AMOUNT_WIDTH$}", format_money(*amount));
    }
    out.push('\n');
}

fn budget_text(
    profile: &TaxProfile,
    result: &BudgetResult,
) -> String {
    let mut out = String::new();
    heading(&mut out, "Budget", profile);
    out.push('\n');

    let periods: [&PeriodBreakdown; 3] = [&result.annual, &result.monthly, &result.biweekly];
    let _ = writeln!(
        out,
        "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
        "", "Annual", "Monthly", "Biweekly"
    );
    let lines: [(&str, fn(&PeriodBreakdown) -> rust_decimal::Decimal); 10] = [
        ("Gross income", |p| p.gross_income),
        ("Pre-tax deductions", |p| p.pre_tax_deductions),
        ("Taxable income", |p| p.taxable_income),
        ("Federal tax", |p| p.federal_tax),
        ("State tax", |p| p.state_tax),
        ("FICA", |p| p.fica_tax),
        ("Total tax", |p| p.total_tax),
        ("Net income", |p| p.net_income),
        ("Expenses", |p| p.expenses),
        ("Remaining", |p| p.remaining),
    ];
    for (label, field) in lines {
        let amounts: Vec<_> = periods.iter().map(|period| field(period)).collect();
        row(&mut out, label, &amounts);
    }

    out.push('\n');
    let taxes = &result.taxes;
    let _ = writeln!(
        out,
        "Effective rate {}   Marginal federal {}   Marginal state {}",
        format_rate(taxes.effective_rate),
        format_rate(taxes.marginal_federal_rate),
        format_rate(taxes.marginal_state_rate)
    );
    if !taxes.standard_deduction.is_zero() {
        let _ = writeln!(
            out,
            "Standard deduction {} (federal only)",
            format_money(taxes.standard_deduction)
        );
    }
    if !result.deductions.post_tax_retirement.is_zero() {
        let _ = writeln!(
            out,
            "Post-tax retirement {} (not deducted)",
            format_money(result.deductions.post_tax_retirement)
        );
    }
    if result.is_over_budget() {
        out.push_str("Expenses exceed net income\n");
    }

    out.push_str("\nIncome sources\n");
    for (source, net) in result.income.sources.iter().zip(&result.per_source) {
        let _ = writeln!(
            out,
            "  {:<24} {:<14} {:>8} gross {:>14} net {:>14}",
            source.label,
            source.tax_treatment.as_str(),
            format_rate(net.share),
            format_money(net.gross_income),
            format_money(net.net_income)
        );
    }
    for excluded in &result.income.excluded {
        let reason = match excluded.reason {
            ExclusionReason::ZeroAmount => "zero amount",
            ExclusionReason::NegativeAmount => "negative amount",
        };
        let _ = writeln!(out, "  {:<24} excluded ({reason})", excluded.label);
    }

    out.push('\n');
    reference_block(&mut out, &result.reference);
    out
}

fn bracket_rows(
    out: &mut String,
    title: &str,
    slices: &[BracketSlice],
) {
    let _ = writeln!(out, "{title}");
    for slice in slices {
        let ceiling = slice
            .ceiling
            .map(format_money)
            .unwrap_or_else(|| "and up".to_string());
        let _ = writeln!(
            out,
            "  {:>14} - {:<14} {:>8} on {:>14} = {:>14}",
            format_money(slice.floor),
            ceiling,
            format_rate(slice.rate),
            format_money(slice.taxed_amount),
            format_money(slice.tax)
        );
    }
}

fn estimate_text(
    profile: &TaxProfile,
    estimate: &TaxEstimate,
) -> String {
    let mut out = String::new();
    heading(&mut out, "Tax estimate", profile);
    out.push('\n');

    let taxes = &estimate.taxes;
    row(&mut out, "Gross income", &[taxes.gross_income]);
    row(&mut out, "Pre-tax deductions", &[taxes.pre_tax_deductions]);
    if !taxes.standard_deduction.is_zero() {
        row(&mut out, "Standard deduction", &[taxes.standard_deduction]);
    }
    row(&mut out, "Taxable income", &[taxes.taxable_income]);
    out.push('\n');

    let _ = writeln!(
        out,
        "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
        "", "Annual", "Monthly", "Biweekly"
    );
    row(
        &mut out,
        "Federal tax",
        &[
            taxes.federal_tax,
            estimate.monthly.federal_tax,
            estimate.biweekly.federal_tax,
        ],
    );
    row(
        &mut out,
        "State tax",
        &[
            taxes.state_tax,
            estimate.monthly.state_tax,
            estimate.biweekly.state_tax,
        ],
    );
    row(
        &mut out,
        "FICA",
        &[
            taxes.fica.total,
            estimate.monthly.fica_tax,
            estimate.biweekly.fica_tax,
        ],
    );
    row(
        &mut out,
        "Total tax",
        &[
            taxes.total_tax,
            estimate.monthly.total_tax,
            estimate.biweekly.total_tax,
        ],
    );
    out.push('\n');

    let _ = writeln!(
        out,
        "Effective rate {}   Marginal federal {}   Marginal state {}",
        format_rate(taxes.effective_rate),
        format_rate(taxes.marginal_federal_rate),
        format_rate(taxes.marginal_state_rate)
    );
    out.push('\n');

    bracket_rows(&mut out, "Federal brackets", &estimate.federal_brackets);
    bracket_rows(&mut out, "State brackets", &estimate.state_brackets);
    out.push('\n');
    reference_block(&mut out, &estimate.reference);
    out
}

#[cfg(test)]
mod tests {
    use budget_core::calculations::{BudgetComposer, TaxEstimateRequest, TaxEstimator};
    use budget_core::{
        BudgetInput, FilingStatusCode, Frequency, IncomeSource, StateCode, TaxTreatment,
    };
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn profile(tax_year: i32) -> TaxProfile {
        TaxProfile {
            tax_year,
            state: StateCode::new("TX").unwrap(),
            filing_status: FilingStatusCode::Single,
        }
    }

    fn budget(tax_year: i32) -> BudgetResult {
        let data = budget_data::reference_data().unwrap();
        let input = BudgetInput {
            profile: profile(tax_year),
            income_sources: vec![
                IncomeSource {
                    id: "job".to_string(),
                    category: "Employment".to_string(),
                    label: "Day job".to_string(),
                    amount: dec!(5000),
                    frequency: Frequency::Monthly,
                    tax_treatment: TaxTreatment::W2,
                },
                IncomeSource {
                    id: "gig".to_string(),
                    category: "Side".to_string(),
                    label: "Old gig".to_string(),
                    amount: dec!(0),
                    frequency: Frequency::Monthly,
                    tax_treatment: TaxTreatment::SelfEmployed,
                },
            ],
            deductions: Default::default(),
            expenses: vec![],
        };
        BudgetComposer::new(&data).compute_budget(&input).unwrap()
    }

    // =========================================================================
    // Budget
    // =========================================================================

    #[test]
    fn budget_text_has_period_columns_and_rounded_amounts() {
        let text = render_budget(&profile(2023), &budget(2023), OutputFormat::Text).unwrap();

        assert!(text.starts_with("Budget for 2023 (TX, Single)"));
        assert!(text.contains("Annual"));
        assert!(text.contains("Biweekly"));
        assert!(text.contains("$60,000.00"));
        assert!(text.contains("$8,507.50"));
        assert!(text.contains("Old gig"));
        assert!(text.contains("excluded (zero amount)"));
    }

    #[test]
    fn budget_text_reports_fallback_year() {
        let text = render_budget(&profile(2030), &budget(2030), OutputFormat::Text).unwrap();

        assert!(text.contains("(requested 2030"), "got:\n{text}");
    }

    #[test]
    fn budget_json_round_trips_through_serde_json() {
        let json = render_budget(&profile(2023), &budget(2023), OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["annual"]["gross_income"], "60000");
        assert_eq!(value["taxes"]["tax_year_used"], 2023);
    }

    // =========================================================================
    // Estimate
    // =========================================================================

    #[test]
    fn estimate_text_lists_brackets() {
        let data = budget_data::reference_data().unwrap();
        let request = TaxEstimateRequest::new(
            dec!(50000),
            Frequency::Annually,
            TaxTreatment::W2,
            profile(2023),
        );
        let estimate = TaxEstimator::new(&data).estimate(&request).unwrap();

        let text = render_estimate(&profile(2023), &estimate, OutputFormat::Text).unwrap();

        assert!(text.contains("Federal brackets"));
        assert!(text.contains("$6,307.50"));
        assert!(text.contains("and up"));
        assert_eq!(text.matches("22.00%").count(), 2);
    }
}
