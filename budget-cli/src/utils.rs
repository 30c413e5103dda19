use budget_core::calculations::common::round_half_up;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

impl ParseDecimalError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Trims whitespace and drops a leading `$` and thousands separators.
fn normalize_decimal_input(s: &str) -> String {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .replace(',', "")
}

/// Parses a user-entered amount into a [`Decimal`].
///
/// Accepts `"1,234.56"` and `"$85,000"`. Empty input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats an amount as dollars and cents with thousands separators,
/// rounding half-up.
pub fn format_money(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((&text, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-${grouped}.{cents}")
    } else {
        format!("${grouped}.{cents}")
    }
}

/// Formats a fractional rate (`0.22`) as a percentage (`22.00%`).
pub fn format_rate(rate: Decimal) -> String {
    format!("{:.2}%", round_half_up(rate * Decimal::ONE_HUNDRED))
}
