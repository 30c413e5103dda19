//! Small decimal helpers shared by the calculators.
//!
//! Calculators keep full precision; [`round_half_up`] is only applied when a
//! figure is displayed.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, with exact halves rounded away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-50.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smaller of two values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// `numerator / denominator`, or zero when the denominator is not positive.
///
/// Used for effective rates and income shares, where an empty denominator
/// means "nothing to divide".
pub fn ratio(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator / denominator
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(6307.504));

        assert_eq!(result, dec!(6307.50));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(2500.005));

        assert_eq!(result, dec!(2500.01));
    }

    #[test]
    fn round_half_up_handles_negative_remaining_money() {
        let result = round_half_up(dec!(-41.665));

        assert_eq!(result, dec!(-41.67));
    }

    #[test]
    fn round_half_up_handles_thirds_from_division() {
        let result = round_half_up(dec!(100) / dec!(12));

        assert_eq!(result, dec!(8.33));
    }

    // =========================================================================
    // max / min tests
    // =========================================================================

    #[test]
    fn max_clamps_negative_to_zero() {
        let result = max(dec!(-1200.00), Decimal::ZERO);

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn min_picks_wage_base_above_cap() {
        let result = min(dec!(250000), dec!(160200));

        assert_eq!(result, dec!(160200));
    }

    // =========================================================================
    // ratio tests
    // =========================================================================

    #[test]
    fn ratio_divides_by_positive_denominator() {
        let result = ratio(dec!(25000), dec!(100000));

        assert_eq!(result, dec!(0.25));
    }

    #[test]
    fn ratio_of_zero_denominator_is_zero() {
        let result = ratio(dec!(25000), Decimal::ZERO);

        assert_eq!(result, Decimal::ZERO);
    }
}
