//! Currency and percentage arithmetic.
//!
//! Currency values are rounded to 2 decimal places at the point of
//! persistence; percentages are stored unrounded.

use rust_decimal::Decimal;

/// Round a currency amount to 2 decimal places (banker's rounding).
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// `amount * percent / 100`, unrounded.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / Decimal::ONE_HUNDRED
}

/// Derive the percentage that `part` is of `whole`, unrounded.
///
/// Returns zero when `whole` is zero rather than dividing by it; callers
/// validate positive gross amounts before deriving discount percentages.
pub fn percent_from_parts(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part / whole * Decimal::ONE_HUNDRED
}

/// `amount * (1 + percent/100)`, unrounded.
pub fn with_tax(amount: Decimal, percent: Decimal) -> Decimal {
    amount * (Decimal::ONE + percent / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_currency(dec!(10.005)), dec!(10.00));
        assert_eq!(round_currency(dec!(10.015)), dec!(10.02));
        assert_eq!(round_currency(dec!(10.1)), dec!(10.10));
    }

    #[test]
    fn percent_of_matches_manual_math() {
        assert_eq!(percent_of(dec!(1000), dec!(10)), dec!(100));
        assert_eq!(percent_of(dec!(900), dec!(5)), dec!(45));
    }

    #[test]
    fn percent_from_parts_inverts_percent_of() {
        let whole = dec!(1250);
        let part = percent_of(whole, dec!(12.5));
        assert_eq!(percent_from_parts(part, whole), dec!(12.5));
    }

    #[test]
    fn percent_from_zero_whole_is_zero() {
        assert_eq!(percent_from_parts(dec!(10), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn with_tax_applies_gst() {
        assert_eq!(with_tax(dec!(900), dec!(5)), dec!(945));
        assert_eq!(with_tax(dec!(100), Decimal::ZERO), dec!(100));
    }
}
