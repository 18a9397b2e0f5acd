//! Tax-inclusive price derivation for products.
//!
//! Prices are stored with two fractional digits, so every derived value is
//! rounded to that scale before it leaves this module.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for monetary amounts and tax rates.
pub const AMOUNT_SCALE: u32 = 2;

/// Tax rate (percent) applied when a product is created without one.
pub const DEFAULT_TAX_PERCENT: Decimal = Decimal::from_parts(21, 0, 0, false, 0);

/// Compute the tax-inclusive price for `price` at `tax` percent.
///
/// Non-positive prices or rates yield zero.
pub fn price_with_tax(price: Decimal, tax: Decimal) -> Decimal {
    if price <= Decimal::ZERO || tax <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    round_amount(price + price / Decimal::ONE_HUNDRED * tax)
}

/// Round a decimal to the stored scale using midpoint-away-from-zero.
pub fn round_amount(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    rounded
}

/// Convert a scaled integer (for example cents) back into a decimal amount.
pub fn from_scaled(value: i64) -> Decimal {
    Decimal::new(value, AMOUNT_SCALE)
}

/// Convert a decimal amount into its scaled integer representation.
///
/// Returns `None` when the value does not fit in an `i64`.
pub fn to_scaled(value: Decimal) -> Option<i64> {
    i64::try_from(round_amount(value).mantissa()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("valid decimal literal")
    }

    #[test]
    fn applies_tax_percentage() {
        assert_eq!(price_with_tax(dec("100"), dec("21")), dec("121.00"));
        assert_eq!(price_with_tax(dec("2.50"), dec("10")), dec("2.75"));
    }

    #[test]
    fn rounds_to_two_fractional_digits() {
        // 200.25 * 1.21 = 242.3025
        assert_eq!(price_with_tax(dec("200.25"), dec("21")), dec("242.30"));
        // 0.05 * 1.5 = 0.075
        assert_eq!(price_with_tax(dec("0.05"), dec("50")), dec("0.08"));
    }

    #[test]
    fn non_positive_inputs_yield_zero() {
        assert_eq!(price_with_tax(Decimal::ZERO, dec("21")), Decimal::ZERO);
        assert_eq!(price_with_tax(dec("-3"), dec("21")), Decimal::ZERO);
        assert_eq!(price_with_tax(dec("10"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(price_with_tax(dec("10"), dec("-5")), Decimal::ZERO);
    }

    #[test]
    fn recomputation_is_stable() {
        let price = dec("19.99");
        let tax = dec("7.5");
        let first = price_with_tax(price, tax);
        let second = price_with_tax(price, tax);

        assert_eq!(first, second);
        assert_eq!(first.to_string(), "21.49");
    }

    #[test]
    fn default_tax_is_twenty_one_percent() {
        assert_eq!(DEFAULT_TAX_PERCENT, dec("21"));
    }

    #[test]
    fn scaled_conversions_keep_two_digits() {
        assert_eq!(to_scaled(dec("200.25")), Some(20025));
        assert_eq!(to_scaled(dec("3")), Some(300));
        assert_eq!(to_scaled(dec("1.005")), Some(101));
        assert_eq!(from_scaled(20025).to_string(), "200.25");
        assert_eq!(from_scaled(2100), dec("21"));
    }
}
