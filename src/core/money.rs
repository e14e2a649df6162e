use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::str::FromStr;
use thiserror::Error;

/// Maximum allowed gap between the sum of an expense's shares and its total.
pub const SHARE_SUM_TOLERANCE: Decimal = dec!(0.02);

/// Balances within this distance of zero are treated as settled.
pub const SETTLED_EPSILON: Decimal = dec!(0.000000001);

/// Maximum gap between total debt and total credit for a balanced group.
pub const BALANCE_CHECK_TOLERANCE: Decimal = dec!(0.000001);

/// Errors raised when an amount cannot enter the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("amount is not a finite number")]
    NonFinite,
    #[error("amount must not be negative, got {amount}")]
    Negative { amount: Decimal },
    #[error("cannot parse '{input}' as an amount")]
    Unparseable { input: String },
    #[error("amount is too large to add to the ledger")]
    Overflow,
}

/// Round to whole cents, midpoint away from zero.
///
/// Negative zero collapses to `0` so rounded balances compare and print
/// cleanly.
///
/// # Examples
///
/// ```
/// use group_settlement::core::money::round_cents;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_cents(dec!(10.005)), dec!(10.01));
/// assert_eq!(round_cents(dec!(-3.333)), dec!(-3.33));
/// ```
pub fn round_cents(amount: Decimal) -> Decimal {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Reject negative amounts.
pub fn ensure_non_negative(amount: Decimal) -> Result<Decimal, InputError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(InputError::Negative { amount });
    }
    Ok(amount)
}

/// Parse a decimal string such as `"12.50"` into a non-negative amount.
pub fn parse_amount(input: &str) -> Result<Decimal, InputError> {
    let trimmed = input.trim();
    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| InputError::Unparseable {
            input: input.to_string(),
        })?;
    ensure_non_negative(amount)
}

/// Convert a floating-point amount, failing closed on NaN and infinities.
pub fn from_f64(value: f64) -> Result<Decimal, InputError> {
    if !value.is_finite() {
        return Err(InputError::NonFinite);
    }
    let amount = Decimal::from_f64(value).ok_or(InputError::NonFinite)?;
    ensure_non_negative(amount)
}

/// Render an amount as dollars with exactly two decimals, e.g. `$10.00`.
pub fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", round_cents(amount))
}

/// True when `a` and `b` differ by strictly less than `tolerance`.
pub fn within(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents_midpoint() {
        assert_eq!(round_cents(dec!(0.125)), dec!(0.13));
        assert_eq!(round_cents(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round_cents(dec!(33.3333333)), dec!(33.33));
    }

    #[test]
    fn test_round_cents_negative_zero() {
        let rounded = round_cents(dec!(-0.001));
        assert_eq!(rounded, Decimal::ZERO);
        assert!(!rounded.is_sign_negative());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap(), dec!(12.50));
        assert_eq!(parse_amount(" 7 ").unwrap(), dec!(7));
        assert_eq!(parse_amount("1e2").unwrap(), dec!(100));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(matches!(
            parse_amount("twelve"),
            Err(InputError::Unparseable { .. })
        ));
        assert!(matches!(
            parse_amount("-5"),
            Err(InputError::Negative { .. })
        ));
    }

    #[test]
    fn test_from_f64_fails_closed() {
        assert_eq!(from_f64(f64::NAN), Err(InputError::NonFinite));
        assert_eq!(from_f64(f64::INFINITY), Err(InputError::NonFinite));
        assert_eq!(from_f64(f64::NEG_INFINITY), Err(InputError::NonFinite));
        assert!(matches!(from_f64(-0.5), Err(InputError::Negative { .. })));
        assert_eq!(from_f64(10.25).unwrap(), dec!(10.25));
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(10)), "$10.00");
        assert_eq!(format_usd(dec!(3.456)), "$3.46");
    }

    #[test]
    fn test_within_is_strict() {
        assert!(within(dec!(100), dec!(99.99), SHARE_SUM_TOLERANCE));
        assert!(!within(dec!(100), dec!(99.98), SHARE_SUM_TOLERANCE));
    }
}
