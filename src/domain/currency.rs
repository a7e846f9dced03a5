//! Currency formatting for sales amounts.
//!
//! POS amounts travel in minor units (satang). Display is the major unit
//! with thousands separators and exactly two decimals, e.g. `฿1,234.56`.
//! Uses `rust_decimal` so that no amount ever goes through binary floats
//! on the integer path.

use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use serde_json::Value;
use tracing::debug;

/// Default currency symbol (Thai baht).
pub const DEFAULT_SYMBOL: &str = "฿";

/// Formats minor-unit amounts for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    symbol: String,
}

impl CurrencyFormatter {
    /// Create a formatter with a custom symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    /// Symbol prefixed to every amount.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Format an amount given in cents.
    pub fn format_cents(&self, cents: i64) -> String {
        self.format_major(Decimal::new(cents, 2))
    }

    /// Format an amount already expressed in major units.
    ///
    /// The sign goes after the symbol (`฿-12.50`).
    pub fn format_major(&self, amount: Decimal) -> String {
        let mut rounded =
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }

        let negative = rounded.is_sign_negative();
        let fixed = format!("{:.2}", rounded.abs());
        let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 4);
        out.push_str(&self.symbol);
        if negative {
            out.push('-');
        }
        out.push_str(&group_thousands(whole));
        out.push('.');
        out.push_str(frac);
        out
    }

    /// Format a loosely-typed JSON amount in cents.
    ///
    /// Integers, floats and numeric strings are accepted; anything else
    /// (null, bool, garbage text, non-finite numbers) formats as zero.
    pub fn format_value(&self, value: &Value) -> String {
        let cents = match value {
            Value::Number(n) => n
                .as_i64()
                .map(Decimal::from)
                .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
            Value::String(s) => parse_decimal(s),
            _ => None,
        };

        match cents {
            Some(c) => self.format_major(c / Decimal::ONE_HUNDRED),
            None => {
                if is_numeric(value) {
                    debug!(%value, "Amount outside decimal range, formatting as zero");
                }
                self.format_cents(0)
            }
        }
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL)
    }
}

/// Format cents with the default symbol.
pub fn format_cents(cents: i64) -> String {
    CurrencyFormatter::default().format_cents(cents)
}

/// Format a JSON cents value with the default symbol.
pub fn format_value(value: &Value) -> String {
    CurrencyFormatter::default().format_value(value)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .and_then(Decimal::from_f64)
        })
}

/// Whether a JSON value carries a number, even one `Decimal` cannot hold.
fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok(),
        _ => false,
    }
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_format_cents_basic() {
        assert_eq!(format_cents(0), "฿0.00");
        assert_eq!(format_cents(5), "฿0.05");
        assert_eq!(format_cents(500), "฿5.00");
        assert_eq!(format_cents(123_456), "฿1,234.56");
        assert_eq!(format_cents(100_000_000), "฿1,000,000.00");
    }

    #[test]
    fn test_negative_sign_after_symbol() {
        assert_eq!(format_cents(-1250), "฿-12.50");
        assert_eq!(format_cents(-123_456_789), "฿-1,234,567.89");
    }

    #[test]
    fn test_format_value_accepts_numbers_and_strings() {
        assert_eq!(format_value(&json!(500)), "฿5.00");
        assert_eq!(format_value(&json!("250000")), "฿2,500.00");
        assert_eq!(format_value(&json!(" 99 ")), "฿0.99");
        assert_eq!(format_value(&json!(1050.0)), "฿10.50");
    }

    #[test]
    fn test_format_value_rejects_garbage() {
        assert_eq!(format_value(&json!(null)), "฿0.00");
        assert_eq!(format_value(&json!("abc")), "฿0.00");
        assert_eq!(format_value(&json!(true)), "฿0.00");
        assert_eq!(format_value(&json!({"total": 5})), "฿0.00");
    }

    #[test]
    fn test_out_of_range_number_is_flagged() {
        assert_eq!(format_value(&json!("1e40")), "฿0.00");
        assert!(is_numeric(&json!("1e40")));
        assert!(is_numeric(&json!(12)));
        assert!(!is_numeric(&json!("abc")));
        assert!(!is_numeric(&json!(null)));
    }

    #[test]
    fn test_half_cent_rounds_to_even() {
        let fmt = CurrencyFormatter::default();
        assert_eq!(fmt.format_major(dec!(0.125)), "฿0.12");
        assert_eq!(fmt.format_major(dec!(0.135)), "฿0.14");
    }

    #[test]
    fn test_tiny_negative_rounds_to_plain_zero() {
        let fmt = CurrencyFormatter::default();
        assert_eq!(fmt.format_major(dec!(-0.001)), "฿0.00");
    }

    #[test]
    fn test_custom_symbol() {
        let fmt = CurrencyFormatter::new("$");
        assert_eq!(fmt.symbol(), "$");
        assert_eq!(fmt.format_cents(199_900), "$1,999.00");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
    }
}
