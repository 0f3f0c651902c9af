//! # Money Module
//!
//! Monetary values as integer cents.
//!
//! ## Why Integer Money?
//! The legacy backend stored prices as floats and totaled them with float
//! arithmetic. Here every monetary value is an `i64` count of cents; only
//! the JSON boundary converts to and from decimal notation, so arithmetic
//! never loses a cent.
//!
//! ## Wire Format
//! Serializes as a decimal number (`0.5`, `13.0`) to keep the legacy JSON
//! shape. Deserializes from a JSON number or a decimal string, rejecting
//! more than two fractional digits.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A monetary value in cents.
///
/// Signed so that arithmetic intermediate values can go negative; the
/// validation layer rejects negative prices before they reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

/// Errors produced when parsing decimal input into [`Money`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("amount is not a decimal number")]
    Invalid,

    #[error("amount must have at most 2 fractional digits")]
    TooManyDecimals,

    #[error("amount is out of range")]
    OutOfRange,
}

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Overflow-checked addition.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Overflow-checked multiplication by a unitless quantity.
    #[inline]
    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// Parses a decimal string (`"12"`, `"12.3"`, `"12.34"`, `"-0.50"`).
    ///
    /// At most two fractional digits are accepted; the price columns store
    /// cents, so finer precision would be silently lost otherwise.
    pub fn from_decimal_str(s: &str) -> Result<Self, ParseMoneyError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };

        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseMoneyError::Invalid);
        }
        if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseMoneyError::Invalid);
        }
        if frac_part.len() > 2 {
            return Err(ParseMoneyError::TooManyDecimals);
        }

        let major: i64 = int_part
            .parse()
            .map_err(|_| ParseMoneyError::OutOfRange)?;
        let minor: i64 = match frac_part.len() {
            0 => 0,
            1 => frac_part.parse::<i64>().map_err(|_| ParseMoneyError::Invalid)? * 10,
            _ => frac_part.parse().map_err(|_| ParseMoneyError::Invalid)?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or(ParseMoneyError::OutOfRange)?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    fn from_f64(value: f64) -> Result<Self, ParseMoneyError> {
        if !value.is_finite() {
            return Err(ParseMoneyError::Invalid);
        }
        let cents = value * 100.0;
        // 2^53 is the largest integer a double represents exactly.
        if cents.abs() >= 9_007_199_254_740_992.0 {
            return Err(ParseMoneyError::OutOfRange);
        }
        if (cents - cents.round()).abs() > 1e-6 {
            return Err(ParseMoneyError::TooManyDecimals);
        }
        Ok(Money(cents.round() as i64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount with at most 2 fractional digits")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom(ParseMoneyError::OutOfRange))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Money)
            .ok_or_else(|| E::custom(ParseMoneyError::OutOfRange))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::from_decimal_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_strings() {
        assert_eq!(Money::from_decimal_str("12"), Ok(Money::from_cents(1200)));
        assert_eq!(Money::from_decimal_str("12.3"), Ok(Money::from_cents(1230)));
        assert_eq!(Money::from_decimal_str("12.34"), Ok(Money::from_cents(1234)));
        assert_eq!(Money::from_decimal_str("0.50"), Ok(Money::from_cents(50)));
        assert_eq!(Money::from_decimal_str("-0.50"), Ok(Money::from_cents(-50)));
    }

    #[test]
    fn rejects_bad_decimal_strings() {
        assert_eq!(Money::from_decimal_str(""), Err(ParseMoneyError::Empty));
        assert_eq!(
            Money::from_decimal_str("12.345"),
            Err(ParseMoneyError::TooManyDecimals)
        );
        assert_eq!(Money::from_decimal_str("abc"), Err(ParseMoneyError::Invalid));
        assert_eq!(
            Money::from_decimal_str("1.2.3"),
            Err(ParseMoneyError::Invalid)
        );
        assert_eq!(Money::from_decimal_str("."), Err(ParseMoneyError::Invalid));
    }

    #[test]
    fn json_round_trip() {
        let m: Money = serde_json::from_str("0.5").unwrap();
        assert_eq!(m, Money::from_cents(50));

        let m: Money = serde_json::from_str("13").unwrap();
        assert_eq!(m, Money::from_cents(1300));

        let m: Money = serde_json::from_str("\"1.20\"").unwrap();
        assert_eq!(m, Money::from_cents(120));

        assert_eq!(serde_json::to_string(&Money::from_cents(50)).unwrap(), "0.5");
    }

    #[test]
    fn rejects_three_decimal_json_number() {
        let err = serde_json::from_str::<Money>("1.005");
        assert!(err.is_err());
    }

    #[test]
    fn checked_arithmetic() {
        let price = Money::from_cents(500);
        assert_eq!(price.checked_mul(2), Some(Money::from_cents(1000)));
        assert_eq!(
            price.checked_add(Money::from_cents(300)),
            Some(Money::from_cents(800))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    }

    #[test]
    fn display_formats_cents() {
        assert_eq!(Money::from_cents(1234).to_string(), "12.34");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-50).to_string(), "-0.50");
    }
}
