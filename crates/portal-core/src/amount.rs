//! # Rupee Amounts
//!
//! Fixed-point rupee values stored as paise (two decimal places) in an `i64`.
//!
//! ## Parsing
//!
//! `Amount::parse` accepts an optional sign, an optional integer part, and an
//! optional fractional part: `"500"`, `"500.5"`, `".75"`, `"-5"`. Fractional
//! digits beyond the second are truncated, the same way the amount field's
//! input filter truncates them. Exponents, grouping separators, and stray
//! characters are rejected.
//!
//! ## Wire Format
//!
//! The portal backend sends and receives amounts as JSON numbers.
//! `Serialize` writes an `f64`; `Deserialize` accepts integers, floats, and
//! numeric strings.
//!
//! ## Display
//!
//! `Display` prints two fixed decimals (`1234.50`). [`Amount::to_inr`] renders
//! the customer-facing form used across the portal: Indian digit grouping,
//! at most two fractional digits with trailing zeros dropped, and a `₹`
//! prefix (`₹1,23,456.5`).

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmountError;

/// A rupee amount in paise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    /// Whole rupees, e.g. `Amount::from_rupees(500)`.
    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees * 100)
    }

    pub const fn paise(&self) -> i64 {
        self.0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Parse a decimal string into paise.
    pub fn parse(raw: &str) -> Result<Self, AmountError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        let malformed = || AmountError::Malformed(s.to_string());

        let (negative, unsigned) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };

        let (int_str, frac_str) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };
        if int_str.is_empty() && frac_str.is_empty() {
            return Err(malformed());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_str) || !all_digits(frac_str) {
            return Err(malformed());
        }

        let whole: i64 = if int_str.is_empty() {
            0
        } else {
            int_str
                .parse()
                .map_err(|_| AmountError::Overflow(s.to_string()))?
        };
        let frac: i64 = match frac_str.len() {
            0 => 0,
            1 => i64::from(frac_str.as_bytes()[0] - b'0') * 10,
            _ => frac_str[..2].parse().map_err(|_| malformed())?,
        };

        let paise = whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(|| AmountError::Overflow(s.to_string()))?;

        Ok(Self(if negative { -paise } else { paise }))
    }

    /// Nearest-paisa conversion from a JSON float.
    pub fn from_rupees_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let paise = (value * 100.0).round();
        if paise < i64::MIN as f64 || paise > i64::MAX as f64 {
            return None;
        }
        Some(Self(paise as i64))
    }

    pub fn as_rupees_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Customer-facing rendering: `₹1,23,456.5`.
    pub fn to_inr(&self) -> String {
        format!("₹{}", self.to_en_in())
    }

    /// Indian-grouped rendering without the currency sign.
    pub fn to_en_in(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = group_en_in(&(abs / 100).to_string());
        let frac = abs % 100;

        if frac == 0 {
            format!("{sign}{whole}")
        } else if frac % 10 == 0 {
            format!("{sign}{whole}.{}", frac / 10)
        } else {
            format!("{sign}{whole}.{frac:02}")
        }
    }
}

/// Group a run of digits the en-IN way: the last three, then pairs.
fn group_en_in(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    let lead = head.len() % 2;
    if lead == 1 {
        out.push_str(&head[..1]);
    }
    for (i, pair) in head.as_bytes()[lead..].chunks(2).enumerate() {
        if i > 0 || lead == 1 {
            out.push(',');
        }
        out.extend(pair.iter().map(|&b| b as char));
    }
    out.push(',');
    out.push_str(tail);
    out
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl std::str::FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_rupees_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a rupee amount as a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        v.checked_mul(100)
            .map(Amount)
            .ok_or_else(|| E::custom(format!("amount {v} out of range")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Amount)
            .ok_or_else(|| E::custom(format!("amount {v} out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Amount::from_rupees_f64(v).ok_or_else(|| E::custom(format!("amount {v} out of range")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_and_decimal() {
        assert_eq!(Amount::parse("500").unwrap().paise(), 50_000);
        assert_eq!(Amount::parse("100.50").unwrap().paise(), 10_050);
        assert_eq!(Amount::parse("0.01").unwrap().paise(), 1);
        assert_eq!(Amount::parse("12.5").unwrap().paise(), 1_250);
        assert_eq!(Amount::parse(".75").unwrap().paise(), 75);
        assert_eq!(Amount::parse("5.").unwrap().paise(), 500);
    }

    #[test]
    fn parse_truncates_third_fractional_digit() {
        assert_eq!(Amount::parse("10.129").unwrap().paise(), 1_012);
        assert_eq!(Amount::parse("0.009").unwrap(), Amount::ZERO);
    }

    #[test]
    fn parse_signed() {
        assert_eq!(Amount::parse("-5").unwrap().paise(), -500);
        assert_eq!(Amount::parse("+5").unwrap().paise(), 500);
        assert!(!Amount::parse("-5").unwrap().is_positive());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Amount::parse("").unwrap_err(), AmountError::Empty);
        assert_eq!(Amount::parse("   ").unwrap_err(), AmountError::Empty);
        for bad in ["abc", ".", "-", "1e3", "1,000", "1.2.3", "12a", "₹5"] {
            assert!(Amount::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn parse_rejects_overflow() {
        assert!(matches!(
            Amount::parse("99999999999999999999"),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn display_has_two_decimals() {
        assert_eq!(Amount::from_paise(1_000_000).to_string(), "10000.00");
        assert_eq!(Amount::from_paise(450).to_string(), "4.50");
        assert_eq!(Amount::from_paise(-1).to_string(), "-0.01");
    }

    #[test]
    fn en_in_grouping() {
        assert_eq!(Amount::from_rupees(500).to_inr(), "₹500");
        assert_eq!(Amount::from_rupees(1_000).to_inr(), "₹1,000");
        assert_eq!(Amount::from_rupees(123_456).to_inr(), "₹1,23,456");
        assert_eq!(Amount::from_rupees(1_234_567).to_inr(), "₹12,34,567");
        assert_eq!(Amount::from_rupees(12_345_678).to_inr(), "₹1,23,45,678");
        assert_eq!(Amount::from_paise(123_450).to_inr(), "₹1,234.5");
        assert_eq!(Amount::from_paise(5).to_inr(), "₹0.05");
        assert_eq!(Amount::from_rupees(-2_500).to_inr(), "₹-2,500");
    }

    #[test]
    fn serializes_as_json_number() {
        let json = serde_json::to_value(Amount::from_paise(50_025)).unwrap();
        assert_eq!(json, serde_json::json!(500.25));
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let a: Amount = serde_json::from_str("1000").unwrap();
        assert_eq!(a, Amount::from_rupees(1_000));
        let b: Amount = serde_json::from_str("1000.1").unwrap();
        assert_eq!(b.paise(), 100_010);
        let c: Amount = serde_json::from_str("\"73.25\"").unwrap();
        assert_eq!(c.paise(), 7_325);
        assert!(serde_json::from_str::<Amount>("\"lots\"").is_err());
    }

    #[test]
    fn float_conversion_rounds_to_nearest_paisa() {
        assert_eq!(Amount::from_rupees_f64(0.1 + 0.2).unwrap().paise(), 30);
        assert!(Amount::from_rupees_f64(f64::NAN).is_none());
        assert!(Amount::from_rupees_f64(f64::INFINITY).is_none());
    }
}
