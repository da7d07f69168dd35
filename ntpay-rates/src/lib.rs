//! Currency Codes, Amount Formatting and Conversion Rates
//!
//! Currency codes are three upper-case ASCII letters. Any well-formed code is
//! accepted; the codes listed in the `define_currencies!` invocation below also
//! carry a symbol and the number of minor units per major unit.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` macro invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     THB => (b"THB", "฿", 100),
//! }
//! ```
//!
//! # Example
//! ```
//! use ntpay_rates::{CurrencyCode, RateBook, format_amount};
//! use rust_decimal_macros::dec;
//!
//! let mut rates = RateBook::new(CurrencyCode::USD, CurrencyCode::PHP, Some(dec!(54.30)));
//! assert_eq!(rates.convert(dec!(1000)).unwrap(), dec!(54300));
//!
//! rates.set_override(dec!(55)).unwrap();
//! let converted = rates.convert(dec!(1000)).unwrap();
//! assert_eq!(format_amount(converted, CurrencyCode::PHP), "55,000.00 PHP");
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// A currency code that is not three ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurrencyError {
    #[error("Invalid currency code {0:?}: expected three letters")]
    Malformed(String),
}

/// Why a conversion could not be performed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateError {
    #[error("no conversion rate is configured")]
    Missing,

    #[error("conversion rate must be a positive number, got {0}")]
    NonPositive(Decimal),

    #[error("converting {amount} at rate {rate} overflows")]
    Overflow { amount: Decimal, rate: Decimal },
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency Code
// ─────────────────────────────────────────────────────────────────────────────

/// ISO-4217-style currency code, stored upper-cased.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// Parses a code, trimming whitespace and upper-casing it.
    pub fn parse(code: &str) -> Result<Self, CurrencyError> {
        let bytes = code.trim().as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(CurrencyError::Malformed(code.to_string()));
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Whether the code has an entry in the known-currency table.
    pub fn is_known(&self) -> bool {
        Self::known().contains(self)
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.as_str())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: known currencies with symbol and minor-unit metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Generates the associated constants and metadata lookups of `CurrencyCode`.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     NAME => (b"CODE", "SYMBOL", minor_units_per_major),
/// }
/// ```
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $minor_per_major:expr)
        ),* $(,)?
    ) => {
        impl CurrencyCode {
            $(
                pub const $name: CurrencyCode = CurrencyCode(*$code);
            )*

            /// Display symbol, if the currency is known.
            pub fn symbol(&self) -> Option<&'static str> {
                match *self {
                    $(CurrencyCode::$name => Some($symbol),)*
                    _ => None,
                }
            }

            /// Minor units per major unit; unknown currencies assume 100.
            pub fn minor_units_per_major(&self) -> i64 {
                match *self {
                    $(CurrencyCode::$name => $minor_per_major,)*
                    _ => 100,
                }
            }

            pub fn known() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - Add new currencies here!
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    USD => (b"USD", "$", 100),
    PHP => (b"PHP", "₱", 100),
    IDR => (b"IDR", "Rp", 100),
    SGD => (b"SGD", "S$", 100),
    EUR => (b"EUR", "€", 100),
    JPY => (b"JPY", "¥", 1),
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────────────────────────────────────

/// Formats an amount as `1,234.50 USD`: two decimals rounded half away from
/// zero, comma-grouped thousands.
pub fn format_amount(amount: Decimal, currency: CurrencyCode) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}{}.{fraction} {currency}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion Rates
// ─────────────────────────────────────────────────────────────────────────────

/// The preferred → secondary rate currently in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConversionRate {
    #[schema(value_type = String, example = "USD")]
    pub from: CurrencyCode,
    #[schema(value_type = String, example = "PHP")]
    pub to: CurrencyCode,
    /// Absent when neither an override nor a configured rate exists.
    #[schema(value_type = Option<String>, example = "54.30")]
    pub rate: Option<Decimal>,
}

/// The configured static rate plus an optional override.
///
/// The book is plain data: whoever owns it owns the override. Cloning a book
/// with [`RateBook::without_override`] yields a fresh scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateBook {
    preferred: CurrencyCode,
    secondary: CurrencyCode,
    configured: Option<Decimal>,
    overridden: Option<Decimal>,
}

impl RateBook {
    pub fn new(
        preferred: CurrencyCode,
        secondary: CurrencyCode,
        configured: Option<Decimal>,
    ) -> Self {
        Self {
            preferred,
            secondary,
            configured,
            overridden: None,
        }
    }

    pub fn preferred(&self) -> CurrencyCode {
        self.preferred
    }

    pub fn secondary(&self) -> CurrencyCode {
        self.secondary
    }

    pub fn configured_rate(&self) -> Option<Decimal> {
        self.configured
    }

    pub fn override_rate(&self) -> Option<Decimal> {
        self.overridden
    }

    /// The override when present, else the configured rate.
    pub fn effective_rate(&self) -> Option<Decimal> {
        self.overridden.or(self.configured)
    }

    /// Sets the override. Rejects zero and negative rates.
    pub fn set_override(&mut self, rate: Decimal) -> Result<(), RateError> {
        if rate <= Decimal::ZERO {
            return Err(RateError::NonPositive(rate));
        }
        self.overridden = Some(rate);
        Ok(())
    }

    pub fn clear_override(&mut self) {
        self.overridden = None;
    }

    /// A copy of this book with the override dropped.
    pub fn without_override(&self) -> Self {
        Self {
            overridden: None,
            ..self.clone()
        }
    }

    pub fn current(&self) -> ConversionRate {
        ConversionRate {
            from: self.preferred,
            to: self.secondary,
            rate: self.effective_rate(),
        }
    }

    /// Multiplies `amount` by the effective rate.
    pub fn convert(&self, amount: Decimal) -> Result<Decimal, RateError> {
        let rate = self.effective_rate().ok_or(RateError::Missing)?;
        if rate <= Decimal::ZERO {
            return Err(RateError::NonPositive(rate));
        }
        amount
            .checked_mul(rate)
            .ok_or(RateError::Overflow { amount, rate })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn book() -> RateBook {
        RateBook::new(CurrencyCode::USD, CurrencyCode::PHP, Some(dec!(54.30)))
    }

    #[test]
    fn test_currency_code_parse_uppercases() {
        assert_eq!("php".parse::<CurrencyCode>().unwrap(), CurrencyCode::PHP);
        assert_eq!(" usd ".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!("thb".parse::<CurrencyCode>().unwrap().as_str(), "THB");
    }

    #[test]
    fn test_currency_code_rejects_malformed() {
        assert!(matches!(
            CurrencyCode::parse("US"),
            Err(CurrencyError::Malformed(_))
        ));
        assert!(CurrencyCode::parse("US1").is_err());
        assert!(CurrencyCode::parse("USDX").is_err());
        assert!(CurrencyCode::parse("").is_err());
    }

    #[test]
    fn test_currency_metadata() {
        assert_eq!(CurrencyCode::PHP.symbol(), Some("₱"));
        assert_eq!(CurrencyCode::JPY.minor_units_per_major(), 1);
        let thb = CurrencyCode::parse("THB").unwrap();
        assert_eq!(thb.symbol(), None);
        assert_eq!(thb.minor_units_per_major(), 100);
        assert!(!thb.is_known());
        assert_eq!(CurrencyCode::known().len(), 6);
    }

    #[test]
    fn test_currency_code_serde() {
        let json = serde_json::to_string(&CurrencyCode::IDR).unwrap();
        assert_eq!(json, "\"IDR\"");
        let parsed: CurrencyCode = serde_json::from_str("\"sgd\"").unwrap();
        assert_eq!(parsed, CurrencyCode::SGD);
        assert!(serde_json::from_str::<CurrencyCode>("\"dollars\"").is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(1000), CurrencyCode::USD), "1,000.00 USD");
        assert_eq!(format_amount(dec!(0.5), CurrencyCode::PHP), "0.50 PHP");
        assert_eq!(
            format_amount(dec!(1234567.891), CurrencyCode::IDR),
            "1,234,567.89 IDR"
        );
        assert_eq!(format_amount(dec!(999.995), CurrencyCode::USD), "1,000.00 USD");
        assert_eq!(format_amount(dec!(100), CurrencyCode::SGD), "100.00 SGD");
    }

    #[test]
    fn test_format_amount_is_idempotent() {
        let first = format_amount(dec!(54300.00), CurrencyCode::PHP);
        let second = format_amount(dec!(54300.00), CurrencyCode::PHP);
        assert_eq!(first, second);
        assert_eq!(first, "54,300.00 PHP");
    }

    #[test]
    fn test_convert_uses_configured_rate() {
        assert_eq!(book().convert(dec!(1000)).unwrap(), dec!(54300));
    }

    #[test]
    fn test_override_takes_precedence() {
        let mut rates = book();
        rates.set_override(dec!(55.0)).unwrap();
        assert_eq!(rates.current().rate, Some(dec!(55.0)));
        assert_eq!(rates.convert(dec!(10)).unwrap(), dec!(550));

        rates.clear_override();
        assert_eq!(rates.effective_rate(), Some(dec!(54.30)));
    }

    #[test]
    fn test_non_positive_override_rejected() {
        let mut rates = book();
        assert_eq!(
            rates.set_override(dec!(0)),
            Err(RateError::NonPositive(dec!(0)))
        );
        assert!(rates.set_override(dec!(-5)).is_err());
        assert_eq!(rates.override_rate(), None);
    }

    #[test]
    fn test_missing_or_invalid_configured_rate() {
        let missing = RateBook::new(CurrencyCode::USD, CurrencyCode::PHP, None);
        assert_eq!(missing.convert(dec!(1)), Err(RateError::Missing));
        assert_eq!(missing.current().rate, None);

        let negative = RateBook::new(CurrencyCode::USD, CurrencyCode::PHP, Some(dec!(-1)));
        assert!(matches!(
            negative.convert(dec!(1)),
            Err(RateError::NonPositive(_))
        ));
    }

    #[test]
    fn test_convert_overflow() {
        let rates = RateBook::new(CurrencyCode::USD, CurrencyCode::PHP, Some(dec!(1000)));
        assert!(matches!(
            rates.convert(Decimal::MAX),
            Err(RateError::Overflow { .. })
        ));
    }

    #[test]
    fn test_without_override_is_fresh_scope() {
        let mut rates = book();
        rates.set_override(dec!(60)).unwrap();
        let fresh = rates.without_override();
        assert_eq!(fresh.effective_rate(), Some(dec!(54.30)));
        assert_eq!(rates.effective_rate(), Some(dec!(60)));
    }
}
