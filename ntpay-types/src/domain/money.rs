//! Decimal monetary value with embedded currency.

use std::fmt;

use ntpay_rates::{CurrencyCode, format_amount};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A non-negative amount in a given currency.
///
/// Amounts are decimals in major units; conversion to the integer forms the
/// providers expect is done at the adapter edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MoneyParts")]
pub struct Money {
    amount: Decimal,
    currency: CurrencyCode,
}

#[derive(Deserialize)]
struct MoneyParts {
    amount: Decimal,
    currency: CurrencyCode,
}

impl TryFrom<MoneyParts> for Money {
    type Error = DomainError;

    fn try_from(parts: MoneyParts) -> Result<Self, Self::Error> {
        Money::new(parts.amount, parts.currency)
    }
}

impl Money {
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self { amount, currency })
    }

    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Two decimals, thousands separators, trailing code: `"1,000.00 USD"`.
    pub fn formatted(&self) -> String {
        format_amount(self.amount, self.currency)
    }

    /// Integer part of the amount, fractional digits dropped.
    pub fn truncated_major(&self) -> Option<i64> {
        self.amount.trunc().to_i64()
    }

    /// Amount in the currency's smallest unit, rounded half away from zero.
    pub fn to_minor_units(&self) -> Option<i64> {
        let factor = Decimal::from(self.currency.minor_units_per_major());
        self.amount
            .checked_mul(factor)?
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}
