//! Payment method vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// How the payer funds a charge.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    DebitCard,
    Ewallet,
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: &'static [PaymentMethod] = &[
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Ewallet,
        PaymentMethod::BankTransfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Ewallet => "ewallet",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    pub fn all() -> &'static [PaymentMethod] {
        Self::ALL
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        PaymentMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownPaymentMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_credit_card() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::CreditCard);
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert_eq!(
            "EWALLET".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Ewallet
        );
    }

    #[test]
    fn test_unknown_method() {
        let err = "crypto".parse::<PaymentMethod>().unwrap_err();
        assert_eq!(err, DomainError::UnknownPaymentMethod("crypto".into()));
    }

    #[test]
    fn test_serde_matches_as_str() {
        for method in PaymentMethod::all() {
            let json = serde_json::to_string(method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.as_str()));
        }
    }
}
