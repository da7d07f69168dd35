//! Gateway identities and the capability table.
//!
//! This module is the only place that enumerates valid gateways. Free-form
//! tags become a [`GatewayIdentity`] through its `FromStr` impl; everything
//! downstream works with the closed enum.

use std::fmt;
use std::str::FromStr;

use ntpay_rates::CurrencyCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::method::PaymentMethod;
use crate::error::GatewayError;

/// A payment gateway (or its simulation stand-in).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GatewayIdentity {
    Xendit,
    Paymongo,
    Test,
}

impl GatewayIdentity {
    /// Lower-case tag, as used in configuration and on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            GatewayIdentity::Xendit => "xendit",
            GatewayIdentity::Paymongo => "paymongo",
            GatewayIdentity::Test => "test",
        }
    }

    /// Upper-case tag, as embedded in transaction IDs.
    pub fn upper_tag(&self) -> &'static str {
        match self {
            GatewayIdentity::Xendit => "XENDIT",
            GatewayIdentity::Paymongo => "PAYMONGO",
            GatewayIdentity::Test => "TEST",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GatewayIdentity::Xendit => "Xendit",
            GatewayIdentity::Paymongo => "PayMongo",
            GatewayIdentity::Test => "Test",
        }
    }

    pub fn all() -> &'static [GatewayIdentity] {
        &[
            GatewayIdentity::Xendit,
            GatewayIdentity::Paymongo,
            GatewayIdentity::Test,
        ]
    }
}

impl fmt::Display for GatewayIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for GatewayIdentity {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xendit" => Ok(GatewayIdentity::Xendit),
            "paymongo" => Ok(GatewayIdentity::Paymongo),
            "test" => Ok(GatewayIdentity::Test),
            _ => Err(GatewayError::UnsupportedGateway(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Capability table
// ─────────────────────────────────────────────────────────────────────────────

const XENDIT_METHODS: &[PaymentMethod] = &[
    PaymentMethod::CreditCard,
    PaymentMethod::DebitCard,
    PaymentMethod::Ewallet,
    PaymentMethod::BankTransfer,
];
const XENDIT_CURRENCIES: &[CurrencyCode] =
    &[CurrencyCode::USD, CurrencyCode::PHP, CurrencyCode::IDR];

const PAYMONGO_METHODS: &[PaymentMethod] = &[PaymentMethod::CreditCard, PaymentMethod::Ewallet];
const PAYMONGO_CURRENCIES: &[CurrencyCode] = &[CurrencyCode::PHP];

const TEST_METHODS: &[PaymentMethod] = PaymentMethod::ALL;
const TEST_CURRENCIES: &[CurrencyCode] = &[
    CurrencyCode::USD,
    CurrencyCode::PHP,
    CurrencyCode::IDR,
    CurrencyCode::SGD,
];

/// Payment methods the gateway accepts.
pub fn methods(gateway: GatewayIdentity) -> &'static [PaymentMethod] {
    match gateway {
        GatewayIdentity::Xendit => XENDIT_METHODS,
        GatewayIdentity::Paymongo => PAYMONGO_METHODS,
        GatewayIdentity::Test => TEST_METHODS,
    }
}

/// Currencies the gateway can charge in.
pub fn currencies(gateway: GatewayIdentity) -> &'static [CurrencyCode] {
    match gateway {
        GatewayIdentity::Xendit => XENDIT_CURRENCIES,
        GatewayIdentity::Paymongo => PAYMONGO_CURRENCIES,
        GatewayIdentity::Test => TEST_CURRENCIES,
    }
}

pub fn supports_method(gateway: GatewayIdentity, method: PaymentMethod) -> bool {
    methods(gateway).contains(&method)
}

pub fn supports_currency(gateway: GatewayIdentity, currency: CurrencyCode) -> bool {
    currencies(gateway).contains(&currency)
}

/// Resolves a free-form gateway tag.
pub fn resolve(tag: &str) -> Result<GatewayIdentity, GatewayError> {
    tag.parse()
}

/// Adapter-side re-check of a charge against the table.
pub fn ensure_chargeable(
    gateway: GatewayIdentity,
    currency: CurrencyCode,
    method: PaymentMethod,
) -> Result<(), GatewayError> {
    if !supports_currency(gateway, currency) {
        return Err(GatewayError::CurrencyUnsupported {
            requested: currency,
            secondary: None,
            gateway,
        });
    }
    if !supports_method(gateway, method) {
        return Err(GatewayError::UnsupportedMethod {
            method: method.to_string(),
            gateway: Some(gateway),
        });
    }
    Ok(())
}
