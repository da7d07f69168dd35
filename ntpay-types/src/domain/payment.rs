//! Payment requests and normalized provider status.

use ntpay_rates::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::capability::GatewayIdentity;
use super::method::PaymentMethod;

/// A caller's charge intent before defaults are applied.
///
/// Missing fields fall back to orchestrator configuration: amount to zero,
/// currency to the preferred currency, gateway to the default gateway and
/// method to `credit_card`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentRequest {
    pub amount: Option<Decimal>,
    pub currency: Option<CurrencyCode>,
    pub gateway: Option<GatewayIdentity>,
    pub payment_method: Option<PaymentMethod>,
    pub reference: Option<String>,
    pub email: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn with_gateway(mut self, gateway: GatewayIdentity) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Provider status collapsed to three outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Pending,
    Failed,
}

impl PaymentStatus {
    /// Classifies a provider status string; unrecognized values are pending.
    pub fn from_provider(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PAID" | "SETTLED" | "SUCCEEDED" | "SUCCESS" => PaymentStatus::Success,
            "EXPIRED" | "FAILED" | "CANCELLED" | "CANCELED" => PaymentStatus::Failed,
            _ => PaymentStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Success => "success",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder() {
        let req = PaymentRequest::new(dec!(100))
            .with_currency(CurrencyCode::IDR)
            .with_gateway(GatewayIdentity::Paymongo)
            .with_method(PaymentMethod::Ewallet)
            .with_reference("order-1")
            .with_email("payer@example.com");
        assert_eq!(req.amount, Some(dec!(100)));
        assert_eq!(req.currency, Some(CurrencyCode::IDR));
        assert_eq!(req.gateway, Some(GatewayIdentity::Paymongo));
        assert_eq!(req.payment_method, Some(PaymentMethod::Ewallet));
        assert_eq!(req.reference.as_deref(), Some("order-1"));
        assert_eq!(req.email.as_deref(), Some("payer@example.com"));
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(PaymentStatus::from_provider("PAID"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_provider("succeeded"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_provider("Expired"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from_provider("canceled"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from_provider("awaiting_payment_method"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from_provider(""), PaymentStatus::Pending);
    }
}
