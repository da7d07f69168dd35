//! Payment backend port.
//!
//! Implemented by the real gateway adapters and by the simulation backend.

use ntpay_rates::CurrencyCode;
use serde_json::Value;

use crate::domain::{GatewayIdentity, Money, PaymentMethod, PaymentStatus, TransactionId, capability};
use crate::error::GatewayError;

/// A charge that has already passed orchestrator validation.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    /// The gateway being charged (or simulated).
    pub gateway: GatewayIdentity,
    /// Final amount after currency negotiation.
    pub amount: Money,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub email: Option<String>,
}

/// What a backend returns for an accepted charge.
#[derive(Debug, Clone)]
pub struct ProviderCharge {
    /// Our generated ID, reserved in the record store.
    pub transaction_id: TransactionId,
    pub status: PaymentStatus,
    pub message: String,
    pub payload: Value,
}

/// What a backend returns for a lookup.
#[derive(Debug, Clone)]
pub struct ProviderDetails {
    pub reference: String,
    pub status: PaymentStatus,
    pub payload: Value,
}

#[async_trait::async_trait]
pub trait PaymentBackend: Send + Sync {
    /// The gateway this adapter speaks for.
    fn identity(&self) -> GatewayIdentity;

    /// True for backends that never touch the network.
    fn is_simulated(&self) -> bool {
        false
    }

    fn available_methods(&self) -> &'static [PaymentMethod] {
        capability::methods(self.identity())
    }

    fn available_currencies(&self) -> &'static [CurrencyCode] {
        capability::currencies(self.identity())
    }

    /// Submits a charge. Implementations re-check capabilities and generate
    /// the transaction ID before any I/O.
    async fn charge(&self, request: &ChargeRequest) -> Result<ProviderCharge, GatewayError>;

    /// Looks up a payment by provider or transaction reference.
    async fn payment_details(
        &self,
        gateway: GatewayIdentity,
        reference: &str,
    ) -> Result<ProviderDetails, GatewayError>;
}
