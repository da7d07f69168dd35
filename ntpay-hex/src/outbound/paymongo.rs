//! PayMongo payment intent API client.

use std::sync::Arc;

use async_trait::async_trait;
use ntpay_types::{
    ChargeRequest, DomainError, GatewayError, GatewayIdentity, PaymentBackend, PaymentMethod,
    PaymentStatus, ProviderCharge, ProviderDetails, TransactionRecordStore, capability,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::http::{authorized, endpoint, secret_key, send_json};
use crate::config::GatewayCredentials;
use crate::txid::TransactionIdGenerator;

/// JSON:API envelope PayMongo expects around every resource.
#[derive(Debug, Serialize)]
struct Envelope<T> {
    data: Resource<T>,
}

#[derive(Debug, Serialize)]
struct Resource<T> {
    attributes: T,
}

#[derive(Debug, Serialize)]
struct PaymentIntentAttributes<'a> {
    /// Minor units (centavos).
    amount: i64,
    currency: &'a str,
    payment_method_allowed: Vec<&'static str>,
    capture_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    metadata: IntentMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct IntentMetadata<'a> {
    transaction_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
}

fn resource_status(payload: &Value) -> PaymentStatus {
    payload
        .pointer("/data/attributes/status")
        .and_then(Value::as_str)
        .map(PaymentStatus::from_provider)
        .unwrap_or(PaymentStatus::Pending)
}

pub struct PayMongoBackend<S: TransactionRecordStore> {
    client: Client,
    credentials: GatewayCredentials,
    ids: Arc<TransactionIdGenerator<S>>,
}

impl<S: TransactionRecordStore> PayMongoBackend<S> {
    pub fn new(
        client: Client,
        credentials: GatewayCredentials,
        ids: Arc<TransactionIdGenerator<S>>,
    ) -> Self {
        Self {
            client,
            credentials,
            ids,
        }
    }
}

#[async_trait]
impl<S: TransactionRecordStore> PaymentBackend for PayMongoBackend<S> {
    fn identity(&self) -> GatewayIdentity {
        GatewayIdentity::Paymongo
    }

    #[tracing::instrument(skip(self, request), fields(amount = %request.amount))]
    async fn charge(&self, request: &ChargeRequest) -> Result<ProviderCharge, GatewayError> {
        let gateway = self.identity();
        capability::ensure_chargeable(gateway, request.amount.currency(), request.method)?;
        let secret = secret_key(gateway, &self.credentials)?;
        let amount = request
            .amount
            .to_minor_units()
            .ok_or_else(|| DomainError::AmountOutOfRange(request.amount.to_string()))?;

        let transaction_id = self.ids.generate(gateway).await?;
        let currency = request.amount.currency();
        let body = Envelope {
            data: Resource {
                attributes: PaymentIntentAttributes {
                    amount,
                    currency: currency.as_str(),
                    payment_method_allowed: self
                        .available_methods()
                        .iter()
                        .map(PaymentMethod::as_str)
                        .collect(),
                    capture_type: "automatic",
                    description: request.reference.as_deref(),
                    metadata: IntentMetadata {
                        transaction_id: transaction_id.as_str(),
                        reference: request.reference.as_deref(),
                    },
                },
            },
        };

        let url = endpoint(&self.credentials.base_url, "payment_intents");
        let payload = send_json(
            gateway,
            authorized(self.client.post(url), secret).json(&body),
        )
        .await?;

        let status = resource_status(&payload);
        tracing::info!(id = %transaction_id, %status, "paymongo payment intent created");
        Ok(ProviderCharge {
            transaction_id,
            status,
            message: "Payment intent created on PayMongo.".to_string(),
            payload,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn payment_details(
        &self,
        _gateway: GatewayIdentity,
        reference: &str,
    ) -> Result<ProviderDetails, GatewayError> {
        let gateway = self.identity();
        let secret = secret_key(gateway, &self.credentials)?;
        let url = endpoint(&self.credentials.base_url, &format!("payments/{reference}"));
        let payload = send_json(gateway, authorized(self.client.get(url), secret)).await?;

        Ok(ProviderDetails {
            reference: reference.to_string(),
            status: resource_status(&payload),
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_body_shape() {
        let body = Envelope {
            data: Resource {
                attributes: PaymentIntentAttributes {
                    amount: 5_430_000,
                    currency: "PHP",
                    payment_method_allowed: vec!["credit_card", "ewallet"],
                    capture_type: "automatic",
                    description: None,
                    metadata: IntentMetadata {
                        transaction_id: "NTP_PAYMONGO_0A1B2C3D4E_1",
                        reference: None,
                    },
                },
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        let attributes = &json["data"]["attributes"];
        assert_eq!(attributes["amount"], 5_430_000);
        assert_eq!(attributes["capture_type"], "automatic");
        assert!(attributes.get("description").is_none());
        assert_eq!(
            attributes["metadata"]["transaction_id"],
            "NTP_PAYMONGO_0A1B2C3D4E_1"
        );
    }

    #[test]
    fn test_resource_status() {
        let paid = serde_json::json!({"data": {"attributes": {"status": "paid"}}});
        assert_eq!(resource_status(&paid), PaymentStatus::Success);

        let intent = serde_json::json!({"data": {"attributes": {"status": "awaiting_payment_method"}}});
        assert_eq!(resource_status(&intent), PaymentStatus::Pending);
    }
}
