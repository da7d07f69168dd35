//! Xendit invoice API client.

use std::sync::Arc;

use async_trait::async_trait;
use ntpay_types::{
    ChargeRequest, DomainError, GatewayError, GatewayIdentity, PaymentBackend, PaymentStatus,
    ProviderCharge, ProviderDetails, TransactionRecordStore, capability,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::http::{authorized, endpoint, secret_key, send_json};
use crate::config::GatewayCredentials;
use crate::txid::TransactionIdGenerator;

/// Body of `POST /v2/invoices`.
#[derive(Debug, Serialize)]
struct CreateInvoice<'a> {
    external_id: &'a str,
    /// Whole major units; fractions are dropped.
    amount: i64,
    currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payer_email: Option<&'a str>,
    description: String,
}

pub struct XenditBackend<S: TransactionRecordStore> {
    client: Client,
    credentials: GatewayCredentials,
    ids: Arc<TransactionIdGenerator<S>>,
}

impl<S: TransactionRecordStore> XenditBackend<S> {
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

fn invoice_status(payload: &Value) -> PaymentStatus {
    payload
        .get("status")
        .and_then(Value::as_str)
        .map(PaymentStatus::from_provider)
        .unwrap_or(PaymentStatus::Pending)
}

#[async_trait]
impl<S: TransactionRecordStore> PaymentBackend for XenditBackend<S> {
    fn identity(&self) -> GatewayIdentity {
        GatewayIdentity::Xendit
    }

    #[tracing::instrument(skip(self, request), fields(amount = %request.amount))]
    async fn charge(&self, request: &ChargeRequest) -> Result<ProviderCharge, GatewayError> {
        let gateway = self.identity();
        capability::ensure_chargeable(gateway, request.amount.currency(), request.method)?;
        let secret = secret_key(gateway, &self.credentials)?;
        let amount = request
            .amount
            .truncated_major()
            .ok_or_else(|| DomainError::AmountOutOfRange(request.amount.to_string()))?;

        let transaction_id = self.ids.generate(gateway).await?;
        let currency = request.amount.currency();
        let body = CreateInvoice {
            external_id: transaction_id.as_str(),
            amount,
            currency: currency.as_str(),
            payer_email: request.email.as_deref(),
            description: match &request.reference {
                Some(reference) => format!("Payment for order {reference}"),
                None => format!("Payment for order {transaction_id}"),
            },
        };

        let url = endpoint(&self.credentials.base_url, "v2/invoices");
        let payload = send_json(
            gateway,
            authorized(self.client.post(url), secret).json(&body),
        )
        .await?;

        let status = invoice_status(&payload);
        tracing::info!(id = %transaction_id, %status, "xendit invoice created");
        Ok(ProviderCharge {
            transaction_id,
            status,
            message: "Invoice created on Xendit.".to_string(),
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
        let url = endpoint(
            &self.credentials.base_url,
            &format!("v2/invoices/{reference}"),
        );
        let payload = send_json(gateway, authorized(self.client.get(url), secret)).await?;

        Ok(ProviderDetails {
            reference: reference.to_string(),
            status: invoice_status(&payload),
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_status() {
        let paid = serde_json::json!({"id": "inv_1", "status": "PAID"});
        assert_eq!(invoice_status(&paid), PaymentStatus::Success);

        let expired = serde_json::json!({"status": "EXPIRED"});
        assert_eq!(invoice_status(&expired), PaymentStatus::Failed);

        let missing = serde_json::json!({"id": "inv_2"});
        assert_eq!(invoice_status(&missing), PaymentStatus::Pending);
    }

    #[test]
    fn test_invoice_body_omits_missing_email() {
        let body = CreateInvoice {
            external_id: "NTP_XENDIT_0A1B2C3D4E_1",
            amount: 1000,
            currency: "USD",
            payer_email: None,
            description: "Payment for order NTP_XENDIT_0A1B2C3D4E_1".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["amount"], 1000);
        assert!(json.get("payer_email").is_none());
    }
}
