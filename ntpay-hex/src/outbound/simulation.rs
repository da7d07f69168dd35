//! Offline backend that stands in for any gateway in test mode.

use std::sync::Arc;

use async_trait::async_trait;
use ntpay_types::{
    ChargeRequest, GatewayError, GatewayIdentity, PaymentBackend, PaymentRecord, PaymentStatus,
    ProviderCharge, ProviderDetails, RecordStatus, TransactionId, TransactionRecordStore,
    capability,
};
use serde_json::{Value, json};

use crate::txid::TransactionIdGenerator;

pub struct SimulationBackend<S: TransactionRecordStore> {
    ids: Arc<TransactionIdGenerator<S>>,
}

impl<S: TransactionRecordStore> SimulationBackend<S> {
    pub fn new(ids: Arc<TransactionIdGenerator<S>>) -> Self {
        Self { ids }
    }
}

fn record_status(status: RecordStatus) -> PaymentStatus {
    match status {
        RecordStatus::Success => PaymentStatus::Success,
        RecordStatus::Failed => PaymentStatus::Failed,
        RecordStatus::Pending | RecordStatus::Reserved => PaymentStatus::Pending,
    }
}

fn record_payload(record: &PaymentRecord) -> Value {
    json!({
        "status": record_status(record.status),
        "record_status": record.status,
        "transaction_id": record.transaction_id,
        "amount": record.amount.map(|m| m.formatted()),
        "currency": record.amount.map(|m| m.currency().to_string()),
        "gateway": record.gateway.upper_tag(),
        "message": "Transaction retrieved from local records.",
    })
}

fn mock_payload(reference: &str) -> Value {
    json!({
        "status": "success",
        "transaction_id": reference,
        "amount": "100.00 PHP",
        "currency": "PHP",
        "gateway": "TEST",
        "message": "Mock transaction retrieved successfully.",
    })
}

#[async_trait]
impl<S: TransactionRecordStore> PaymentBackend for SimulationBackend<S> {
    fn identity(&self) -> GatewayIdentity {
        GatewayIdentity::Test
    }

    fn is_simulated(&self) -> bool {
        true
    }

    #[tracing::instrument(skip(self, request), fields(gateway = %request.gateway, amount = %request.amount))]
    async fn charge(&self, request: &ChargeRequest) -> Result<ProviderCharge, GatewayError> {
        let gateway = request.gateway;
        let currency = request.amount.currency();
        if !capability::supports_currency(gateway, currency) {
            return Err(GatewayError::CurrencyUnsupported {
                requested: currency,
                secondary: None,
                gateway,
            });
        }

        let transaction_id = self.ids.generate(gateway).await?;
        let message = format!("Payment successfully processed on {gateway} (Test Mode).");
        let payload = json!({
            "status": PaymentStatus::Success,
            "message": message,
            "transaction_id": transaction_id,
            "amount": request.amount.formatted(),
            "currency": currency,
            "gateway": gateway.upper_tag(),
        });

        tracing::info!(id = %transaction_id, "simulated charge accepted");
        Ok(ProviderCharge {
            transaction_id,
            status: PaymentStatus::Success,
            message,
            payload,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn payment_details(
        &self,
        gateway: GatewayIdentity,
        reference: &str,
    ) -> Result<ProviderDetails, GatewayError> {
        let id = TransactionId::from(reference);
        let details = match self.ids.store().get(&id).await? {
            Some(record) => ProviderDetails {
                reference: reference.to_string(),
                status: record_status(record.status),
                payload: record_payload(&record),
            },
            None => {
                tracing::debug!(%gateway, "no local record, returning mock details");
                ProviderDetails {
                    reference: reference.to_string(),
                    status: PaymentStatus::Success,
                    payload: mock_payload(reference),
                }
            }
        };
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator_tests::MockStore;
    use ntpay_types::{CurrencyCode, Money, PaymentMethod};
    use rust_decimal_macros::dec;

    fn backend() -> (Arc<MockStore>, SimulationBackend<MockStore>) {
        let store = Arc::new(MockStore::default());
        let ids = Arc::new(TransactionIdGenerator::new("NTP", store.clone()));
        (store, SimulationBackend::new(ids))
    }

    fn charge(gateway: GatewayIdentity, amount: Money) -> ChargeRequest {
        ChargeRequest {
            gateway,
            amount,
            method: PaymentMethod::CreditCard,
            reference: None,
            email: None,
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_simulated_charge_payload() {
        let (_, backend) = backend();
        let amount = Money::new(dec!(1000), CurrencyCode::USD).unwrap();
        let result = backend
            .charge(&charge(GatewayIdentity::Xendit, amount))
            .await
            .unwrap();

        assert_eq!(result.status, PaymentStatus::Success);
        assert_eq!(
            result.message,
            "Payment successfully processed on xendit (Test Mode)."
        );
        assert_eq!(result.payload["amount"], "1,000.00 USD");
        assert_eq!(result.payload["gateway"], "XENDIT");
        assert_eq!(result.transaction_id.parts().unwrap().gateway, "XENDIT");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_simulated_gateway_table_applies() {
        let (_, backend) = backend();
        let amount = Money::new(dec!(5), CurrencyCode::USD).unwrap();
        assert!(matches!(
            backend.charge(&charge(GatewayIdentity::Paymongo, amount)).await,
            Err(GatewayError::CurrencyUnsupported { .. })
        ));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_details_from_store_and_mock() {
        let (store, backend) = backend();
        let amount = Money::new(dec!(250), CurrencyCode::PHP).unwrap();
        let charged = backend
            .charge(&charge(GatewayIdentity::Paymongo, amount))
            .await
            .unwrap();
        store
            .record_charge(&charged.transaction_id, PaymentStatus::Success, amount)
            .await
            .unwrap();

        let known = backend
            .payment_details(GatewayIdentity::Paymongo, charged.transaction_id.as_str())
            .await
            .unwrap();
        assert_eq!(known.status, PaymentStatus::Success);
        assert_eq!(known.payload["amount"], "250.00 PHP");
        assert_eq!(known.payload["gateway"], "PAYMONGO");

        let unknown = backend
            .payment_details(GatewayIdentity::Xendit, "inv_does_not_exist")
            .await
            .unwrap();
        assert_eq!(unknown.payload["amount"], "100.00 PHP");
        assert_eq!(unknown.payload["gateway"], "TEST");
    }
}
