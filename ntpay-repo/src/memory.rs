//! In-memory record store backed by `DashMap`.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use ntpay_types::{
    GatewayIdentity, Money, PaymentRecord, PaymentStatus, RepoError, TransactionId,
    TransactionRecordStore,
};

/// Process-local store; contents are lost on exit.
#[derive(Default)]
pub struct InMemoryRepo {
    records: DashMap<TransactionId, PaymentRecord>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl TransactionRecordStore for InMemoryRepo {
    async fn exists(&self, id: &TransactionId) -> Result<bool, RepoError> {
        Ok(self.records.contains_key(id))
    }

    async fn reserve(
        &self,
        id: &TransactionId,
        gateway: GatewayIdentity,
    ) -> Result<PaymentRecord, RepoError> {
        match self.records.entry(id.clone()) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!(
                "transaction ID {id} already reserved"
            ))),
            Entry::Vacant(slot) => {
                let record = PaymentRecord::reserved(id.clone(), gateway);
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn record_charge(
        &self,
        id: &TransactionId,
        status: PaymentStatus,
        amount: Money,
    ) -> Result<PaymentRecord, RepoError> {
        let mut record = self.records.get_mut(id).ok_or(RepoError::NotFound)?;
        record.mark_charged(status, amount);
        Ok(record.clone())
    }

    async fn get(&self, id: &TransactionId) -> Result<Option<PaymentRecord>, RepoError> {
        Ok(self.records.get(id).map(|r| r.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ntpay_types::{CurrencyCode, RecordStatus};
    use rust_decimal_macros::dec;

    use super::*;

    #[tokio::test]
    async fn test_reserve_then_exists() {
        let repo = InMemoryRepo::new();
        let id = TransactionId::from("NTP_XENDIT_0123456789_1700000000");

        assert!(!repo.exists(&id).await.unwrap());
        let record = repo.reserve(&id, GatewayIdentity::Xendit).await.unwrap();
        assert_eq!(record.status, RecordStatus::Reserved);
        assert!(repo.exists(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_reserve_conflicts() {
        let repo = InMemoryRepo::new();
        let id = TransactionId::from("NTP_TEST_AAAAAAAAAA_1");

        repo.reserve(&id, GatewayIdentity::Test).await.unwrap();
        let err = repo.reserve(&id, GatewayIdentity::Test).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_record_charge_requires_reservation() {
        let repo = InMemoryRepo::new();
        let id = TransactionId::from("NTP_TEST_BBBBBBBBBB_1");
        let amount = Money::new(dec!(12.50), CurrencyCode::PHP).unwrap();

        assert!(matches!(
            repo.record_charge(&id, PaymentStatus::Success, amount).await,
            Err(RepoError::NotFound)
        ));

        repo.reserve(&id, GatewayIdentity::Paymongo).await.unwrap();
        let record = repo
            .record_charge(&id, PaymentStatus::Pending, amount)
            .await
            .unwrap();
        assert_eq!(record.status, RecordStatus::Pending);
        assert_eq!(repo.get(&id).await.unwrap().unwrap().amount, Some(amount));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reservations_have_one_winner() {
        let repo = Arc::new(InMemoryRepo::new());
        let id = TransactionId::from("NTP_XENDIT_CCCCCCCCCC_1");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                let id = id.clone();
                tokio::spawn(async move { repo.reserve(&id, GatewayIdentity::Xendit).await })
            })
            .collect();

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(repo.len(), 1);
    }
}
