//! SQLite record store integration tests.

#[cfg(test)]
mod tests {
    use ntpay_types::{
        CurrencyCode, GatewayIdentity, Money, PaymentStatus, RecordStatus, RepoError,
        TransactionId, TransactionRecordStore,
    };
    use rust_decimal_macros::dec;

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_reserve_and_get() {
        let repo = setup_repo().await;
        let id = TransactionId::from("NTP_XENDIT_A1B2C3D4E5_1700000000");

        assert!(!repo.exists(&id).await.unwrap());
        let reserved = repo.reserve(&id, GatewayIdentity::Xendit).await.unwrap();
        assert_eq!(reserved.status, RecordStatus::Reserved);
        assert!(repo.exists(&id).await.unwrap());

        let fetched = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.transaction_id, id);
        assert_eq!(fetched.gateway, GatewayIdentity::Xendit);
        assert_eq!(fetched.status, RecordStatus::Reserved);
        assert!(fetched.amount.is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let repo = setup_repo().await;
        let id = TransactionId::from("NTP_TEST_0000000000_1");

        assert!(repo.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_reserve_is_conflict() {
        let repo = setup_repo().await;
        let id = TransactionId::from("NTP_PAYMONGO_FFFFFFFFFF_1700000000");

        repo.reserve(&id, GatewayIdentity::Paymongo).await.unwrap();
        let err = repo
            .reserve(&id, GatewayIdentity::Paymongo)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_record_charge_stores_amount() {
        let repo = setup_repo().await;
        let id = TransactionId::from("NTP_TEST_1234567890_1700000000");
        let amount = Money::new(dec!(5430.00), CurrencyCode::PHP).unwrap();

        repo.reserve(&id, GatewayIdentity::Test).await.unwrap();
        let updated = repo
            .record_charge(&id, PaymentStatus::Success, amount)
            .await
            .unwrap();

        assert_eq!(updated.status, RecordStatus::Success);
        assert_eq!(updated.amount, Some(amount));
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_record_charge_without_reservation() {
        let repo = setup_repo().await;
        let id = TransactionId::from("NTP_TEST_NOPE000000_1");
        let amount = Money::new(dec!(1), CurrencyCode::USD).unwrap();

        let result = repo.record_charge(&id, PaymentStatus::Pending, amount).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/nested/records.db", dir.path().display());
        let id = TransactionId::from("NTP_XENDIT_9999999999_1700000000");

        {
            let repo = SqliteRepo::new(&url).await.unwrap();
            repo.reserve(&id, GatewayIdentity::Xendit).await.unwrap();
            repo.pool().close().await;
        }

        let reopened = SqliteRepo::new(&url).await.unwrap();
        assert!(reopened.exists(&id).await.unwrap());
    }
}
