//! SQLite record store adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use ntpay_types::{
    GatewayIdentity, Money, PaymentRecord, PaymentStatus, RecordStatus, RepoError, TransactionId,
    TransactionRecordStore,
};

use crate::types::{DbPaymentRecord, db_error, insert_error, to_millis};

const MIGRATION: &str = include_str!("../migrations/0001_create_payment_records.sql");

/// SQLite record store implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite record store with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `:memory:` opens a fresh database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        sqlx::query(MIGRATION).execute(&pool).await?;

        tracing::debug!(url = database_url, "sqlite record store ready");
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TransactionRecordStore for SqliteRepo {
    async fn exists(&self, id: &TransactionId) -> Result<bool, RepoError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payment_records WHERE transaction_id = ?")
                .bind(id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(db_error)?;
        Ok(count > 0)
    }

    async fn reserve(
        &self,
        id: &TransactionId,
        gateway: GatewayIdentity,
    ) -> Result<PaymentRecord, RepoError> {
        let record = PaymentRecord::reserved(id.clone(), gateway);

        sqlx::query(
            r#"INSERT INTO payment_records (transaction_id, gateway, status, amount, currency, created_at, updated_at)
               VALUES (?, ?, ?, NULL, NULL, ?, ?)"#,
        )
        .bind(id.as_str())
        .bind(gateway.tag())
        .bind(RecordStatus::Reserved.as_str())
        .bind(to_millis(record.created_at))
        .bind(to_millis(record.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, id.as_str()))?;

        Ok(record)
    }

    async fn record_charge(
        &self,
        id: &TransactionId,
        status: PaymentStatus,
        amount: Money,
    ) -> Result<PaymentRecord, RepoError> {
        let result = sqlx::query(
            r#"UPDATE payment_records SET status = ?, amount = ?, currency = ?, updated_at = ?
               WHERE transaction_id = ?"#,
        )
        .bind(RecordStatus::from(status).as_str())
        .bind(amount.amount().to_string())
        .bind(amount.currency().as_str())
        .bind(to_millis(chrono::Utc::now()))
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        self.get(id).await?.ok_or(RepoError::NotFound)
    }

    async fn get(&self, id: &TransactionId) -> Result<Option<PaymentRecord>, RepoError> {
        let row: Option<DbPaymentRecord> = sqlx::query_as(
            r#"SELECT transaction_id, gateway, status, amount, currency, created_at, updated_at
               FROM payment_records WHERE transaction_id = ?"#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(PaymentRecord::try_from).transpose()
    }
}
