//! PostgreSQL record store adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use ntpay_types::{
    GatewayIdentity, Money, PaymentRecord, PaymentStatus, RecordStatus, RepoError, TransactionId,
    TransactionRecordStore,
};

use crate::types::{DbPaymentRecord, db_error, insert_error, to_millis};

/// PostgreSQL record store; uniqueness is enforced by the primary key.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL record store with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_payment_records_pg.sql"),
            "0001",
        )
        .await?;
        tracing::debug!("postgres record store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TransactionRecordStore for PostgresRepo {
    async fn exists(&self, id: &TransactionId) -> Result<bool, RepoError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM payment_records WHERE transaction_id = $1)",
        )
        .bind(id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn reserve(
        &self,
        id: &TransactionId,
        gateway: GatewayIdentity,
    ) -> Result<PaymentRecord, RepoError> {
        let record = PaymentRecord::reserved(id.clone(), gateway);

        sqlx::query(
            r#"INSERT INTO payment_records (transaction_id, gateway, status, amount, currency, created_at, updated_at)
               VALUES ($1, $2, $3, NULL, NULL, $4, $5)"#,
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
        let row: Option<DbPaymentRecord> = sqlx::query_as(
            r#"UPDATE payment_records SET status = $1, amount = $2, currency = $3, updated_at = $4
               WHERE transaction_id = $5
               RETURNING transaction_id, gateway, status, amount, currency, created_at, updated_at"#,
        )
        .bind(RecordStatus::from(status).as_str())
        .bind(amount.amount().to_string())
        .bind(amount.currency().as_str())
        .bind(to_millis(chrono::Utc::now()))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.ok_or(RepoError::NotFound)?.try_into()
    }

    async fn get(&self, id: &TransactionId) -> Result<Option<PaymentRecord>, RepoError> {
        let row: Option<DbPaymentRecord> = sqlx::query_as(
            r#"SELECT transaction_id, gateway, status, amount, currency, created_at, updated_at
               FROM payment_records WHERE transaction_id = $1"#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(PaymentRecord::try_from).transpose()
    }
}
