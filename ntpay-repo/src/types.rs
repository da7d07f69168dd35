//! Database row type shared by the SQLite and PostgreSQL adapters.
//!
//! Timestamps are stored as unix milliseconds and amounts as decimal text,
//! so the same row shape maps onto both backends.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use ntpay_types::{CurrencyCode, GatewayIdentity, Money, PaymentRecord, RecordStatus, RepoError};

/// Payment record row from database.
#[derive(FromRow)]
pub struct DbPaymentRecord {
    pub transaction_id: String,
    pub gateway: String,
    pub status: String,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

fn corrupt(id: &str, what: impl std::fmt::Display) -> RepoError {
    RepoError::Corrupt(format!("{id}: {what}"))
}

fn timestamp(id: &str, millis: i64) -> Result<DateTime<Utc>, RepoError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| corrupt(id, "timestamp out of range"))
}

pub fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

impl TryFrom<DbPaymentRecord> for PaymentRecord {
    type Error = RepoError;

    fn try_from(row: DbPaymentRecord) -> Result<Self, Self::Error> {
        let key = row.transaction_id.clone();
        let id = key.as_str();
        let gateway: GatewayIdentity = row
            .gateway
            .parse()
            .map_err(|e: ntpay_types::GatewayError| corrupt(id, e))?;
        let status: RecordStatus = row.status.parse().map_err(|e: String| corrupt(id, e))?;

        let amount = match (&row.amount, &row.currency) {
            (Some(amount), Some(currency)) => {
                let amount: Decimal = amount.parse().map_err(|e| corrupt(id, e))?;
                let currency = CurrencyCode::parse(currency).map_err(|e| corrupt(id, e))?;
                Some(Money::new(amount, currency).map_err(|e| corrupt(id, e))?)
            }
            (None, None) => None,
            _ => return Err(corrupt(id, "amount and currency must be set together")),
        };

        Ok(PaymentRecord {
            gateway,
            status,
            amount,
            created_at: timestamp(id, row.created_at)?,
            updated_at: timestamp(id, row.updated_at)?,
            transaction_id: row.transaction_id.into(),
        })
    }
}

/// Maps an insert failure, turning unique violations into `Conflict`.
pub fn insert_error(err: sqlx::Error, id: &str) -> RepoError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Conflict(format!("transaction ID {id} already reserved"))
        }
        _ => RepoError::Database(err.to_string()),
    }
}

pub fn db_error(err: sqlx::Error) -> RepoError {
    RepoError::Database(err.to_string())
}
