//! Transaction identifiers and the records kept for them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::capability::GatewayIdentity;
use super::money::Money;
use super::payment::PaymentStatus;

/// Identifier of the form `PREFIX_GATEWAY_TOKEN_UNIXSECONDS`.
///
/// Values are opaque once composed; IDs returned by a provider are stored
/// as-is and may not follow the layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TransactionId(String);

/// Borrowed view of the four underscore-separated segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionIdParts<'a> {
    pub prefix: &'a str,
    pub gateway: &'a str,
    pub token: &'a str,
    pub timestamp: i64,
}

impl TransactionId {
    pub fn compose(prefix: &str, gateway: GatewayIdentity, token: &str, unix_seconds: i64) -> Self {
        Self(format!(
            "{prefix}_{}_{token}_{unix_seconds}",
            gateway.upper_tag()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Splits a composed ID; `None` when the value has a different shape.
    pub fn parts(&self) -> Option<TransactionIdParts<'_>> {
        let mut segments = self.0.splitn(4, '_');
        let prefix = segments.next()?;
        let gateway = segments.next()?;
        let token = segments.next()?;
        let timestamp = segments.next()?.parse().ok()?;
        Some(TransactionIdParts {
            prefix,
            gateway,
            token,
            timestamp,
        })
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lifecycle of a stored record.
///
/// `Reserved` marks an ID that has been claimed but whose charge has not
/// completed (or failed before the provider accepted it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Reserved,
    Success,
    Pending,
    Failed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Reserved => "reserved",
            RecordStatus::Success => "success",
            RecordStatus::Pending => "pending",
            RecordStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reserved" => Ok(RecordStatus::Reserved),
            "success" => Ok(RecordStatus::Success),
            "pending" => Ok(RecordStatus::Pending),
            "failed" => Ok(RecordStatus::Failed),
            other => Err(format!("unknown record status: {other}")),
        }
    }
}

impl From<PaymentStatus> for RecordStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Success => RecordStatus::Success,
            PaymentStatus::Pending => RecordStatus::Pending,
            PaymentStatus::Failed => RecordStatus::Failed,
        }
    }
}

/// A transaction ID known to the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub transaction_id: TransactionId,
    pub gateway: GatewayIdentity,
    pub status: RecordStatus,
    /// Final charged amount; absent until the charge is recorded.
    pub amount: Option<Money>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// A freshly claimed ID with no charge attached.
    pub fn reserved(transaction_id: TransactionId, gateway: GatewayIdentity) -> Self {
        let now = Utc::now();
        Self {
            transaction_id,
            gateway,
            status: RecordStatus::Reserved,
            amount: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a completed charge to the record.
    pub fn mark_charged(&mut self, status: PaymentStatus, amount: Money) {
        self.status = status.into();
        self.amount = Some(amount);
        self.updated_at = Utc::now();
    }
}
