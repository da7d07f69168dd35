//! Record store port trait.
//!
//! Adapters (InMemory, SQLite, Postgres) implement this trait.

use crate::domain::{GatewayIdentity, Money, PaymentRecord, PaymentStatus, TransactionId};
use crate::error::RepoError;

/// Persistence for generated transaction IDs.
///
/// `reserve` MUST be atomic: two concurrent reservations of the same ID
/// leave exactly one winner, and the loser gets `RepoError::Conflict`.
#[async_trait::async_trait]
pub trait TransactionRecordStore: Send + Sync + 'static {
    async fn exists(&self, id: &TransactionId) -> Result<bool, RepoError>;

    /// Claims an ID for a gateway.
    async fn reserve(
        &self,
        id: &TransactionId,
        gateway: GatewayIdentity,
    ) -> Result<PaymentRecord, RepoError>;

    /// Attaches a charge outcome to a reserved ID. `NotFound` if the ID was
    /// never reserved.
    async fn record_charge(
        &self,
        id: &TransactionId,
        status: PaymentStatus,
        amount: Money,
    ) -> Result<PaymentRecord, RepoError>;

    async fn get(&self, id: &TransactionId) -> Result<Option<PaymentRecord>, RepoError>;
}
