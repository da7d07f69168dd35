//! Transaction ID generation.

use std::sync::Arc;

use ntpay_types::{GatewayError, GatewayIdentity, RepoError, TransactionId, TransactionRecordStore};
use rand::RngCore;

use crate::config::DEFAULT_ID_MAX_ATTEMPTS;

/// Random bytes per token; hex-encoded to 10 characters.
const TOKEN_BYTES: usize = 5;

/// Produces `PREFIX_GATEWAY_TOKEN_UNIXSECONDS` identifiers and claims them in
/// the record store.
pub struct TransactionIdGenerator<S: TransactionRecordStore> {
    prefix: String,
    store: Arc<S>,
    max_attempts: u32,
}

impl<S: TransactionRecordStore> TransactionIdGenerator<S> {
    pub fn new(prefix: impl Into<String>, store: Arc<S>) -> Self {
        Self {
            prefix: prefix.into().to_ascii_uppercase(),
            store,
            max_attempts: DEFAULT_ID_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Builds a fresh candidate without touching the store.
    pub fn candidate(&self, gateway: GatewayIdentity) -> TransactionId {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let token = hex::encode_upper(bytes);
        TransactionId::compose(&self.prefix, gateway, &token, chrono::Utc::now().timestamp())
    }

    /// Generates and reserves a unique ID for `gateway`.
    #[tracing::instrument(skip(self), fields(gateway = %gateway))]
    pub async fn generate(&self, gateway: GatewayIdentity) -> Result<TransactionId, GatewayError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.candidate(gateway);
            if self.store.exists(&candidate).await? {
                tracing::debug!(attempt, id = %candidate, "candidate already recorded");
                continue;
            }
            match self.store.reserve(&candidate, gateway).await {
                Ok(_) => return Ok(candidate),
                Err(RepoError::Conflict(_)) => {
                    tracing::debug!(attempt, id = %candidate, "lost reservation race");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(attempts = self.max_attempts, "transaction ID space exhausted");
        Err(GatewayError::IdGenerationExhausted {
            attempts: self.max_attempts,
        })
    }
}
