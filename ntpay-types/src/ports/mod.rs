//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The orchestrator depends on these traits, not concrete implementations.

mod backend;
mod record_store;

pub use backend::{ChargeRequest, PaymentBackend, ProviderCharge, ProviderDetails};
pub use record_store::TransactionRecordStore;
