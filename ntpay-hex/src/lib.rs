//! # NTPay Hex
//!
//! Orchestration layer, gateway adapters and HTTP adapter for NTPay.
//!
//! ## Architecture
//!
//! - `orchestrator` - validates, negotiates and dispatches charges
//! - `negotiator` / `txid` - currency fallback and transaction IDs
//! - `outbound/` - Xendit, PayMongo and simulation backends
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The orchestrator is generic over `S: TransactionRecordStore`, allowing
//! different record store implementations to be injected.

pub mod config;
pub mod inbound;
pub mod negotiator;
pub mod openapi;
pub mod orchestrator;
pub mod outbound;
pub mod txid;


pub use config::{GatewayCredentials, OrchestratorConfig};
pub use orchestrator::PaymentOrchestrator;
pub use txid::TransactionIdGenerator;
