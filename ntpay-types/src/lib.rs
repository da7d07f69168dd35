//! # NTPay Types
//!
//! Domain types and port traits for the payment gateway orchestrator.
//! This crate has ZERO external IO dependencies - only data structures,
//! the gateway capability table, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Money, GatewayIdentity, TransactionId)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    GatewayIdentity, Money, PaymentMethod, PaymentRecord, PaymentRequest, PaymentStatus,
    RecordStatus, TransactionId, TransactionIdParts, capability,
};
pub use dto::*;
pub use error::{AppError, DomainError, GatewayError, RepoError};
pub use ntpay_rates::{ConversionRate, CurrencyCode, RateBook, RateError};
pub use ports::{
    ChargeRequest, PaymentBackend, ProviderCharge, ProviderDetails, TransactionRecordStore,
};
