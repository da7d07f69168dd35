//! Domain models for the gateway orchestrator.

pub mod capability;
pub mod method;
pub mod money;
pub mod payment;
pub mod transaction;

pub use capability::GatewayIdentity;
pub use method::PaymentMethod;
pub use money::Money;
pub use payment::{PaymentRequest, PaymentStatus};
pub use transaction::{PaymentRecord, RecordStatus, TransactionId, TransactionIdParts};
