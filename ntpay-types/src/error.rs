//! Error types for the gateway orchestrator.

use ntpay_rates::{CurrencyCode, CurrencyError, RateError};

use crate::domain::GatewayIdentity;

/// Domain-level errors (invalid values).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error(transparent)]
    InvalidCurrency(#[from] CurrencyError),

    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    #[error("Amount {0} cannot be represented by the gateway")]
    AmountOutOfRange(String),
}

/// Record store errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Errors surfaced to callers of the orchestrator.
///
/// Every validation gate raises exactly one of these before any network call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Unsupported gateway: {0}")]
    UnsupportedGateway(String),

    #[error("Payment method '{method}' is not supported by {}", gateway_label(.gateway))]
    UnsupportedMethod {
        method: String,
        gateway: Option<GatewayIdentity>,
    },

    #[error("{}", currency_unsupported(.requested, .secondary, .gateway))]
    CurrencyUnsupported {
        requested: CurrencyCode,
        secondary: Option<CurrencyCode>,
        gateway: GatewayIdentity,
    },

    #[error("Invalid conversion rate: {0}")]
    InvalidConversionRate(#[from] RateError),

    #[error("Could not generate a unique transaction ID after {attempts} attempts")]
    IdGenerationExhausted { attempts: u32 },

    #[error("{gateway} request failed{}: {body}", status_suffix(.status))]
    BackendRequestFailed {
        gateway: GatewayIdentity,
        status: Option<u16>,
        body: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<CurrencyError> for GatewayError {
    fn from(err: CurrencyError) -> Self {
        GatewayError::Domain(DomainError::InvalidCurrency(err))
    }
}

fn gateway_label(gateway: &Option<GatewayIdentity>) -> String {
    match gateway {
        Some(g) => g.to_string(),
        None => "any gateway".to_string(),
    }
}

fn currency_unsupported(
    requested: &CurrencyCode,
    secondary: &Option<CurrencyCode>,
    gateway: &GatewayIdentity,
) -> String {
    match secondary {
        Some(secondary) => {
            format!("Neither {requested} nor {secondary} is supported by {gateway}.")
        }
        None => format!("Currency '{requested}' is not supported by {gateway}."),
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad gateway: {message}")]
    BadGateway {
        message: String,
        provider_status: Option<u16>,
        provider_body: String,
    },

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::UnsupportedGateway(_)
            | GatewayError::UnsupportedMethod { .. }
            | GatewayError::CurrencyUnsupported { .. }
            | GatewayError::InvalidConversionRate(_)
            | GatewayError::Domain(_) => AppError::BadRequest(err.to_string()),
            GatewayError::IdGenerationExhausted { .. } => AppError::Unavailable(err.to_string()),
            GatewayError::BackendRequestFailed {
                gateway,
                status,
                body,
            } => AppError::BadGateway {
                message: format!("{gateway} request failed"),
                provider_status: status,
                provider_body: body,
            },
            GatewayError::Repository(RepoError::NotFound) => {
                AppError::NotFound("Transaction record not found".into())
            }
            GatewayError::Repository(e) => AppError::Internal(e.to_string()),
            GatewayError::Configuration(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_unsupported_message_names_both_currencies() {
        let err = GatewayError::CurrencyUnsupported {
            requested: CurrencyCode::IDR,
            secondary: Some(CurrencyCode::SGD),
            gateway: GatewayIdentity::Paymongo,
        };
        assert_eq!(
            err.to_string(),
            "Neither IDR nor SGD is supported by paymongo."
        );
    }

    #[test]
    fn test_backend_failure_message() {
        let err = GatewayError::BackendRequestFailed {
            gateway: GatewayIdentity::Xendit,
            status: Some(401),
            body: "{\"error_code\":\"INVALID_API_KEY\"}".into(),
        };
        assert!(err.to_string().starts_with("xendit request failed with status 401"));
    }

    #[test]
    fn test_app_error_mapping() {
        let bad = AppError::from(GatewayError::InvalidConversionRate(RateError::NonPositive(
            dec!(0),
        )));
        assert!(matches!(bad, AppError::BadRequest(_)));

        let exhausted = AppError::from(GatewayError::IdGenerationExhausted { attempts: 10 });
        assert!(matches!(exhausted, AppError::Unavailable(_)));

        let upstream = AppError::from(GatewayError::BackendRequestFailed {
            gateway: GatewayIdentity::Paymongo,
            status: Some(422),
            body: "nope".into(),
        });
        assert!(matches!(
            upstream,
            AppError::BadGateway {
                provider_status: Some(422),
                ..
            }
        ));

        let missing = AppError::from(GatewayError::Repository(RepoError::NotFound));
        assert!(matches!(missing, AppError::NotFound(_)));
    }
}
