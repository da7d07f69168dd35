//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use ntpay_rates::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    GatewayIdentity, PaymentMethod, PaymentRecord, PaymentRequest, PaymentStatus, RecordStatus,
    TransactionId, capability,
};
use crate::error::GatewayError;

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to charge a payment.
///
/// Every field is optional; omitted values fall back to the orchestrator's
/// configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    /// Amount in major units
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "100.00")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    #[schema(example = "USD")]
    pub currency: Option<String>,
    #[serde(default)]
    #[schema(example = "xendit")]
    pub gateway: Option<String>,
    #[serde(default, alias = "payment_type")]
    #[schema(example = "credit_card")]
    pub payment_method: Option<String>,
    #[serde(default, alias = "reference_id", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "payer@example.com")]
    pub email: Option<String>,
    /// Conversion rate applied to this request only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "54.30")]
    pub conversion_rate: Option<Decimal>,
}

impl TryFrom<CreatePaymentRequest> for PaymentRequest {
    type Error = GatewayError;

    fn try_from(req: CreatePaymentRequest) -> Result<Self, Self::Error> {
        let gateway = req
            .gateway
            .as_deref()
            .map(capability::resolve)
            .transpose()?;
        let currency = req
            .currency
            .as_deref()
            .map(CurrencyCode::parse)
            .transpose()?;
        let payment_method = req
            .payment_method
            .as_deref()
            .map(|tag| {
                tag.parse::<PaymentMethod>()
                    .map_err(|_| GatewayError::UnsupportedMethod {
                        method: tag.to_string(),
                        gateway,
                    })
            })
            .transpose()?;

        Ok(PaymentRequest {
            amount: req.amount,
            currency,
            gateway,
            payment_method,
            reference: req.reference,
            email: req.email,
        })
    }
}

/// Normalized result of a charge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub status: PaymentStatus,
    #[schema(example = "Payment successfully processed on xendit (Test Mode).")]
    pub message: String,
    pub transaction_id: TransactionId,
    /// Charged amount, formatted with its currency code
    #[schema(example = "1,000.00 USD")]
    pub amount: String,
    #[schema(value_type = String, example = "USD")]
    pub currency: CurrencyCode,
    /// Upper-case gateway tag
    #[schema(example = "XENDIT")]
    pub gateway: String,
    /// True when the simulation backend handled the charge
    pub simulated: bool,
    /// Provider payload, passed through untouched
    #[schema(value_type = Object)]
    pub raw: serde_json::Value,
}

/// Provider-side view of an existing payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentDetailsResponse {
    pub gateway: GatewayIdentity,
    pub reference: String,
    pub status: PaymentStatus,
    pub simulated: bool,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentStatusResponse {
    pub gateway: GatewayIdentity,
    pub reference: String,
    pub status: PaymentStatus,
}

// ─────────────────────────────────────────────────────────────────────────────
// Capability DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MethodsResponse {
    pub gateway: GatewayIdentity,
    pub methods: Vec<PaymentMethod>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrenciesResponse {
    pub gateway: GatewayIdentity,
    #[schema(value_type = Vec<String>, example = json!(["PHP"]))]
    pub currencies: Vec<CurrencyCode>,
}

/// One row of the gateway catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GatewaySummary {
    pub gateway: GatewayIdentity,
    #[schema(example = "PayMongo")]
    pub name: String,
    #[schema(value_type = Vec<String>)]
    pub currencies: Vec<CurrencyCode>,
    pub methods: Vec<PaymentMethod>,
}

impl From<GatewayIdentity> for GatewaySummary {
    fn from(gateway: GatewayIdentity) -> Self {
        Self {
            gateway,
            name: gateway.display_name().to_string(),
            currencies: capability::currencies(gateway).to_vec(),
            methods: capability::methods(gateway).to_vec(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Record DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Locally stored record of a transaction ID.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionRecordResponse {
    pub transaction_id: TransactionId,
    pub gateway: GatewayIdentity,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "54,300.00 PHP")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub currency: Option<CurrencyCode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentRecord> for TransactionRecordResponse {
    fn from(record: PaymentRecord) -> Self {
        Self {
            transaction_id: record.transaction_id,
            gateway: record.gateway,
            status: record.status,
            amount: record.amount.map(|m| m.formatted()),
            currency: record.amount.map(|m| m.currency()),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[schema(example = 400)]
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_body: Option<String>,
}
