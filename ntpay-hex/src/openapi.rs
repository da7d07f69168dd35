//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use ntpay_types::domain::{GatewayIdentity, PaymentMethod, PaymentStatus, RecordStatus, TransactionId};
use ntpay_types::dto::{
    CreatePaymentRequest, CurrenciesResponse, ErrorResponse, GatewaySummary, MethodsResponse,
    PaymentDetailsResponse, PaymentResponse, PaymentStatusResponse, TransactionRecordResponse,
};
use ntpay_types::ConversionRate;
use utoipa::OpenApi;

// Documentation stubs; the real handlers live in `inbound::handlers`.

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Charge a payment
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Charge accepted", body = PaymentResponse),
        (status = 400, description = "Unsupported gateway, currency or method, or invalid rate", body = ErrorResponse),
        (status = 502, description = "Gateway rejected the request", body = ErrorResponse),
        (status = 503, description = "No unique transaction ID could be generated", body = ErrorResponse)
    )
)]
async fn create_payment() {}

/// Fetch payment details from the gateway
#[utoipa::path(
    get,
    path = "/api/payments/{gateway}/{id}",
    tag = "payments",
    params(
        ("gateway" = String, Path, description = "Gateway tag (xendit, paymongo, test)"),
        ("id" = String, Path, description = "Provider or transaction reference")
    ),
    responses(
        (status = 200, description = "Payment details", body = PaymentDetailsResponse),
        (status = 400, description = "Unsupported gateway", body = ErrorResponse),
        (status = 502, description = "Gateway lookup failed", body = ErrorResponse)
    )
)]
async fn payment_details() {}

/// Normalized payment status
#[utoipa::path(
    get,
    path = "/api/payments/{gateway}/{id}/status",
    tag = "payments",
    params(
        ("gateway" = String, Path, description = "Gateway tag"),
        ("id" = String, Path, description = "Provider or transaction reference")
    ),
    responses(
        (status = 200, description = "Payment status", body = PaymentStatusResponse),
        (status = 502, description = "Gateway lookup failed", body = ErrorResponse)
    )
)]
async fn payment_status() {}

/// List all gateways with their capabilities
#[utoipa::path(
    get,
    path = "/api/gateways",
    tag = "gateways",
    responses(
        (status = 200, description = "Gateway catalogue", body = Vec<GatewaySummary>)
    )
)]
async fn gateways() {}

/// Payment methods a gateway accepts
#[utoipa::path(
    get,
    path = "/api/gateways/{gateway}/methods",
    tag = "gateways",
    params(("gateway" = String, Path, description = "Gateway tag")),
    responses(
        (status = 200, description = "Supported methods", body = MethodsResponse),
        (status = 400, description = "Unsupported gateway", body = ErrorResponse)
    )
)]
async fn available_methods() {}

/// Currencies a gateway can charge in
#[utoipa::path(
    get,
    path = "/api/gateways/{gateway}/currencies",
    tag = "gateways",
    params(("gateway" = String, Path, description = "Gateway tag")),
    responses(
        (status = 200, description = "Supported currencies", body = CurrenciesResponse),
        (status = 400, description = "Unsupported gateway", body = ErrorResponse)
    )
)]
async fn available_currencies() {}

/// Conversion rate currently in effect
#[utoipa::path(
    get,
    path = "/api/conversion-rate",
    tag = "rates",
    responses(
        (status = 200, description = "Preferred to secondary rate", body = ConversionRate)
    )
)]
async fn conversion_rate() {}

/// Local record of a transaction ID
#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    tag = "transactions",
    params(("id" = String, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Stored record", body = TransactionRecordResponse),
        (status = 404, description = "Unknown transaction ID", body = ErrorResponse)
    )
)]
async fn transaction_record() {}

/// OpenAPI documentation for the NTPay API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NTPay Gateway Orchestrator API",
        version = "0.1.0",
        description = "Charges payments through Xendit, PayMongo or a simulation backend, with per-gateway capability checks and one-level currency fallback.",
        license(name = "MIT"),
    ),
    paths(
        health,
        create_payment,
        payment_details,
        payment_status,
        gateways,
        available_methods,
        available_currencies,
        conversion_rate,
        transaction_record,
    ),
    components(
        schemas(
            CreatePaymentRequest,
            PaymentResponse,
            PaymentDetailsResponse,
            PaymentStatusResponse,
            MethodsResponse,
            CurrenciesResponse,
            GatewaySummary,
            TransactionRecordResponse,
            ErrorResponse,
            ConversionRate,
            GatewayIdentity,
            PaymentMethod,
            PaymentStatus,
            RecordStatus,
            TransactionId,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "payments", description = "Charges and provider lookups"),
        (name = "gateways", description = "Gateway capability tables"),
        (name = "rates", description = "Currency conversion"),
        (name = "transactions", description = "Locally recorded transaction IDs"),
    )
)]
pub struct ApiDoc;
