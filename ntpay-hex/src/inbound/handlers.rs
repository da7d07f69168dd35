//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use ntpay_types::{
    AppError, CreatePaymentRequest, CurrenciesResponse, ErrorResponse, GatewayError,
    GatewayIdentity, MethodsResponse, PaymentRequest, TransactionId, TransactionRecordResponse,
    TransactionRecordStore,
};

use crate::PaymentOrchestrator;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<S: TransactionRecordStore> {
    pub orchestrator: PaymentOrchestrator<S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err.into())
    }
}

/// Malformed or undecodable request bodies are validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AppError::BadRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, provider_status, provider_body) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None, None),
            AppError::BadGateway {
                message,
                provider_status,
                provider_body,
            } => (
                StatusCode::BAD_GATEWAY,
                message,
                provider_status,
                Some(provider_body),
            ),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg, None, None),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None, None)
            }
        };

        let body = ErrorResponse {
            error,
            code: status.as_u16(),
            provider_status,
            provider_body,
        };

        (status, Json(body)).into_response()
    }
}

fn parse_gateway(tag: &str) -> Result<GatewayIdentity, ApiError> {
    Ok(tag.parse::<GatewayIdentity>()?)
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Charge a payment. A `conversion_rate` in the body applies to this
/// request only.
#[tracing::instrument(skip(state, body))]
pub async fn create_payment<S: TransactionRecordStore>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    tracing::debug!(gateway = ?req.gateway, currency = ?req.currency, "payment requested");
    let rate_override = req.conversion_rate;
    let request = PaymentRequest::try_from(req)?;

    let response = match rate_override {
        Some(rate) => {
            let mut session = state.orchestrator.session();
            session.set_conversion_rate(rate)?;
            session.create_payment(request).await?
        }
        None => state.orchestrator.create_payment(request).await?,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

#[tracing::instrument(skip(state))]
pub async fn payment_details<S: TransactionRecordStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((gateway, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let gateway = parse_gateway(&gateway)?;
    let details = state.orchestrator.payment_details(gateway, &id).await?;
    Ok(Json(details))
}

#[tracing::instrument(skip(state))]
pub async fn payment_status<S: TransactionRecordStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((gateway, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let gateway = parse_gateway(&gateway)?;
    let status = state.orchestrator.payment_status(gateway, &id).await?;
    Ok(Json(status))
}

pub async fn gateways<S: TransactionRecordStore>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    Json(state.orchestrator.gateways())
}

#[tracing::instrument(skip(state))]
pub async fn available_methods<S: TransactionRecordStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(gateway): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let gateway = parse_gateway(&gateway)?;
    Ok(Json(MethodsResponse {
        gateway,
        methods: state.orchestrator.available_methods(gateway).to_vec(),
    }))
}

#[tracing::instrument(skip(state))]
pub async fn available_currencies<S: TransactionRecordStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(gateway): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let gateway = parse_gateway(&gateway)?;
    Ok(Json(CurrenciesResponse {
        gateway,
        currencies: state.orchestrator.available_currencies(gateway).to_vec(),
    }))
}

pub async fn conversion_rate<S: TransactionRecordStore>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    Json(state.orchestrator.conversion_rate())
}

/// Local record lookup for one of our transaction IDs.
#[tracing::instrument(skip(state), fields(id = %id))]
pub async fn transaction_record<S: TransactionRecordStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .orchestrator
        .find_record(&TransactionId::from(id))
        .await?;
    Ok(Json(TransactionRecordResponse::from(record)))
}
