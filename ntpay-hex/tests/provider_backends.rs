//! Live-mode backends against a fake provider on localhost.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use ntpay_hex::{GatewayCredentials, OrchestratorConfig, PaymentOrchestrator};
use ntpay_repo::InMemoryRepo;
use ntpay_types::{
    CurrencyCode, GatewayError, GatewayIdentity, PaymentMethod, PaymentRequest, PaymentStatus,
    RecordStatus, TransactionRecordStore,
};

const XENDIT_AUTH: &str = "Basic eG5kX2RldmVsb3BtZW50X2tleTo=";
const PAYMONGO_AUTH: &str = "Basic c2tfdGVzdF9wYXltb25nbzo=";

#[derive(Debug, Clone)]
struct Captured {
    path: String,
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct Provider {
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl Provider {
    fn capture(&self, path: &str, headers: &HeaderMap, body: Value) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(Captured {
            path: path.to_string(),
            authorization,
            body,
        });
    }

    fn last(&self) -> Captured {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

async fn create_invoice(
    State(provider): State<Provider>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    provider.capture("/v2/invoices", &headers, body.clone());
    Json(json!({
        "id": "inv_001",
        "external_id": body["external_id"],
        "status": "PENDING",
        "invoice_url": "https://checkout.example/inv_001",
    }))
}

async fn get_invoice(
    State(provider): State<Provider>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    provider.capture(&format!("/v2/invoices/{id}"), &headers, Value::Null);
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error_code": "INVOICE_NOT_FOUND_ERROR" })),
        );
    }
    (StatusCode::OK, Json(json!({ "id": id, "status": "PAID" })))
}

async fn create_intent(
    State(provider): State<Provider>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    provider.capture("/payment_intents", &headers, body);
    Json(json!({
        "data": {
            "id": "pi_001",
            "type": "payment_intent",
            "attributes": { "status": "awaiting_payment_method" }
        }
    }))
}

async fn get_payment(
    State(provider): State<Provider>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Json<Value> {
    provider.capture(&format!("/payments/{id}"), &headers, Value::Null);
    Json(json!({ "data": { "id": id, "attributes": { "status": "paid" } } }))
}

async fn spawn_provider() -> (String, Provider) {
    let provider = Provider::default();
    let app = Router::new()
        .route("/v2/invoices", post(create_invoice))
        .route("/v2/invoices/{id}", get(get_invoice))
        .route("/payment_intents", post(create_intent))
        .route("/payments/{id}", get(get_payment))
        .with_state(provider.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), provider)
}

fn live_config(base_url: &str) -> OrchestratorConfig {
    OrchestratorConfig {
        test_mode: false,
        xendit: GatewayCredentials::new(base_url).with_secret("xnd_development_key"),
        paymongo: GatewayCredentials::new(base_url).with_secret("sk_test_paymongo"),
        ..OrchestratorConfig::default()
    }
}

#[tokio::test]
async fn test_xendit_invoice_request() {
    let (base_url, provider) = spawn_provider().await;
    let store = Arc::new(InMemoryRepo::new());
    let orchestrator = PaymentOrchestrator::new(live_config(&base_url), store.clone()).unwrap();

    let response = orchestrator
        .create_payment(
            PaymentRequest::new(dec!(1000.75))
                .with_currency(CurrencyCode::USD)
                .with_gateway(GatewayIdentity::Xendit)
                .with_email("payer@example.com"),
        )
        .await
        .unwrap();

    assert_eq!(response.status, PaymentStatus::Pending);
    assert!(!response.simulated);
    assert_eq!(response.raw["invoice_url"], "https://checkout.example/inv_001");

    let captured = provider.last();
    assert_eq!(captured.path, "/v2/invoices");
    assert_eq!(captured.authorization.as_deref(), Some(XENDIT_AUTH));
    assert_eq!(captured.body["external_id"], response.transaction_id.as_str());
    assert_eq!(captured.body["amount"], 1000);
    assert_eq!(captured.body["currency"], "USD");
    assert_eq!(captured.body["payer_email"], "payer@example.com");

    let record = store.get(&response.transaction_id).await.unwrap().unwrap();
    assert_eq!(record.status, RecordStatus::Pending);
}

#[tokio::test]
async fn test_paymongo_intent_request_in_minor_units() {
    let (base_url, provider) = spawn_provider().await;
    let orchestrator =
        PaymentOrchestrator::new(live_config(&base_url), Arc::new(InMemoryRepo::new())).unwrap();

    let response = orchestrator
        .create_payment(
            PaymentRequest::new(dec!(100))
                .with_gateway(GatewayIdentity::Paymongo)
                .with_method(PaymentMethod::Ewallet)
                .with_reference("order-42"),
        )
        .await
        .unwrap();

    assert_eq!(response.currency, CurrencyCode::PHP);
    assert_eq!(response.amount, "5,430.00 PHP");
    assert_eq!(response.status, PaymentStatus::Pending);

    let captured = provider.last();
    assert_eq!(captured.path, "/payment_intents");
    assert_eq!(captured.authorization.as_deref(), Some(PAYMONGO_AUTH));

    let attributes = &captured.body["data"]["attributes"];
    assert_eq!(attributes["amount"], 543_000);
    assert_eq!(attributes["currency"], "PHP");
    assert_eq!(
        attributes["payment_method_allowed"],
        json!(["credit_card", "ewallet"])
    );
    assert_eq!(
        attributes["metadata"]["transaction_id"],
        response.transaction_id.as_str()
    );
    assert_eq!(attributes["metadata"]["reference"], "order-42");
}

#[tokio::test]
async fn test_provider_status_normalized() {
    let (base_url, provider) = spawn_provider().await;
    let orchestrator =
        PaymentOrchestrator::new(live_config(&base_url), Arc::new(InMemoryRepo::new())).unwrap();

    let xendit = orchestrator
        .payment_status(GatewayIdentity::Xendit, "inv_001")
        .await
        .unwrap();
    assert_eq!(xendit.status, PaymentStatus::Success);
    assert_eq!(provider.last().path, "/v2/invoices/inv_001");

    let paymongo = orchestrator
        .payment_details(GatewayIdentity::Paymongo, "pay_001")
        .await
        .unwrap();
    assert_eq!(paymongo.status, PaymentStatus::Success);
    assert!(!paymongo.simulated);
    assert_eq!(provider.last().authorization.as_deref(), Some(PAYMONGO_AUTH));
}

#[tokio::test]
async fn test_provider_rejection_surfaces_status_and_body() {
    let (base_url, _provider) = spawn_provider().await;
    let orchestrator =
        PaymentOrchestrator::new(live_config(&base_url), Arc::new(InMemoryRepo::new())).unwrap();

    let err = orchestrator
        .payment_details(GatewayIdentity::Xendit, "missing")
        .await
        .unwrap_err();

    match err {
        GatewayError::BackendRequestFailed {
            gateway,
            status,
            body,
        } => {
            assert_eq!(gateway, GatewayIdentity::Xendit);
            assert_eq!(status, Some(404));
            assert!(body.contains("INVOICE_NOT_FOUND_ERROR"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_provider_leaves_reservation() {
    let store = Arc::new(InMemoryRepo::new());
    let orchestrator =
        PaymentOrchestrator::new(live_config("http://127.0.0.1:9"), store.clone()).unwrap();

    let err = orchestrator
        .create_payment(PaymentRequest::new(dec!(10)).with_gateway(GatewayIdentity::Xendit))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GatewayError::BackendRequestFailed { status: None, .. }
    ));
    assert_eq!(store.len(), 1);
}
