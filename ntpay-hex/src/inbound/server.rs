//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use ntpay_types::TransactionRecordStore;

use super::handlers::{self, AppState};
use crate::PaymentOrchestrator;

/// HTTP Server for the NTPay API.
pub struct HttpServer<S: TransactionRecordStore> {
    state: Arc<AppState<S>>,
}

impl<S: TransactionRecordStore> HttpServer<S> {
    pub fn new(orchestrator: PaymentOrchestrator<S>) -> Self {
        Self {
            state: Arc::new(AppState { orchestrator }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api-docs/openapi.json", get(handlers::openapi_json))
            .route("/api/payments", post(handlers::create_payment::<S>))
            .route(
                "/api/payments/{gateway}/{id}",
                get(handlers::payment_details::<S>),
            )
            .route(
                "/api/payments/{gateway}/{id}/status",
                get(handlers::payment_status::<S>),
            )
            .route("/api/gateways", get(handlers::gateways::<S>))
            .route(
                "/api/gateways/{gateway}/methods",
                get(handlers::available_methods::<S>),
            )
            .route(
                "/api/gateways/{gateway}/currencies",
                get(handlers::available_currencies::<S>),
            )
            .route("/api/conversion-rate", get(handlers::conversion_rate::<S>))
            .route(
                "/api/transactions/{id}",
                get(handlers::transaction_record::<S>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
