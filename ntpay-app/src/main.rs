//! # NTPay Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the record store adapter
//! - Create the payment orchestrator
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ntpay_hex::{PaymentOrchestrator, inbound::HttpServer};
use ntpay_repo::build_repo;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing; the endpoint comes from
    // OTEL_EXPORTER_OTLP_ENDPOINT.
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("ntpay-gateway"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,ntpay_app=debug,ntpay_hex=debug".into());

    let otel_provider = match &config.otlp_endpoint {
        Some(_) => {
            let (otel_tracer, provider) = init_tracer()?;
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(tracing_opentelemetry::layer().with_tracer(otel_tracer))
                .init();
            Some(provider)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            None
        }
    };

    tracing::info!("Starting NTPay server on port {}", config.port);
    tracing::info!(
        test_mode = config.orchestrator.test_mode,
        default_gateway = %config.orchestrator.default_gateway,
        "gateway configuration loaded"
    );

    // Build record store (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;
    tracing::info!(store = repo.kind(), "record store ready");

    let orchestrator = PaymentOrchestrator::new(config.orchestrator, Arc::new(repo))?;

    let server = HttpServer::new(orchestrator);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
