//! Configuration loading from environment.

use std::env;

use ntpay_hex::OrchestratorConfig;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// OTLP collector; span export is off when unset.
    pub otlp_endpoint: Option<String>,
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "memory://".to_string());
        let otlp_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let orchestrator = OrchestratorConfig::from_env()?;

        Ok(Self {
            port,
            database_url,
            otlp_endpoint,
            orchestrator,
        })
    }
}
