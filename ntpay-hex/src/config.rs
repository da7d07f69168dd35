//! Orchestrator configuration.
//!
//! Values come from an explicit struct; `from_env` is a convenience that
//! fills it from process environment variables.

use std::time::Duration;

use ntpay_types::{CurrencyCode, GatewayError, GatewayIdentity};
use rust_decimal::Decimal;
use secrecy::Secret;

pub const DEFAULT_PREFIX: &str = "NTP";
pub const DEFAULT_XENDIT_URL: &str = "https://api.xendit.co";
pub const DEFAULT_PAYMONGO_URL: &str = "https://api.paymongo.com/v1";
pub const DEFAULT_ID_MAX_ATTEMPTS: u32 = 10;

/// Credentials and endpoint for one real gateway.
#[derive(Clone, Debug)]
pub struct GatewayCredentials {
    pub secret_key: Option<Secret<String>>,
    pub base_url: String,
}

impl GatewayCredentials {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            secret_key: None,
            base_url: base_url.into(),
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret_key = Some(Secret::new(secret.into()));
        self
    }
}

#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Upper-cased alphanumeric prefix of every transaction ID.
    pub transaction_prefix: String,
    pub preferred_currency: CurrencyCode,
    pub secondary_currency: CurrencyCode,
    /// Static preferred→secondary rate; `None` leaves conversions impossible
    /// until an override is set.
    pub conversion_rate: Option<Decimal>,
    pub default_gateway: GatewayIdentity,
    /// Routes every gateway to the simulation backend.
    pub test_mode: bool,
    pub xendit: GatewayCredentials,
    pub paymongo: GatewayCredentials,
    pub http_timeout: Option<Duration>,
    pub id_max_attempts: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            transaction_prefix: DEFAULT_PREFIX.to_string(),
            preferred_currency: CurrencyCode::USD,
            secondary_currency: CurrencyCode::PHP,
            conversion_rate: Some(Decimal::new(5430, 2)),
            default_gateway: GatewayIdentity::Xendit,
            test_mode: true,
            xendit: GatewayCredentials::new(DEFAULT_XENDIT_URL),
            paymongo: GatewayCredentials::new(DEFAULT_PAYMONGO_URL),
            http_timeout: None,
            id_max_attempts: DEFAULT_ID_MAX_ATTEMPTS,
        }
    }
}

impl OrchestratorConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Unset or blank keys keep their defaults, except the conversion rate,
    /// where a blank value means "no static rate".
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let non_blank = |key: &str| get(key).filter(|v| !v.is_empty());

        let mut config = Self::default();

        if let Some(prefix) = non_blank("NTPAYMENTS_TRANSACTION_PREFIX") {
            config.transaction_prefix = prefix.to_ascii_uppercase();
        }
        if let Some(code) = non_blank("NTPAYMENTS_PREFERRED_CURRENCY") {
            config.preferred_currency = CurrencyCode::parse(&code)?;
        }
        if let Some(code) = non_blank("NTPAYMENTS_SECONDARY_CURRENCY") {
            config.secondary_currency = CurrencyCode::parse(&code)?;
        }
        if let Some(raw) = get("NTPAYMENTS_CONVERSION_RATE") {
            config.conversion_rate = if raw.is_empty() {
                None
            } else {
                Some(raw.parse::<Decimal>().map_err(|e| {
                    GatewayError::Configuration(format!(
                        "NTPAYMENTS_CONVERSION_RATE is not a decimal: {e}"
                    ))
                })?)
            };
        }
        if let Some(tag) = non_blank("PAYMENT_GATEWAY") {
            config.default_gateway = tag.parse()?;
        }
        if let Some(flag) = non_blank("NTPAYMENTS_TEST_MODE") {
            config.test_mode = parse_flag("NTPAYMENTS_TEST_MODE", &flag)?;
        }
        if let Some(secret) = non_blank("XENDIT_SECRET_KEY") {
            config.xendit.secret_key = Some(Secret::new(secret));
        }
        if let Some(url) = non_blank("XENDIT_API_URL") {
            config.xendit.base_url = url;
        }
        if let Some(secret) = non_blank("PAYMONGO_SECRET_KEY") {
            config.paymongo.secret_key = Some(Secret::new(secret));
        }
        if let Some(url) = non_blank("PAYMONGO_API_URL") {
            config.paymongo.base_url = url;
        }
        if let Some(secs) = non_blank("NTPAYMENTS_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                GatewayError::Configuration(format!(
                    "NTPAYMENTS_HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{secs}'"
                ))
            })?;
            config.http_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(attempts) = non_blank("NTPAYMENTS_ID_MAX_ATTEMPTS") {
            config.id_max_attempts = attempts.parse().map_err(|_| {
                GatewayError::Configuration(format!(
                    "NTPAYMENTS_ID_MAX_ATTEMPTS must be a positive integer, got '{attempts}'"
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.transaction_prefix.is_empty()
            || !self
                .transaction_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(GatewayError::Configuration(format!(
                "transaction prefix must be non-empty and alphanumeric, got '{}'",
                self.transaction_prefix
            )));
        }
        if self.id_max_attempts == 0 {
            return Err(GatewayError::Configuration(
                "transaction ID attempt cap must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, GatewayError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(GatewayError::Configuration(format!(
            "{key} must be a boolean, got '{value}'"
        ))),
    }
}
