//! Shared request plumbing for the real gateways.

use std::time::Duration;

use ntpay_types::{GatewayError, GatewayIdentity};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

use crate::config::GatewayCredentials;

/// Builds the client shared by every backend of an orchestrator.
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<Client, GatewayError> {
    let mut builder = Client::builder().user_agent(concat!("ntpay/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| GatewayError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// The configured secret, or a configuration error naming the gateway.
pub(super) fn secret_key(
    gateway: GatewayIdentity,
    credentials: &GatewayCredentials,
) -> Result<&Secret<String>, GatewayError> {
    credentials.secret_key.as_ref().ok_or_else(|| {
        GatewayError::Configuration(format!(
            "no secret key configured for {}",
            gateway.display_name()
        ))
    })
}

/// Joins a base URL and a path without doubling slashes.
pub(super) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// HTTP Basic with the secret as user name and an empty password.
pub(super) fn authorized(request: RequestBuilder, secret: &Secret<String>) -> RequestBuilder {
    request.basic_auth(secret.expose_secret(), Some(""))
}

/// Sends a request and decodes a JSON success body.
///
/// Transport errors, non-2xx statuses and undecodable bodies all surface as
/// `BackendRequestFailed`.
pub(super) async fn send_json(
    gateway: GatewayIdentity,
    request: RequestBuilder,
) -> Result<Value, GatewayError> {
    let response = request
        .send()
        .await
        .map_err(|e| GatewayError::BackendRequestFailed {
            gateway,
            status: e.status().map(|s| s.as_u16()),
            body: e.to_string(),
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::BackendRequestFailed {
            gateway,
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;

    tracing::debug!(%gateway, status = status.as_u16(), body = %body, "gateway response");

    if !status.is_success() {
        tracing::warn!(%gateway, status = status.as_u16(), "gateway rejected request");
        return Err(GatewayError::BackendRequestFailed {
            gateway,
            status: Some(status.as_u16()),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| GatewayError::BackendRequestFailed {
        gateway,
        status: Some(status.as_u16()),
        body: format!("invalid JSON body ({e}): {body}"),
    })
}
