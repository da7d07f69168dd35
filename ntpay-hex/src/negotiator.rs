//! Currency negotiation against a gateway's capability table.

use ntpay_types::{GatewayError, GatewayIdentity, Money, RateBook, capability};

/// Returns the money the gateway will actually be charged.
///
/// A supported currency passes through unchanged. Otherwise the amount is
/// converted once to the secondary currency, provided the gateway supports
/// it. The rate always reads preferred→secondary, whatever the requested
/// currency was.
pub fn negotiate(
    rates: &RateBook,
    requested: Money,
    gateway: GatewayIdentity,
) -> Result<Money, GatewayError> {
    if capability::supports_currency(gateway, requested.currency()) {
        return Ok(requested);
    }

    let secondary = rates.secondary();
    if !capability::supports_currency(gateway, secondary) {
        return Err(GatewayError::CurrencyUnsupported {
            requested: requested.currency(),
            secondary: Some(secondary),
            gateway,
        });
    }

    let converted = rates.convert(requested.amount())?;
    tracing::debug!(
        from = %requested,
        rate = ?rates.effective_rate(),
        to = %secondary,
        "converted to secondary currency"
    );
    Ok(Money::new(converted, secondary)?)
}
