//! The payment orchestrator.
//!
//! Validates a request against the capability table, negotiates its
//! currency, and routes it to a real gateway or to the simulation backend.

use std::sync::Arc;

use ntpay_types::{
    ChargeRequest, ConversionRate, CurrencyCode, GatewayError, GatewayIdentity, GatewaySummary,
    Money, PaymentBackend, PaymentDetailsResponse, PaymentMethod, PaymentRecord, PaymentRequest,
    PaymentResponse, PaymentStatusResponse, RateBook, RepoError, TransactionId,
    TransactionRecordStore, capability,
};
use rust_decimal::Decimal;

use crate::config::OrchestratorConfig;
use crate::negotiator::negotiate;
use crate::outbound::{PayMongoBackend, SimulationBackend, XenditBackend, build_client};
use crate::txid::TransactionIdGenerator;

/// Entry point for every caller-facing payment operation.
///
/// Generic over `S: TransactionRecordStore`, allowing different record store
/// implementations to be injected. Backends and store are shared between an
/// orchestrator and the sessions derived from it; the conversion-rate
/// override is not.
pub struct PaymentOrchestrator<S: TransactionRecordStore> {
    config: Arc<OrchestratorConfig>,
    store: Arc<S>,
    xendit: Arc<XenditBackend<S>>,
    paymongo: Arc<PayMongoBackend<S>>,
    simulation: Arc<SimulationBackend<S>>,
    rates: RateBook,
}

impl<S: TransactionRecordStore> PaymentOrchestrator<S> {
    pub fn new(config: OrchestratorConfig, store: Arc<S>) -> Result<Self, GatewayError> {
        config.validate()?;
        let client = build_client(config.http_timeout)?;
        let ids = Arc::new(
            TransactionIdGenerator::new(config.transaction_prefix.clone(), store.clone())
                .with_max_attempts(config.id_max_attempts),
        );

        let rates = RateBook::new(
            config.preferred_currency,
            config.secondary_currency,
            config.conversion_rate,
        );
        let xendit = Arc::new(XenditBackend::new(
            client.clone(),
            config.xendit.clone(),
            ids.clone(),
        ));
        let paymongo = Arc::new(PayMongoBackend::new(
            client,
            config.paymongo.clone(),
            ids.clone(),
        ));
        let simulation = Arc::new(SimulationBackend::new(ids));

        tracing::info!(
            default_gateway = %config.default_gateway,
            test_mode = config.test_mode,
            preferred = %config.preferred_currency,
            secondary = %config.secondary_currency,
            "payment orchestrator ready"
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            xendit,
            paymongo,
            simulation,
            rates,
        })
    }

    /// A fresh orchestrator sharing backends and store, with no rate override.
    pub fn session(&self) -> Self {
        Self {
            config: self.config.clone(),
            store: self.store.clone(),
            xendit: self.xendit.clone(),
            paymongo: self.paymongo.clone(),
            simulation: self.simulation.clone(),
            rates: self.rates.without_override(),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The gateway's own adapter.
    fn adapter(&self, gateway: GatewayIdentity) -> &dyn PaymentBackend {
        match gateway {
            GatewayIdentity::Xendit => self.xendit.as_ref(),
            GatewayIdentity::Paymongo => self.paymongo.as_ref(),
            GatewayIdentity::Test => self.simulation.as_ref(),
        }
    }

    /// The backend that actually handles traffic for `gateway`.
    fn dispatch_target(&self, gateway: GatewayIdentity) -> &dyn PaymentBackend {
        if self.config.test_mode {
            self.simulation.as_ref()
        } else {
            self.adapter(gateway)
        }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(gateway = ?request.gateway, currency = ?request.currency, amount = ?request.amount)
    )]
    pub async fn create_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentResponse, GatewayError> {
        let gateway = request.gateway.unwrap_or(self.config.default_gateway);
        let currency = request.currency.unwrap_or(self.rates.preferred());
        let method = request.payment_method.unwrap_or_default();
        let requested = Money::new(request.amount.unwrap_or(Decimal::ZERO), currency)?;

        let amount = negotiate(&self.rates, requested, gateway)?;

        if !capability::supports_method(gateway, method) {
            return Err(GatewayError::UnsupportedMethod {
                method: method.to_string(),
                gateway: Some(gateway),
            });
        }

        let backend = self.dispatch_target(gateway);
        let charge = ChargeRequest {
            gateway,
            amount,
            method,
            reference: request.reference,
            email: request.email,
        };
        let outcome = backend.charge(&charge).await?;

        if let Err(e) = self
            .store
            .record_charge(&outcome.transaction_id, outcome.status, amount)
            .await
        {
            tracing::error!(
                id = %outcome.transaction_id,
                error = %e,
                "charge accepted but could not be recorded"
            );
        }

        tracing::info!(
            id = %outcome.transaction_id,
            status = %outcome.status,
            amount = %amount,
            simulated = backend.is_simulated(),
            "payment created"
        );

        Ok(PaymentResponse {
            status: outcome.status,
            message: outcome.message,
            transaction_id: outcome.transaction_id,
            amount: amount.formatted(),
            currency: amount.currency(),
            gateway: gateway.upper_tag().to_string(),
            simulated: backend.is_simulated(),
            raw: outcome.payload,
        })
    }

    pub fn available_methods(&self, gateway: GatewayIdentity) -> &'static [PaymentMethod] {
        self.adapter(gateway).available_methods()
    }

    pub fn available_currencies(&self, gateway: GatewayIdentity) -> &'static [CurrencyCode] {
        self.adapter(gateway).available_currencies()
    }

    pub fn gateways(&self) -> Vec<GatewaySummary> {
        GatewayIdentity::all()
            .iter()
            .copied()
            .map(GatewaySummary::from)
            .collect()
    }

    pub fn conversion_rate(&self) -> ConversionRate {
        self.rates.current()
    }

    /// Overrides the conversion rate for this instance only.
    pub fn set_conversion_rate(&mut self, rate: Decimal) -> Result<(), GatewayError> {
        self.rates.set_override(rate)?;
        tracing::debug!(%rate, "conversion rate overridden");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn payment_details(
        &self,
        gateway: GatewayIdentity,
        reference: &str,
    ) -> Result<PaymentDetailsResponse, GatewayError> {
        let backend = self.dispatch_target(gateway);
        let details = backend.payment_details(gateway, reference).await?;
        Ok(PaymentDetailsResponse {
            gateway,
            reference: details.reference,
            status: details.status,
            simulated: backend.is_simulated(),
            details: details.payload,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn payment_status(
        &self,
        gateway: GatewayIdentity,
        reference: &str,
    ) -> Result<PaymentStatusResponse, GatewayError> {
        let details = self.payment_details(gateway, reference).await?;
        Ok(PaymentStatusResponse {
            gateway,
            reference: details.reference,
            status: details.status,
        })
    }

    /// Looks up the local record for one of our transaction IDs.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub async fn find_record(&self, id: &TransactionId) -> Result<PaymentRecord, GatewayError> {
        self.store
            .get(id)
            .await?
            .ok_or(GatewayError::Repository(RepoError::NotFound))
    }
}
