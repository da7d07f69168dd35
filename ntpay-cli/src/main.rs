//! NTPay CLI
//!
//! Runs the payment orchestrator in-process against a record store.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use ntpay_hex::{OrchestratorConfig, PaymentOrchestrator};
use ntpay_repo::{Repo, build_repo};
use ntpay_types::{
    CurrenciesResponse, CurrencyCode, GatewayIdentity, MethodsResponse, PaymentMethod,
    PaymentRequest, TransactionId, TransactionRecordResponse,
};

#[derive(Parser)]
#[command(name = "ntpay")]
#[command(author, version, about = "NTPay gateway orchestrator CLI", long_about = None)]
struct Cli {
    /// Record store URL (memory://, sqlite://..., postgres://...)
    #[arg(long, env = "DATABASE_URL", default_value = "memory://")]
    database_url: String,

    /// Talk to the real gateways instead of the simulation backend
    #[arg(long)]
    live: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Charge a payment
    Charge {
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        currency: Option<CurrencyCode>,
        /// Gateway tag (xendit, paymongo, test)
        #[arg(long)]
        gateway: Option<GatewayIdentity>,
        #[arg(long)]
        method: Option<PaymentMethod>,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Conversion rate for this charge only
        #[arg(long)]
        rate: Option<Decimal>,
    },
    /// Fetch provider details of a payment
    Details {
        gateway: GatewayIdentity,
        reference: String,
    },
    /// Fetch the normalized status of a payment
    Status {
        gateway: GatewayIdentity,
        reference: String,
    },
    /// List the payment methods a gateway accepts
    Methods { gateway: GatewayIdentity },
    /// List the currencies a gateway charges in
    Currencies { gateway: GatewayIdentity },
    /// Show the conversion rate in effect
    Rate,
    /// List every gateway with its capabilities
    Gateways,
    /// Look up a local transaction record
    Record { id: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn orchestrator(cli: &Cli) -> Result<PaymentOrchestrator<Repo>> {
    let mut config = OrchestratorConfig::from_env()?;
    if cli.live {
        config.test_mode = false;
    }
    let repo = build_repo(&cli.database_url).await?;
    Ok(PaymentOrchestrator::new(config, Arc::new(repo))?)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut orchestrator = orchestrator(&cli).await?;

    match cli.command {
        Commands::Charge {
            amount,
            currency,
            gateway,
            method,
            reference,
            email,
            rate,
        } => {
            if let Some(rate) = rate {
                orchestrator.set_conversion_rate(rate)?;
            }
            let request = PaymentRequest {
                amount: Some(amount),
                currency,
                gateway,
                payment_method: method,
                reference,
                email,
            };
            print_json(&orchestrator.create_payment(request).await?)?;
        }

        Commands::Details { gateway, reference } => {
            print_json(&orchestrator.payment_details(gateway, &reference).await?)?;
        }

        Commands::Status { gateway, reference } => {
            print_json(&orchestrator.payment_status(gateway, &reference).await?)?;
        }

        Commands::Methods { gateway } => {
            print_json(&MethodsResponse {
                gateway,
                methods: orchestrator.available_methods(gateway).to_vec(),
            })?;
        }

        Commands::Currencies { gateway } => {
            print_json(&CurrenciesResponse {
                gateway,
                currencies: orchestrator.available_currencies(gateway).to_vec(),
            })?;
        }

        Commands::Rate => print_json(&orchestrator.conversion_rate())?,

        Commands::Gateways => print_json(&orchestrator.gateways())?,

        Commands::Record { id } => {
            let record = orchestrator.find_record(&TransactionId::from(id)).await?;
            print_json(&TransactionRecordResponse::from(record))?;
        }
    }

    Ok(())
}
