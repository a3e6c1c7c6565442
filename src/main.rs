use card_checkout::application::alerts::{Alert, AlertSender, alert_channel};
use card_checkout::application::checkout::{CheckoutOrchestrator, TITLE_REQUEST_FAILED};
use card_checkout::config::{CheckoutSettings, DEFAULT_BACKEND_URL};
use card_checkout::domain::payment::PaymentIntent;
use card_checkout::domain::ports::BackendRef;
use card_checkout::error::CheckoutError;
use card_checkout::infrastructure::http_backend::HttpBackend;
use card_checkout::infrastructure::simulated_sdk::SimulatedSdk;
use card_checkout::interfaces::console::AlertPresenter;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the merchant backend
    #[arg(long, env = "CHECKOUT_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend_url: Url,

    /// Payment amount, e.g. 12.50
    #[arg(long)]
    amount: String,

    /// Card number
    #[arg(long)]
    card: String,

    /// Card expiry
    #[arg(long, value_name = "MM/YY")]
    exp: String,

    /// Card security code
    #[arg(long)]
    cvc: String,

    /// Abort backend requests after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let (alerts, alert_rx) = alert_channel();

    // Alerts are rendered here, on the main task, wherever they were raised.
    let checkout = tokio::spawn(run_checkout(cli, alerts));
    let mut presenter = AlertPresenter::new(io::stdout());
    presenter.run(alert_rx).await.into_diagnostic()?;

    checkout.await.into_diagnostic()?.into_diagnostic()?;
    Ok(())
}

async fn run_checkout(cli: Cli, alerts: AlertSender) -> Result<PaymentIntent, CheckoutError> {
    let mut settings = CheckoutSettings::new(cli.backend_url);
    if let Some(secs) = cli.timeout_secs {
        settings = settings.with_request_timeout(Duration::from_secs(secs));
    }

    let backend: BackendRef = match HttpBackend::new(&settings) {
        Ok(backend) => Arc::new(backend),
        Err(err) => {
            if alerts
                .send(Alert::new(TITLE_REQUEST_FAILED, format!("Error: {err}")))
                .is_err()
            {
                warn!("alert dropped, UI is gone");
            }
            return Err(err.into());
        }
    };
    let orchestrator = Arc::new(CheckoutOrchestrator::new(
        backend,
        Box::new(SimulatedSdk::new()),
        settings,
        alerts,
    ));

    // Amount screen: the configuration loads while the amount is entered.
    let prefetch = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        async move { orchestrator.prefetch_config().await }
    });
    if let Err(err) = orchestrator.submit_amount(&cli.amount) {
        settle(prefetch, "configuration prefetch").await;
        return Err(err.into());
    }

    // Card screen
    let startup = orchestrator.start()?;
    let outcome = match orchestrator.enter_card(&cli.card, &cli.exp, &cli.cvc) {
        Ok(card) => orchestrator.confirm_when_ready(&card).await,
        Err(err) => Err(err.into()),
    };

    settle(prefetch, "configuration prefetch").await;
    settle(startup, "checkout startup").await;
    outcome
}

async fn settle(task: JoinHandle<()>, name: &str) {
    if let Err(err) = task.await {
        warn!(error = %err, task = name, "background task failed");
    }
}
