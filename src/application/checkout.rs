use super::alerts::{Alert, AlertSender};
use super::intent_slot::IntentSlot;
use super::payment_client::PaymentClient;
use crate::config::CheckoutSettings;
use crate::domain::amount::Amount;
use crate::domain::payment::{CardParams, ConfirmationResult, PaymentIntent, PaymentIntentRequest};
use crate::domain::ports::{BackendRef, PaymentSdkBox};
use crate::error::{CheckoutError, Result, ValidationError};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const TITLE_INVALID_AMOUNT: &str = "Invalid amount";
pub const TITLE_INVALID_CARD: &str = "Invalid card details";
pub const TITLE_REQUEST_FAILED: &str = "Request failed";
pub const TITLE_INTENT_FAILED: &str = "Failed to load PaymentIntent";
pub const TITLE_NOT_READY: &str = "Payment not ready";
pub const TITLE_SUCCEEDED: &str = "Payment succeeded";
pub const TITLE_FAILED: &str = "Payment failed";
pub const TITLE_ERROR: &str = "Error";

/// Progress of one of the two startup requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Pending,
    Ready,
    Failed,
}

impl Stage {
    pub fn is_settled(self) -> bool {
        matches!(self, Stage::Ready | Stage::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confirmation {
    #[default]
    NotStarted,
    InFlight,
    Succeeded,
    RequiresPaymentMethod,
    Error,
}

impl Confirmation {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Confirmation::Succeeded | Confirmation::RequiresPaymentMethod | Confirmation::Error
        )
    }
}

/// Snapshot of the checkout state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckoutStatus {
    pub amount: Option<Amount>,
    pub config: Stage,
    pub intent: Stage,
    pub confirmation: Confirmation,
}

impl CheckoutStatus {
    /// Whether the confirm action may be offered.
    pub fn can_confirm(&self) -> bool {
        confirm_guard(self).is_ok()
    }
}

fn confirm_guard(status: &CheckoutStatus) -> Result<()> {
    if status.confirmation != Confirmation::NotStarted {
        return Err(CheckoutError::AlreadyConfirmed);
    }
    match status.intent {
        Stage::Idle => return Err(CheckoutError::NotStarted),
        Stage::Pending => return Err(CheckoutError::IntentNotReady),
        Stage::Failed => return Err(CheckoutError::IntentUnavailable),
        Stage::Ready => {}
    }
    if status.config != Stage::Ready {
        return Err(CheckoutError::ConfigNotReady);
    }
    Ok(())
}

/// Drives a checkout from amount entry to the confirmation result.
///
/// Loads the payment configuration and the payment intent concurrently, guards
/// the confirm action until both are available, and reports every outcome as an
/// [`Alert`] on the UI channel.
pub struct CheckoutOrchestrator {
    backend: BackendRef,
    payments: PaymentClient,
    settings: CheckoutSettings,
    alerts: AlertSender,
    status: watch::Sender<CheckoutStatus>,
    intent: IntentSlot,
}

impl CheckoutOrchestrator {
    pub fn new(
        backend: BackendRef,
        sdk: PaymentSdkBox,
        settings: CheckoutSettings,
        alerts: AlertSender,
    ) -> Self {
        let (status, _) = watch::channel(CheckoutStatus::default());
        Self {
            backend,
            payments: PaymentClient::new(sdk),
            settings,
            alerts,
            status,
            intent: IntentSlot::new(),
        }
    }

    pub fn status(&self) -> CheckoutStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckoutStatus> {
        self.status.subscribe()
    }

    pub fn payment_client(&self) -> &PaymentClient {
        &self.payments
    }

    /// Validates the amount typed on the amount screen.
    pub fn submit_amount(&self, input: &str) -> Result<Amount, ValidationError> {
        match Amount::parse(input) {
            Ok(amount) => {
                info!(minor_units = amount.minor_units(), "amount accepted");
                self.status.send_modify(|s| s.amount = Some(amount));
                Ok(amount)
            }
            Err(err) => {
                self.alert(TITLE_INVALID_AMOUNT, err.to_string());
                Err(err)
            }
        }
    }

    /// Validates the card details typed on the checkout screen.
    pub fn enter_card(
        &self,
        number: &str,
        expiry: &str,
        cvc: &str,
    ) -> Result<CardParams, ValidationError> {
        CardParams::with_expiry(number, expiry, cvc).inspect_err(|err| {
            self.alert(TITLE_INVALID_CARD, err.to_string());
        })
    }

    /// Fetches the payment configuration ahead of the checkout screen.
    pub async fn prefetch_config(&self) {
        let claimed = self.status.send_if_modified(|s| {
            if s.config == Stage::Idle {
                s.config = Stage::Pending;
                true
            } else {
                false
            }
        });
        if claimed {
            self.load_config().await;
        }
    }

    /// Enters the checkout screen: requests the configuration and the payment
    /// intent concurrently on a background task.
    pub fn start(self: &Arc<Self>) -> Result<JoinHandle<()>> {
        let mut started = false;
        let mut needs_config = false;
        self.status.send_if_modified(|s| {
            if s.intent != Stage::Idle {
                return false;
            }
            started = true;
            s.intent = Stage::Pending;
            if matches!(s.config, Stage::Idle | Stage::Failed) {
                s.config = Stage::Pending;
                needs_config = true;
            }
            true
        });
        if !started {
            return Err(CheckoutError::AlreadyStarted);
        }

        info!("checkout started");
        let this = Arc::clone(self);
        Ok(tokio::spawn(async move {
            let config = async {
                if needs_config {
                    this.load_config().await;
                }
            };
            tokio::join!(config, this.load_intent());
        }))
    }

    async fn load_config(&self) {
        match self.backend.fetch_config().await {
            Ok(config) => {
                self.payments.initialize(&config).await;
                info!("payment configuration ready");
                self.status.send_modify(|s| s.config = Stage::Ready);
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch payment configuration");
                self.alert(TITLE_REQUEST_FAILED, format!("Error: {err}"));
                self.status.send_modify(|s| s.config = Stage::Failed);
            }
        }
    }

    async fn load_intent(&self) {
        let mut request = PaymentIntentRequest::new(
            &self.settings.payment_method_type,
            &self.settings.currency,
        );
        let amount = self.status.borrow().amount;
        if let Some(amount) = amount {
            request = request.with_amount(amount.minor_units());
        }

        let handle = match self.backend.create_payment_intent(&request).await {
            Ok(handle) => handle,
            Err(err) => {
                warn!(error = %err, "failed to create payment intent");
                self.alert(TITLE_INTENT_FAILED, format!("Error: {err}"));
                self.status.send_modify(|s| s.intent = Stage::Failed);
                return;
            }
        };

        match self.intent.fill(handle).await {
            Ok(()) => {
                info!("payment intent ready");
                self.status.send_modify(|s| s.intent = Stage::Ready);
            }
            Err(err) => warn!(error = %err, "discarding a second payment intent"),
        }
    }

    /// Confirms the payment with the entered card.
    ///
    /// Refuses with a guard error, and without calling the SDK, unless the
    /// configuration and the payment intent are both loaded and no attempt has
    /// been made yet.
    pub async fn confirm(&self, card: &CardParams) -> Result<PaymentIntent> {
        let mut guard = Ok(());
        self.status.send_if_modified(|s| {
            guard = confirm_guard(s);
            if guard.is_ok() {
                s.confirmation = Confirmation::InFlight;
            }
            guard.is_ok()
        });
        if let Err(err) = guard {
            return Err(self.reject(err));
        }

        let handle = match self.intent.take().await {
            Ok(handle) => handle,
            Err(err) => {
                self.status
                    .send_modify(|s| s.confirmation = Confirmation::NotStarted);
                return Err(self.reject(err));
            }
        };

        info!("confirmation in flight");
        match self.payments.confirm_payment(card, handle).await {
            Ok(result) => self.finish(result),
            Err(err) => {
                self.alert(TITLE_ERROR, err.to_string());
                self.status
                    .send_modify(|s| s.confirmation = Confirmation::Error);
                Err(err)
            }
        }
    }

    /// Waits for both startup requests to settle, then confirms.
    pub async fn confirm_when_ready(&self, card: &CardParams) -> Result<PaymentIntent> {
        let mut status = self.subscribe();
        let not_started = status.borrow().intent == Stage::Idle;
        if not_started {
            return Err(self.reject(CheckoutError::NotStarted));
        }
        let settled = status
            .wait_for(|s| s.config.is_settled() && s.intent.is_settled())
            .await
            .is_ok();
        if !settled {
            return Err(self.reject(CheckoutError::NotStarted));
        }
        self.confirm(card).await
    }

    fn finish(&self, result: ConfirmationResult) -> Result<PaymentIntent> {
        let (confirmation, title, message) = match &result {
            ConfirmationResult::Succeeded(intent) => (
                Confirmation::Succeeded,
                TITLE_SUCCEEDED,
                describe_intent(intent),
            ),
            ConfirmationResult::RequiresNewPaymentMethod(message) => (
                Confirmation::RequiresPaymentMethod,
                TITLE_FAILED,
                message.clone().unwrap_or_default(),
            ),
            ConfirmationResult::Failed(error) => (Confirmation::Error, TITLE_ERROR, error.clone()),
        };

        info!(outcome = ?confirmation, "confirmation finished");
        self.alert(title, message);
        self.status.send_modify(|s| s.confirmation = confirmation);
        result.into_result().map_err(CheckoutError::from)
    }

    fn reject(&self, err: CheckoutError) -> CheckoutError {
        warn!(error = %err, "confirm refused");
        self.alert(TITLE_NOT_READY, err.to_string());
        err
    }

    fn alert(&self, title: &str, message: String) {
        if self.alerts.send(Alert::new(title, message)).is_err() {
            warn!(title, "alert dropped, UI is gone");
        }
    }
}

fn describe_intent(intent: &PaymentIntent) -> String {
    serde_json::to_string_pretty(intent).unwrap_or_else(|_| format!("{intent:#?}"))
}
