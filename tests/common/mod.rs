#![allow(dead_code)]

use async_trait::async_trait;
use card_checkout::application::alerts::{Alert, AlertReceiver, alert_channel};
use card_checkout::application::checkout::CheckoutOrchestrator;
use card_checkout::config::CheckoutSettings;
use card_checkout::domain::payment::{
    BackendConfig, CardParams, ConfirmationResult, IntentStatus, PaymentIntent,
    PaymentIntentHandle, PaymentIntentRequest,
};
use card_checkout::domain::ports::{Backend, PaymentSdk};
use card_checkout::error::ConnectionError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Backend answering from canned results. The intent response can be held
/// back until [`StubBackend::release_intent`] is called.
pub struct StubBackend {
    config: Result<BackendConfig, ConnectionError>,
    intent: Result<PaymentIntentHandle, ConnectionError>,
    intent_gate: Option<Notify>,
    config_calls: AtomicUsize,
    requests: Mutex<Vec<PaymentIntentRequest>>,
}

impl StubBackend {
    pub fn new(publishable_key: &str, client_secret: &str) -> Self {
        Self {
            config: Ok(BackendConfig {
                publishable_key: publishable_key.to_string(),
            }),
            intent: Ok(PaymentIntentHandle::new(client_secret)),
            intent_gate: None,
            config_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_config_error(mut self, err: ConnectionError) -> Self {
        self.config = Err(err);
        self
    }

    pub fn with_intent_error(mut self, err: ConnectionError) -> Self {
        self.intent = Err(err);
        self
    }

    pub fn with_held_intent(mut self) -> Self {
        self.intent_gate = Some(Notify::new());
        self
    }

    pub fn release_intent(&self) {
        if let Some(gate) = &self.intent_gate {
            gate.notify_one();
        }
    }

    pub fn config_calls(&self) -> usize {
        self.config_calls.load(Ordering::SeqCst)
    }

    pub fn intent_requests(&self) -> Vec<PaymentIntentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn fetch_config(&self) -> Result<BackendConfig, ConnectionError> {
        self.config_calls.fetch_add(1, Ordering::SeqCst);
        self.config.clone()
    }

    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntentHandle, ConnectionError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.intent_gate {
            gate.notified().await;
        }
        self.intent.clone()
    }
}

/// Payment SDK that records every call and answers with a scripted result.
#[derive(Clone)]
pub struct RecordingSdk {
    result: ConfirmationResult,
    initialized_with: Arc<Mutex<Vec<String>>>,
    confirmed_secrets: Arc<Mutex<Vec<String>>>,
}

impl RecordingSdk {
    pub fn new(result: ConfirmationResult) -> Self {
        Self {
            result,
            initialized_with: Arc::new(Mutex::new(Vec::new())),
            confirmed_secrets: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(ConfirmationResult::Succeeded(succeeded_intent("pi_test_1")))
    }

    pub fn initialized_with(&self) -> Vec<String> {
        self.initialized_with.lock().unwrap().clone()
    }

    pub fn confirmed_secrets(&self) -> Vec<String> {
        self.confirmed_secrets.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentSdk for RecordingSdk {
    async fn initialize(&self, publishable_key: &str) {
        self.initialized_with
            .lock()
            .unwrap()
            .push(publishable_key.to_string());
    }

    async fn confirm_payment(&self, _card: &CardParams, client_secret: &str) -> ConfirmationResult {
        self.confirmed_secrets
            .lock()
            .unwrap()
            .push(client_secret.to_string());
        self.result.clone()
    }
}

pub fn succeeded_intent(id: &str) -> PaymentIntent {
    PaymentIntent {
        id: id.to_string(),
        amount: Some(1000),
        currency: Some("usd".to_string()),
        status: IntentStatus::Succeeded,
        payment_method_last4: Some("4242".to_string()),
        last_payment_error: None,
    }
}

pub fn test_card() -> CardParams {
    CardParams::new("4242424242424242", 12, 34, "123").unwrap()
}

pub fn orchestrator(
    backend: Arc<StubBackend>,
    sdk: &RecordingSdk,
) -> (Arc<CheckoutOrchestrator>, AlertReceiver) {
    let (alerts, rx) = alert_channel();
    let orchestrator = CheckoutOrchestrator::new(
        backend,
        Box::new(sdk.clone()),
        CheckoutSettings::default(),
        alerts,
    );
    (Arc::new(orchestrator), rx)
}

pub fn drain(rx: &mut AlertReceiver) -> Vec<Alert> {
    let mut alerts = Vec::new();
    while let Ok(alert) = rx.try_recv() {
        alerts.push(alert);
    }
    alerts
}
