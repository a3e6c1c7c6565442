use super::payment::{
    BackendConfig, CardParams, ConfirmationResult, PaymentIntentHandle, PaymentIntentRequest,
};
use crate::error::ConnectionError;
use async_trait::async_trait;
use std::sync::Arc;

/// The merchant backend the checkout talks to.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetches the publishable key used to initialize the payment SDK.
    async fn fetch_config(&self) -> Result<BackendConfig, ConnectionError>;

    /// Creates a payment intent and returns its client secret. Never retried.
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntentHandle, ConnectionError>;
}

/// The third-party payment SDK. Tokenization and authentication happen behind
/// `confirm_payment`.
#[async_trait]
pub trait PaymentSdk: Send + Sync {
    async fn initialize(&self, publishable_key: &str);

    async fn confirm_payment(&self, card: &CardParams, client_secret: &str)
    -> ConfirmationResult;
}

pub type BackendRef = Arc<dyn Backend>;
pub type PaymentSdkBox = Box<dyn PaymentSdk>;
