use crate::domain::payment::{BackendConfig, CardParams, ConfirmationResult, PaymentIntentHandle};
use crate::domain::ports::PaymentSdkBox;
use crate::error::{CheckoutError, Result};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Owns the payment SDK and its one-time initialization.
///
/// The SDK is initialized with the first publishable key it is given. Later
/// calls are no-ops, and confirmations are refused until initialization ran.
pub struct PaymentClient {
    sdk: PaymentSdkBox,
    publishable_key: OnceCell<String>,
}

impl PaymentClient {
    pub fn new(sdk: PaymentSdkBox) -> Self {
        Self {
            sdk,
            publishable_key: OnceCell::new(),
        }
    }

    pub async fn initialize(&self, config: &BackendConfig) {
        let key = self
            .publishable_key
            .get_or_init(|| async {
                debug!("initializing payment SDK");
                self.sdk.initialize(&config.publishable_key).await;
                config.publishable_key.clone()
            })
            .await;

        if key != &config.publishable_key {
            warn!("payment SDK already initialized with a different publishable key; keeping it");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.publishable_key.initialized()
    }

    pub fn publishable_key(&self) -> Option<&str> {
        self.publishable_key.get().map(String::as_str)
    }

    /// Confirms the intent behind `handle` with the given card. Consumes the
    /// handle so it cannot be used for a second attempt.
    pub async fn confirm_payment(
        &self,
        card: &CardParams,
        handle: PaymentIntentHandle,
    ) -> Result<ConfirmationResult> {
        if !self.is_initialized() {
            return Err(CheckoutError::SdkNotInitialized);
        }
        debug!(card = ?card, "confirming payment");
        Ok(self.sdk.confirm_payment(card, &handle.client_secret).await)
    }
}
