use std::time::Duration;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://10.0.2.2:4242/";
pub const PAYMENT_METHOD_TYPE: &str = "card";
pub const CURRENCY: &str = "usd";

/// Settings shared by the backend client and the checkout orchestrator.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Base URL of the merchant backend. `config` and `create-payment-intent`
    /// are resolved relative to it.
    pub backend_url: Url,
    pub payment_method_type: String,
    pub currency: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl CheckoutSettings {
    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url,
            payment_method_type: PAYMENT_METHOD_TYPE.to_string(),
            currency: CURRENCY.to_string(),
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        // DEFAULT_BACKEND_URL is a literal that always parses.
        let url = Url::parse(DEFAULT_BACKEND_URL).unwrap_or_else(|_| unreachable!());
        Self::new(url)
    }
}
