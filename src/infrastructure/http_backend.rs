use crate::config::CheckoutSettings;
use crate::domain::payment::{BackendConfig, PaymentIntentHandle, PaymentIntentRequest};
use crate::domain::ports::Backend;
use crate::error::ConnectionError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;
use url::Url;

const CONFIG_PATH: &str = "config";
const CREATE_PAYMENT_INTENT_PATH: &str = "create-payment-intent";
const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Merchant backend reached over HTTP.
///
/// Serves the publishable key at `GET {base}/config` and creates payment
/// intents at `POST {base}/create-payment-intent`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(settings: &CheckoutSettings) -> Result<Self, ConnectionError> {
        let scheme = settings.backend_url.scheme();
        if !matches!(scheme, "http" | "https") {
            return Err(ConnectionError::Transport(format!(
                "unsupported URL scheme `{scheme}`"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(settings.backend_url.clone(), builder.build()?))
    }

    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self {
            base_url: as_directory(base_url),
            client,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ConnectionError> {
        self.base_url
            .join(path)
            .map_err(|e| ConnectionError::Transport(e.to_string()))
    }
}

/// Appends a trailing slash so relative joins add a path segment instead of
/// replacing the last one.
fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn read_json(response: reqwest::Response) -> Result<Value, ConnectionError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ConnectionError::BackendRejected(status.to_string()));
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ConnectionError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_config(&self) -> Result<BackendConfig, ConnectionError> {
        let url = self.endpoint(CONFIG_PATH)?;
        debug!(%url, "fetching payment configuration");

        let response = self.client.get(url).send().await?;
        let json = read_json(response).await?;

        let publishable_key = json
            .get("publishableKey")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ConnectionError::MalformedResponse(
                    "expected a string `publishableKey` field".to_string(),
                )
            })?;

        Ok(BackendConfig {
            publishable_key: publishable_key.to_string(),
        })
    }

    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntentHandle, ConnectionError> {
        let url = self.endpoint(CREATE_PAYMENT_INTENT_PATH)?;
        let body = serde_json::to_vec(request)
            .map_err(|e| ConnectionError::Transport(e.to_string()))?;
        debug!(%url, currency = %request.currency, "creating payment intent");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(body)
            .send()
            .await?;
        let json = read_json(response).await?;

        match json.get("clientSecret") {
            Some(Value::String(secret)) => Ok(PaymentIntentHandle::new(secret.as_str())),
            Some(_) => Err(ConnectionError::MalformedResponse(
                "`clientSecret` is not a string".to_string(),
            )),
            None => Err(ConnectionError::MissingField("clientSecret")),
        }
    }
}
