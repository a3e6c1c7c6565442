use thiserror::Error;

/// Failures talking to the merchant backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Backend rejected the request: {0}")]
    BackendRejected(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Response is missing the `{0}` field")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for ConnectionError {
    fn from(err: reqwest::Error) -> Self {
        ConnectionError::Transport(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Insert payment amount")]
    EmptyOrInvalidAmount,
    #[error("Card details are incomplete: {0}")]
    IncompleteCardDetails(&'static str),
}

/// Terminal outcomes of a confirmation attempt that did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Payment requires a new payment method: {0}")]
    RequiresNewMethod(String),
    #[error("Payment SDK failure: {0}")]
    SdkFailure(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("Checkout has not been started")]
    NotStarted,
    #[error("Checkout has already been started")]
    AlreadyStarted,
    #[error("A payment intent has already been loaded")]
    IntentAlreadyLoaded,
    #[error("Payment configuration has not been loaded yet")]
    ConfigNotReady,
    #[error("Payment intent has not been loaded yet")]
    IntentNotReady,
    #[error("Payment intent could not be loaded")]
    IntentUnavailable,
    #[error("This payment intent has already been confirmed")]
    AlreadyConfirmed,
    #[error("Payment SDK has not been initialized")]
    SdkNotInitialized,
}

pub type Result<T, E = CheckoutError> = std::result::Result<T, E>;
