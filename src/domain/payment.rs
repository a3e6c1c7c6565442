use crate::error::{PaymentError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration the backend hands out for initializing the payment SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    pub publishable_key: String,
}

/// Body of the `create-payment-intent` request.
///
/// The amount travels with the checkout but is priced server-side, so it is
/// never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    pub payment_method_type: String,
    pub currency: String,
    #[serde(skip)]
    pub amount: Option<u64>,
}

impl PaymentIntentRequest {
    pub fn new(payment_method_type: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            payment_method_type: payment_method_type.into(),
            currency: currency.into(),
            amount: None,
        }
    }

    pub fn with_amount(mut self, minor_units: u64) -> Self {
        self.amount = Some(minor_units);
        self
    }
}

/// The client secret of a single payment intent.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentHandle {
    pub client_secret: String,
}

impl PaymentIntentHandle {
    pub fn new(client_secret: impl Into<String>) -> Self {
        Self {
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for PaymentIntentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentIntentHandle")
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Card details entered on the checkout screen.
///
/// Only constructible through [`CardParams::new`], so a value always holds a
/// complete set of details.
#[derive(Clone, PartialEq, Eq)]
pub struct CardParams {
    number: String,
    exp_month: u8,
    exp_year: u16,
    cvc: String,
}

impl CardParams {
    pub fn new(
        number: &str,
        exp_month: u8,
        exp_year: u16,
        cvc: &str,
    ) -> Result<Self, ValidationError> {
        let number: String = number.chars().filter(|c| !c.is_whitespace()).collect();
        if !(12..=19).contains(&number.len()) || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::IncompleteCardDetails("card number"));
        }
        if !(1..=12).contains(&exp_month) {
            return Err(ValidationError::IncompleteCardDetails("expiration month"));
        }
        let exp_year = match exp_year {
            0..=99 => 2000 + exp_year,
            1000..=9999 => exp_year,
            _ => return Err(ValidationError::IncompleteCardDetails("expiration year")),
        };
        let cvc = cvc.trim();
        if !(3..=4).contains(&cvc.len()) || !cvc.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::IncompleteCardDetails("cvc"));
        }

        Ok(Self {
            number,
            exp_month,
            exp_year,
            cvc: cvc.to_string(),
        })
    }

    /// Parses an `MM/YY` or `MM/YYYY` expiry together with the other fields.
    pub fn with_expiry(number: &str, expiry: &str, cvc: &str) -> Result<Self, ValidationError> {
        let (month, year) = expiry
            .split_once('/')
            .ok_or(ValidationError::IncompleteCardDetails("expiration date"))?;
        let month = month
            .trim()
            .parse()
            .map_err(|_| ValidationError::IncompleteCardDetails("expiration month"))?;
        let year = year
            .trim()
            .parse()
            .map_err(|_| ValidationError::IncompleteCardDetails("expiration year"))?;
        Self::new(number, month, year, cvc)
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn exp_month(&self) -> u8 {
        self.exp_month
    }

    pub fn exp_year(&self) -> u16 {
        self.exp_year
    }

    pub fn cvc(&self) -> &str {
        &self.cvc
    }

    pub fn last4(&self) -> &str {
        &self.number[self.number.len() - 4..]
    }
}

impl fmt::Debug for CardParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardParams")
            .field("last4", &self.last4())
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    Succeeded,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastPaymentError {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Payment intent details as reported by the SDK after confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub status: IntentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_last4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_payment_error: Option<LastPaymentError>,
}

/// Terminal result of a confirmation, as produced by the payment SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationResult {
    Succeeded(PaymentIntent),
    /// The card was refused. Carries the last recorded payment error message.
    RequiresNewPaymentMethod(Option<String>),
    Failed(String),
}

impl ConfirmationResult {
    /// Classifies intent details the way the SDK reports a finished confirmation.
    pub fn from_intent(intent: PaymentIntent) -> Self {
        match intent.status {
            IntentStatus::Succeeded => ConfirmationResult::Succeeded(intent),
            IntentStatus::RequiresPaymentMethod => ConfirmationResult::RequiresNewPaymentMethod(
                intent.last_payment_error.and_then(|e| e.message),
            ),
            other => ConfirmationResult::Failed(format!(
                "Payment intent {} ended in unexpected status {:?}",
                intent.id, other
            )),
        }
    }

    pub fn into_result(self) -> Result<PaymentIntent, PaymentError> {
        match self {
            ConfirmationResult::Succeeded(intent) => Ok(intent),
            ConfirmationResult::RequiresNewPaymentMethod(message) => {
                Err(PaymentError::RequiresNewMethod(message.unwrap_or_default()))
            }
            ConfirmationResult::Failed(error) => Err(PaymentError::SdkFailure(error)),
        }
    }
}
