use crate::domain::payment::{
    CardParams, ConfirmationResult, IntentStatus, LastPaymentError, PaymentIntent,
};
use crate::domain::ports::PaymentSdk;
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

const DECLINED: &str = "Your card was declined.";

/// In-process stand-in for the payment SDK, answering the way a card
/// processor's test mode does for its well-known test card numbers.
///
/// | card | outcome |
/// | --- | --- |
/// | `4000000000000002` | declined |
/// | `4000000000009995` | insufficient funds |
/// | `4000000000000069` | expired card |
/// | `4000000000000127` | incorrect CVC |
/// | `4000000000000119` | processing error |
/// | any other Luhn-valid number | succeeds |
#[derive(Debug, Default)]
pub struct SimulatedSdk {
    publishable_key: RwLock<Option<String>>,
    confirmed: Mutex<HashSet<String>>,
}

impl SimulatedSdk {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publishable_key(&self) -> Option<String> {
        self.publishable_key.read().await.clone()
    }

    fn intent(&self, client_secret: &str, card: &CardParams, status: IntentStatus) -> PaymentIntent {
        let id = client_secret
            .split_once("_secret_")
            .map(|(id, _)| id)
            .unwrap_or("pi_simulated");
        PaymentIntent {
            id: id.to_string(),
            amount: None,
            currency: None,
            status,
            payment_method_last4: Some(card.last4().to_string()),
            last_payment_error: None,
        }
    }

    fn declined(
        &self,
        client_secret: &str,
        card: &CardParams,
        code: &str,
        message: &str,
    ) -> ConfirmationResult {
        let mut intent = self.intent(client_secret, card, IntentStatus::RequiresPaymentMethod);
        intent.last_payment_error = Some(LastPaymentError {
            code: Some(code.to_string()),
            message: Some(message.to_string()),
        });
        ConfirmationResult::from_intent(intent)
    }
}

#[async_trait]
impl PaymentSdk for SimulatedSdk {
    async fn initialize(&self, publishable_key: &str) {
        *self.publishable_key.write().await = Some(publishable_key.to_string());
    }

    async fn confirm_payment(&self, card: &CardParams, client_secret: &str) -> ConfirmationResult {
        if self.publishable_key.read().await.is_none() {
            return ConfirmationResult::Failed(
                "The SDK must be initialized with a publishable key".to_string(),
            );
        }
        if client_secret.trim().is_empty() {
            return ConfirmationResult::Failed("Invalid client secret".to_string());
        }
        if !self.confirmed.lock().await.insert(client_secret.to_string()) {
            return ConfirmationResult::Failed(
                "This payment intent has already been confirmed".to_string(),
            );
        }

        debug!(card = ?card, "simulating confirmation");
        match card.number() {
            "4000000000000002" => self.declined(client_secret, card, "card_declined", DECLINED),
            "4000000000009995" => self.declined(
                client_secret,
                card,
                "card_declined",
                "Your card has insufficient funds.",
            ),
            "4000000000000069" => {
                self.declined(client_secret, card, "expired_card", "Your card has expired.")
            }
            "4000000000000127" => self.declined(
                client_secret,
                card,
                "incorrect_cvc",
                "Your card's security code is incorrect.",
            ),
            "4000000000000119" => ConfirmationResult::Failed(
                "An error occurred while processing your card. Try again in a little bit."
                    .to_string(),
            ),
            number if luhn_valid(number) => ConfirmationResult::from_intent(self.intent(
                client_secret,
                card,
                IntentStatus::Succeeded,
            )),
            _ => self.declined(
                client_secret,
                card,
                "incorrect_number",
                "Your card number is incorrect.",
            ),
        }
    }
}

fn luhn_valid(number: &str) -> bool {
    let mut sum = 0;
    for (i, c) in number.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}
