use crate::domain::payment::PaymentIntentHandle;
use crate::error::{CheckoutError, Result};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
enum SlotState {
    #[default]
    Empty,
    Filled(PaymentIntentHandle),
    Taken,
}

/// Holds the client secret between the intent request and the confirmation.
///
/// Written once, taken once. A taken secret is never handed out again.
#[derive(Debug, Default)]
pub struct IntentSlot {
    state: Mutex<SlotState>,
}

impl IntentSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the handle. Fails if a handle was already stored.
    pub async fn fill(&self, handle: PaymentIntentHandle) -> Result<()> {
        let mut state = self.state.lock().await;
        match *state {
            SlotState::Empty => {
                *state = SlotState::Filled(handle);
                Ok(())
            }
            _ => Err(CheckoutError::IntentAlreadyLoaded),
        }
    }

    /// Removes the handle for a confirmation attempt.
    pub async fn take(&self) -> Result<PaymentIntentHandle> {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, SlotState::Taken) {
            SlotState::Filled(handle) => Ok(handle),
            SlotState::Empty => {
                *state = SlotState::Empty;
                Err(CheckoutError::IntentNotReady)
            }
            SlotState::Taken => Err(CheckoutError::AlreadyConfirmed),
        }
    }

    pub async fn is_filled(&self) -> bool {
        matches!(*self.state.lock().await, SlotState::Filled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_take_before_fill_reports_not_ready() {
        let slot = IntentSlot::new();
        assert_eq!(slot.take().await, Err(CheckoutError::IntentNotReady));
        // Still fillable afterwards.
        slot.fill(PaymentIntentHandle::new("cs_1")).await.unwrap();
        assert_eq!(slot.take().await.unwrap().client_secret, "cs_1");
    }

    #[tokio::test]
    async fn test_secret_is_taken_once() {
        let slot = IntentSlot::new();
        slot.fill(PaymentIntentHandle::new("cs_1")).await.unwrap();
        assert!(slot.is_filled().await);

        assert!(slot.take().await.is_ok());
        assert!(!slot.is_filled().await);
        assert_eq!(slot.take().await, Err(CheckoutError::AlreadyConfirmed));
    }

    #[tokio::test]
    async fn test_fill_is_single_assignment() {
        let slot = IntentSlot::new();
        slot.fill(PaymentIntentHandle::new("cs_1")).await.unwrap();
        assert_eq!(
            slot.fill(PaymentIntentHandle::new("cs_2")).await,
            Err(CheckoutError::IntentAlreadyLoaded)
        );
        assert_eq!(slot.take().await.unwrap().client_secret, "cs_1");
    }

    #[tokio::test]
    async fn test_concurrent_takers_get_one_handle() {
        let slot = Arc::new(IntentSlot::new());
        slot.fill(PaymentIntentHandle::new("cs_1")).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let slot = slot.clone();
                tokio::spawn(async move { slot.take().await })
            })
            .collect();

        let mut taken = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                taken += 1;
            }
        }
        assert_eq!(taken, 1);
    }
}
