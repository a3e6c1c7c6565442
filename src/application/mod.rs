//! Application layer orchestrating the checkout.
//!
//! `CheckoutOrchestrator` owns the payment SDK client and the client secret,
//! runs the two startup requests on a background task and publishes its state
//! on a `tokio::sync::watch` channel. User-facing messages travel to the UI task
//! over an mpsc channel.

pub mod alerts;
pub mod checkout;
pub mod intent_slot;
pub mod payment_client;
