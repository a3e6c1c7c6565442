use tokio::sync::mpsc;

/// A titled message shown with a single acknowledgment action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

pub type AlertSender = mpsc::UnboundedSender<Alert>;
pub type AlertReceiver = mpsc::UnboundedReceiver<Alert>;

/// Creates the channel whose receiving half belongs to the UI task.
pub fn alert_channel() -> (AlertSender, AlertReceiver) {
    mpsc::unbounded_channel()
}
