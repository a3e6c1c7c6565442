use crate::application::alerts::{Alert, AlertReceiver};
use std::io::{self, Write};

/// Renders alerts as text blocks with a single `[ Ok ]` acknowledgment.
///
/// Owns the receiving end of the alert channel, so every message is written by
/// the task running [`AlertPresenter::run`], whichever task raised it.
pub struct AlertPresenter<W: Write> {
    writer: W,
}

impl<W: Write> AlertPresenter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn present(&mut self, alert: &Alert) -> io::Result<()> {
        writeln!(self.writer, "== {} ==", alert.title)?;
        if !alert.message.is_empty() {
            writeln!(self.writer, "{}", alert.message)?;
        }
        writeln!(self.writer, "[ Ok ]")?;
        self.writer.flush()
    }

    /// Presents alerts until every sender is dropped. Returns how many were shown.
    pub async fn run(&mut self, mut alerts: AlertReceiver) -> io::Result<usize> {
        let mut shown = 0;
        while let Some(alert) = alerts.recv().await {
            self.present(&alert)?;
            shown += 1;
        }
        Ok(shown)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
