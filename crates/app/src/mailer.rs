//! Outbound email seam.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Trait for sending email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

/// Mailer that only logs what it would send.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        tracing::info!(to = %message.to, subject = %message.subject, "email sent");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    sent: Vec<EmailMessage>,
    fail: bool,
}

/// In-memory mailer for testing.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    state: Arc<RwLock<RecordingState>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the mailer to reject every message.
    pub fn set_fail(&self, fail: bool) {
        self.write().fail = fail;
    }

    /// Returns the messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.read().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.read().sent.len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RecordingState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RecordingState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        let mut state = self.write();
        if state.fail {
            return Err(MailError::Delivery(format!("rejected message to {}", message.to)));
        }
        state.sent.push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "ada@example.com".into(),
            subject: "hi".into(),
            body: "hello".into(),
        }
    }

    #[tokio::test]
    async fn recording_mailer_keeps_messages() {
        let mailer = RecordingMailer::new();
        mailer.send(message()).await.unwrap();

        assert_eq!(mailer.sent(), vec![message()]);
    }

    #[tokio::test]
    async fn recording_mailer_can_fail() {
        let mailer = RecordingMailer::new();
        mailer.set_fail(true);

        let err = mailer.send(message()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "mail delivery failed: rejected message to ada@example.com"
        );
        assert_eq!(mailer.sent_count(), 0);
    }
}
