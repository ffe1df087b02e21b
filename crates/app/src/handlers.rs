//! Notification handlers that turn customer events into background email.
//!
//! Handlers never send mail themselves. They enqueue a work item and return,
//! so a slow or failing mail server never holds up a command.

use std::sync::Arc;

use async_trait::async_trait;
use background::{BackgroundQueue, WorkError, WorkItem};
use dispatch::{HandlerError, Notification, NotificationHandler};
use domain::customer::{CustomerCreatedData, EmailChangedData};

use crate::mailer::{EmailMessage, Mailer};

async fn enqueue_email(
    queue: &BackgroundQueue,
    mailer: &Arc<dyn Mailer>,
    label: &'static str,
    message: EmailMessage,
) -> Result<(), HandlerError> {
    let mailer = mailer.clone();
    let item = WorkItem::new(label, move |_| async move {
        mailer.send(message).await?;
        Ok::<_, WorkError>(())
    });
    queue.enqueue(item).await?;
    Ok(())
}

/// Sends a welcome email to newly registered customers.
pub struct WelcomeEmailHandler {
    queue: BackgroundQueue,
    mailer: Arc<dyn Mailer>,
}

impl WelcomeEmailHandler {
    pub fn new(queue: BackgroundQueue, mailer: Arc<dyn Mailer>) -> Self {
        Self { queue, mailer }
    }
}

#[async_trait]
impl NotificationHandler<CustomerCreatedData> for WelcomeEmailHandler {
    async fn handle(
        &self,
        notification: &Notification<CustomerCreatedData>,
    ) -> Result<(), HandlerError> {
        let data = notification.data();
        let message = EmailMessage {
            to: data.email.to_string(),
            subject: "Welcome!".to_string(),
            body: format!("Hello {}, your account is ready.", data.name),
        };
        enqueue_email(&self.queue, &self.mailer, "welcome-email", message).await
    }

    fn name(&self) -> &'static str {
        "welcome-email"
    }
}

/// Asks customers to confirm a changed email address.
pub struct EmailChangeConfirmationHandler {
    queue: BackgroundQueue,
    mailer: Arc<dyn Mailer>,
}

impl EmailChangeConfirmationHandler {
    pub fn new(queue: BackgroundQueue, mailer: Arc<dyn Mailer>) -> Self {
        Self { queue, mailer }
    }
}

#[async_trait]
impl NotificationHandler<EmailChangedData> for EmailChangeConfirmationHandler {
    async fn handle(&self, notification: &Notification<EmailChangedData>) -> Result<(), HandlerError> {
        let data = notification.data();
        let message = EmailMessage {
            to: data.new_email.to_string(),
            subject: "Confirm your new email address".to_string(),
            body: format!(
                "Your email was changed from {} on {}.",
                data.old_email,
                notification.occurred_on().format("%Y-%m-%d")
            ),
        };
        enqueue_email(&self.queue, &self.mailer, "email-change-confirmation", message).await
    }

    fn name(&self) -> &'static str {
        "email-change-confirmation"
    }
}
