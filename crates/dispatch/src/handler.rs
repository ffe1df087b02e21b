//! Handler trait and the per-type handler list.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use common::panic_message;
use futures_util::FutureExt;

use crate::notification::Notification;

/// Error returned by a handler. Any error type will do.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Reacts to notifications carrying a payload of type `T`.
#[async_trait]
pub trait NotificationHandler<T>: Send + Sync {
    async fn handle(&self, notification: &Notification<T>) -> Result<(), HandlerError>;

    /// Name used in logs and failure reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A handler that failed or panicked while handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    pub handler: &'static str,
    pub event_type: &'static str,
    pub error: String,
    pub panicked: bool,
}

impl std::fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = if self.panicked { "panicked" } else { "failed" };
        write!(
            f,
            "handler {} {verb} on {}: {}",
            self.handler, self.event_type, self.error
        )
    }
}

/// Handlers subscribed to one payload type, in subscription order.
pub struct Handlers<T> {
    handlers: Vec<Arc<dyn NotificationHandler<T>>>,
}

impl<T> Default for Handlers<T> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<T: Send + Sync + 'static> Handlers<T> {
    pub fn push(&mut self, handler: Arc<dyn NotificationHandler<T>>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs every handler in turn, waiting for each before starting the
    /// next. Returns how many succeeded; failures are appended to `failures`.
    pub async fn publish(
        &self,
        notification: &Notification<T>,
        failures: &mut Vec<HandlerFailure>,
    ) -> usize {
        let event_type = notification.header().event_type;
        let mut delivered = 0;

        for handler in &self.handlers {
            let outcome = AssertUnwindSafe(handler.handle(notification))
                .catch_unwind()
                .await;

            let failure = match outcome {
                Ok(Ok(())) => {
                    delivered += 1;
                    continue;
                }
                Ok(Err(error)) => {
                    tracing::warn!(
                        handler = handler.name(),
                        event_type,
                        aggregate_id = %notification.header().aggregate_id,
                        %error,
                        "event handler failed"
                    );
                    HandlerFailure {
                        handler: handler.name(),
                        event_type,
                        error: error.to_string(),
                        panicked: false,
                    }
                }
                Err(payload) => {
                    let error = panic_message(payload.as_ref());
                    tracing::error!(
                        handler = handler.name(),
                        event_type,
                        aggregate_id = %notification.header().aggregate_id,
                        %error,
                        "event handler panicked"
                    );
                    HandlerFailure {
                        handler: handler.name(),
                        event_type,
                        error,
                        panicked: true,
                    }
                }
            };

            metrics::counter!("dispatch_handler_failures_total", "handler" => failure.handler)
                .increment(1);
            failures.push(failure);
        }

        delivered
    }
}
