//! The event dispatcher and the routing seam it relies on.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{DomainEvent, RecordedEvent};

use crate::handler::{HandlerFailure, Handlers, NotificationHandler};
use crate::notification::{EventHeader, Notification};

/// An event enum that knows how to route each of its variants.
///
/// `Routes` holds one [`Handlers`] list per variant payload type; `route`
/// matches on the variant and publishes the payload to the matching list.
#[async_trait]
pub trait Routable: DomainEvent {
    type Routes: Default + Send + Sync;

    /// Publishes `event` to the handlers of its variant. Returns the number
    /// of successful deliveries.
    async fn route(
        routes: &Self::Routes,
        event: &RecordedEvent<Self>,
        failures: &mut Vec<HandlerFailure>,
    ) -> usize;
}

/// Gives access to the handler list for payload type `T`.
pub trait Subscribe<T> {
    fn handlers_mut(&mut self) -> &mut Handlers<T>;
}

/// Outcome of dispatching one or more events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Events dispatched.
    pub events: usize,

    /// Successful handler invocations.
    pub delivered: usize,

    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    /// True if no handler failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: DispatchReport) {
        self.events += other.events;
        self.delivered += other.delivered;
        self.failures.extend(other.failures);
    }
}

/// Fans committed events of type `E` out to subscribed handlers.
///
/// Handlers are registered up front with `&mut self`; dispatching only needs
/// `&self`, so a built dispatcher can be shared behind an `Arc`.
pub struct EventDispatcher<E: Routable> {
    routes: E::Routes,
    all: Handlers<E>,
}

impl<E: Routable> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self {
            routes: E::Routes::default(),
            all: Handlers::default(),
        }
    }
}

impl<E: Routable> EventDispatcher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a handler to one variant's payload type.
    pub fn subscribe<T, H>(&mut self, handler: Arc<H>) -> &mut Self
    where
        T: Send + Sync + 'static,
        H: NotificationHandler<T> + 'static,
        E::Routes: Subscribe<T>,
    {
        self.routes.handlers_mut().push(handler);
        self
    }

    /// Subscribes a handler to every event. It runs after the variant's own
    /// handlers.
    pub fn subscribe_all<H>(&mut self, handler: Arc<H>) -> &mut Self
    where
        H: NotificationHandler<E> + 'static,
    {
        self.all.push(handler);
        self
    }

    /// Dispatches one event, waiting for every handler to finish.
    #[tracing::instrument(
        skip_all,
        fields(
            event_type = event.event_type(),
            aggregate_id = %event.aggregate_id,
            version = %event.version,
        )
    )]
    pub async fn dispatch(&self, event: &RecordedEvent<E>) -> DispatchReport {
        let mut failures = Vec::new();
        let mut delivered = E::route(&self.routes, event, &mut failures).await;

        if !self.all.is_empty() {
            let notification = Notification::new(EventHeader::from(event), event.payload.clone());
            delivered += self.all.publish(&notification, &mut failures).await;
        }

        metrics::counter!("dispatch_events_total", "event_type" => event.event_type()).increment(1);
        tracing::debug!(delivered, failed = failures.len(), "event dispatched");

        DispatchReport {
            events: 1,
            delivered,
            failures,
        }
    }

    /// Dispatches events in order. Event N+1 is only dispatched once every
    /// handler of event N has returned, failed or panicked.
    pub async fn dispatch_many(&self, events: &[RecordedEvent<E>]) -> DispatchReport {
        let mut report = DispatchReport::default();
        for event in events {
            report.merge(self.dispatch(event).await);
        }

        if !report.is_clean() {
            tracing::warn!(
                events = report.events,
                failures = report.failures.len(),
                "dispatch completed with handler failures"
            );
        }
        report
    }
}

/// Publishes `data` to `handlers`, skipping the clone when nobody listens.
pub(crate) async fn deliver<T>(
    handlers: &Handlers<T>,
    header: EventHeader,
    data: &T,
    failures: &mut Vec<HandlerFailure>,
) -> usize
where
    T: Clone + Send + Sync + 'static,
{
    if handlers.is_empty() {
        return 0;
    }
    handlers
        .publish(&Notification::new(header, data.clone()), failures)
        .await
}
