//! The notification envelope handed to handlers.

use chrono::{DateTime, Utc};
use common::AggregateId;
use domain::{DomainEvent, RecordedEvent};
use event_store::{EventId, Version};

/// Facts about an event's emission, shared by every notification built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventHeader {
    pub event_id: EventId,
    pub event_type: &'static str,
    pub aggregate_id: AggregateId,
    pub version: Version,
    pub occurred_on: DateTime<Utc>,
    pub actor: Option<String>,
}

impl<E: DomainEvent> From<&RecordedEvent<E>> for EventHeader {
    fn from(event: &RecordedEvent<E>) -> Self {
        Self {
            event_id: event.event_id,
            event_type: event.event_type(),
            aggregate_id: event.aggregate_id,
            version: event.version,
            occurred_on: event.occurred_on,
            actor: event.actor.clone(),
        }
    }
}

/// A payload of type `T` together with its [`EventHeader`].
///
/// Handlers never see the aggregate that emitted the event, only this.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification<T> {
    header: EventHeader,
    data: T,
}

impl<T> Notification<T> {
    pub fn new(header: EventHeader, data: T) -> Self {
        Self { header, data }
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn occurred_on(&self) -> DateTime<Utc> {
        self.header.occurred_on
    }

    pub fn into_data(self) -> T {
        self.data
    }
}
