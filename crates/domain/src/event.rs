//! Domain events and their recorded form.

use chrono::{DateTime, Utc};
use common::AggregateId;
use event_store::{EventId, Version};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Trait for domain event payloads.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and named in past tense. Each aggregate uses one enum
/// implementing this trait, with one variant per kind of mutation.
pub trait DomainEvent:
    std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + Clone + 'static
{
    /// Returns the event type name used for storage and routing.
    fn event_type(&self) -> &'static str;
}

/// A domain event together with the facts about its emission.
///
/// Built by the aggregate root when a mutation is accepted, and rebuilt by
/// the persistence adapter when a stream is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent<E> {
    pub event_id: EventId,

    /// The aggregate that emitted the event.
    pub aggregate_id: AggregateId,

    /// The aggregate version this event produced.
    pub version: Version,

    pub occurred_on: DateTime<Utc>,

    /// Who caused the event, if known.
    pub actor: Option<String>,

    pub payload: E,
}

impl<E: DomainEvent> RecordedEvent<E> {
    /// Records a freshly emitted payload.
    pub fn new(
        aggregate_id: AggregateId,
        version: Version,
        actor: Option<String>,
        payload: E,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            aggregate_id,
            version,
            occurred_on: Utc::now(),
            actor,
            payload,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}
