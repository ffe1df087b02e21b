//! Persistence adapter between aggregate roots and an event store.

use std::marker::PhantomData;

use common::{AggregateId, Failure};
use event_store::{AppendOptions, EventEnvelope, EventStore, Version};

use crate::aggregate::{Aggregate, AggregateRoot};
use crate::error::DomainError;
use crate::event::RecordedEvent;

const ACTOR_KEY: &str = "actor";

/// Loads aggregate roots by replaying their stored streams and saves their
/// pending events with an optimistic version check.
///
/// The aggregate kernel knows nothing about storage; this adapter is the only
/// place that converts between [`RecordedEvent`]s and [`EventEnvelope`]s.
pub struct Repository<S, A>
where
    S: EventStore,
    A: Aggregate,
{
    store: S,
    _phantom: PhantomData<A>,
}

impl<S, A> Repository<S, A>
where
    S: EventStore,
    A: Aggregate,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads an aggregate, returning None if it has no stored events.
    ///
    /// A stream that cannot be replayed into a valid state is reported as
    /// [`DomainError::CorruptedHistory`].
    pub async fn load(&self, aggregate_id: AggregateId) -> Result<Option<AggregateRoot<A>>, DomainError> {
        let envelopes = self.store.get_events_for_aggregate(aggregate_id).await?;
        if envelopes.is_empty() {
            return Ok(None);
        }

        let history = envelopes
            .into_iter()
            .map(Self::to_recorded)
            .collect::<Result<Vec<_>, _>>()?;

        AggregateRoot::replay(history)
            .map(Some)
            .map_err(|source| {
                tracing::error!(
                    aggregate_type = A::aggregate_type(),
                    %aggregate_id,
                    error = %source,
                    "stored history is corrupted"
                );
                DomainError::CorruptedHistory {
                    aggregate_type: A::aggregate_type(),
                    aggregate_id,
                    source,
                }
            })
    }

    /// Loads an aggregate that must exist.
    pub async fn get(&self, aggregate_id: AggregateId) -> Result<AggregateRoot<A>, DomainError> {
        self.load(aggregate_id).await?.ok_or_else(|| {
            DomainError::Rejected(Failure::not_found(format!(
                "{} {aggregate_id} not found",
                A::aggregate_type()
            )))
        })
    }

    /// Appends the root's pending events, expecting the store to still be at
    /// the root's committed version.
    ///
    /// On success the pending events are taken from the root and returned in
    /// emission order, ready for dispatch. On a version conflict the root is
    /// left untouched and a `ConcurrencyConflict` failure is returned.
    pub async fn save(
        &self,
        root: &mut AggregateRoot<A>,
    ) -> Result<Vec<RecordedEvent<A::Event>>, DomainError> {
        if !root.has_pending_events() {
            return Ok(Vec::new());
        }

        let envelopes = root
            .pending_events()
            .iter()
            .map(Self::to_envelope)
            .collect::<Result<Vec<_>, _>>()?;

        let expected = root.committed_version();
        let options = if expected == Version::initial() {
            AppendOptions::expect_new()
        } else {
            AppendOptions::expect_version(expected)
        };

        let new_version = self.store.append(envelopes, options).await?;
        debug_assert_eq!(new_version, root.version());

        Ok(root.take_pending_events())
    }

    fn to_envelope(event: &RecordedEvent<A::Event>) -> Result<EventEnvelope, DomainError> {
        let mut builder = EventEnvelope::builder()
            .event_id(event.event_id)
            .event_type(event.event_type())
            .aggregate_id(event.aggregate_id)
            .aggregate_type(A::aggregate_type())
            .version(event.version)
            .timestamp(event.occurred_on)
            .payload(&event.payload)?;

        if let Some(actor) = &event.actor {
            builder = builder.metadata(ACTOR_KEY, serde_json::Value::String(actor.clone()));
        }

        Ok(builder.build()?)
    }

    fn to_recorded(envelope: EventEnvelope) -> Result<RecordedEvent<A::Event>, DomainError> {
        let actor = envelope.metadata_str(ACTOR_KEY).map(str::to_owned);
        Ok(RecordedEvent {
            event_id: envelope.event_id,
            aggregate_id: envelope.aggregate_id,
            version: envelope.version,
            occurred_on: envelope.timestamp,
            actor,
            payload: serde_json::from_value(envelope.payload)?,
        })
    }
}
