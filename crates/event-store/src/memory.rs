use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    AggregateId, EventEnvelope, EventStoreError, Result, Version,
    store::{AppendOptions, EventStore, validate_events_for_append},
};

/// Map-backed event store keyed by aggregate id.
///
/// Clones share the same underlying streams, so a store can be handed to
/// several repositories and still detect conflicting writes between them.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    streams: Arc<RwLock<HashMap<AggregateId, Vec<EventEnvelope>>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events stored across all aggregates.
    pub async fn event_count(&self) -> usize {
        self.streams.read().await.values().map(Vec::len).sum()
    }

    pub async fn clear(&self) {
        self.streams.write().await.clear();
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, events: Vec<EventEnvelope>, options: AppendOptions) -> Result<Version> {
        validate_events_for_append(&events)?;

        let Some((first_version, aggregate_id)) =
            events.first().map(|e| (e.version, e.aggregate_id))
        else {
            return Err(EventStoreError::InvalidAppend(
                "cannot append an empty event list".to_string(),
            ));
        };

        let mut streams = self.streams.write().await;
        let current_version = streams
            .get(&aggregate_id)
            .and_then(|stream| stream.last())
            .map_or(Version::initial(), |e| e.version);

        if let Some(expected) = options.expected_version
            && current_version != expected
        {
            tracing::debug!(%aggregate_id, %expected, actual = %current_version, "append rejected");
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected,
                actual: current_version,
            });
        }

        // Unique (aggregate_id, version) constraint.
        if first_version != current_version.next() {
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected: options.expected_version.unwrap_or(current_version),
                actual: current_version,
            });
        }

        let last_version = events.last().map_or(current_version, |e| e.version);
        streams.entry(aggregate_id).or_default().extend(events);

        Ok(last_version)
    }

    async fn get_events_for_aggregate(
        &self,
        aggregate_id: AggregateId,
    ) -> Result<Vec<EventEnvelope>> {
        let streams = self.streams.read().await;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn get_aggregate_version(&self, aggregate_id: AggregateId) -> Result<Option<Version>> {
        let streams = self.streams.read().await;
        Ok(streams
            .get(&aggregate_id)
            .and_then(|stream| stream.last())
            .map(|e| e.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventStoreExt;

    fn create_test_event(aggregate_id: AggregateId, version: u64, event_type: &str) -> EventEnvelope {
        EventEnvelope::builder()
            .aggregate_id(aggregate_id)
            .aggregate_type("Customer")
            .event_type(event_type)
            .version(Version::new(version))
            .payload_raw(serde_json::json!({"test": true}))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn append_single_event() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new();
        let event = create_test_event(aggregate_id, 1, "CustomerCreated");

        let version = store
            .append(vec![event], AppendOptions::expect_new())
            .await
            .unwrap();
        assert_eq!(version, Version::first());

        let events = store.get_events_for_aggregate(aggregate_id).await.unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn append_multiple_events() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new();

        let events = vec![
            create_test_event(aggregate_id, 1, "CustomerCreated"),
            create_test_event(aggregate_id, 2, "CustomerRenamed"),
            create_test_event(aggregate_id, 3, "EmailChanged"),
        ];

        let version = store
            .append(events, AppendOptions::expect_new())
            .await
            .unwrap();
        assert_eq!(version, Version::new(3));
        assert_eq!(store.event_count().await, 3);
    }

    #[tokio::test]
    async fn concurrency_conflict_on_wrong_version() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new();

        store
            .append(
                vec![create_test_event(aggregate_id, 1, "CustomerCreated")],
                AppendOptions::expect_new(),
            )
            .await
            .unwrap();

        let result = store
            .append(
                vec![create_test_event(aggregate_id, 2, "CustomerRenamed")],
                AppendOptions::expect_version(Version::initial()),
            )
            .await;

        match result {
            Err(EventStoreError::ConcurrencyConflict {
                expected, actual, ..
            }) => {
                assert_eq!(expected, Version::initial());
                assert_eq!(actual, Version::first());
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn expected_version_match_succeeds() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new();

        store
            .append(
                vec![create_test_event(aggregate_id, 1, "CustomerCreated")],
                AppendOptions::expect_new(),
            )
            .await
            .unwrap();

        let version = store
            .append(
                vec![create_test_event(aggregate_id, 2, "CustomerRenamed")],
                AppendOptions::expect_version(Version::first()),
            )
            .await
            .unwrap();
        assert_eq!(version, Version::new(2));
    }

    #[tokio::test]
    async fn duplicate_version_without_expectation_conflicts() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new();

        store
            .append(
                vec![create_test_event(aggregate_id, 1, "CustomerCreated")],
                AppendOptions::new(),
            )
            .await
            .unwrap();

        let result = store
            .append(
                vec![create_test_event(aggregate_id, 1, "CustomerCreated")],
                AppendOptions::new(),
            )
            .await;
        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn streams_are_isolated_per_aggregate() {
        let store = InMemoryEventStore::new();
        let first = AggregateId::new();
        let second = AggregateId::new();

        store
            .append(
                vec![create_test_event(first, 1, "CustomerCreated")],
                AppendOptions::expect_new(),
            )
            .await
            .unwrap();
        store
            .append(
                vec![
                    create_test_event(second, 1, "CustomerCreated"),
                    create_test_event(second, 2, "CustomerActivated"),
                ],
                AppendOptions::expect_new(),
            )
            .await
            .unwrap();

        assert_eq!(store.event_count().await, 3);
        assert_eq!(
            store.get_aggregate_version(first).await.unwrap(),
            Some(Version::first())
        );
        assert_eq!(
            store.get_aggregate_version(second).await.unwrap(),
            Some(Version::new(2))
        );
    }

    #[tokio::test]
    async fn unknown_aggregate_has_no_events() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new();

        assert!(store.get_events_for_aggregate(aggregate_id).await.unwrap().is_empty());
        assert!(!store.aggregate_exists(aggregate_id).await.unwrap());
    }

    #[tokio::test]
    async fn clones_share_streams() {
        let store = InMemoryEventStore::new();
        let clone = store.clone();
        let aggregate_id = AggregateId::new();

        clone
            .append(
                vec![create_test_event(aggregate_id, 1, "CustomerCreated")],
                AppendOptions::expect_new(),
            )
            .await
            .unwrap();

        assert!(store.aggregate_exists(aggregate_id).await.unwrap());
        store.clear().await;
        assert_eq!(clone.event_count().await, 0);
    }
}
