//! Storage abstraction for aggregate event streams.
//!
//! The kernel never talks to storage directly: a persistence adapter turns
//! pending domain events into [`EventEnvelope`]s and appends them through the
//! [`EventStore`] trait with an expected version. [`InMemoryEventStore`] is the
//! map-backed implementation used by tests and the demo binary.

pub mod error;
pub mod event;
pub mod memory;
pub mod store;

pub use common::AggregateId;
pub use error::{EventStoreError, Result};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventId, Version};
pub use memory::InMemoryEventStore;
pub use store::{AppendOptions, EventStore, EventStoreExt};
