//! The aggregate trait and the root that enforces its consistency rules.

use common::{AggregateId, Failure, Outcome};
use event_store::Version;

use crate::entity::Entity;
use crate::error::CorruptedHistory;
use crate::event::{DomainEvent, RecordedEvent};

/// Trait for event-sourced aggregate state.
///
/// Implementors hold the fields of one consistency boundary and know how to
/// move them forward by one event. They never mutate themselves outside of
/// [`Aggregate::apply`]; instead they expose decision methods of the form
/// `fn op(&self, ..) -> Outcome<Vec<Self::Event>>` which [`AggregateRoot`]
/// runs through its mutation protocol.
pub trait Aggregate: Default + Clone + Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate type name used for storage and logging.
    fn aggregate_type() -> &'static str;

    fn entity(&self) -> &Entity<Self>;

    /// Applies an event to the state.
    ///
    /// Must be deterministic and total: events are facts, so applying one
    /// cannot fail. The creation event's branch is the only place allowed to
    /// establish the entity identity.
    fn apply(&mut self, event: &RecordedEvent<Self::Event>);

    /// Returns a description of every invariant the current state violates.
    fn check_invariants(&self) -> Vec<String>;
}

/// Consistency kernel around an aggregate's state.
///
/// Owns the version counter and the list of events applied since the
/// aggregate was created or loaded. Every accepted event is applied exactly
/// once, appended to the pending list and bumps the version by one. A batch
/// that would leave the state violating an invariant is discarded whole.
///
/// The root is not synchronized: callers need exclusive access (`&mut`) for
/// the duration of a mutation.
#[derive(Debug, Clone)]
pub struct AggregateRoot<A: Aggregate> {
    state: A,
    version: Version,
    committed_version: Version,
    pending: Vec<RecordedEvent<A::Event>>,
}

impl<A: Aggregate> AggregateRoot<A> {
    /// Creates a new aggregate from the events produced by `decide`.
    ///
    /// `decide` sees the blank state and must return at least one event, the
    /// first of which establishes the identity.
    pub fn create<F>(aggregate_id: AggregateId, actor: Option<&str>, decide: F) -> Outcome<Self>
    where
        F: FnOnce(&A) -> Outcome<Vec<A::Event>>,
    {
        let mut root = Self {
            state: A::default(),
            version: Version::initial(),
            committed_version: Version::initial(),
            pending: Vec::new(),
        };

        let events = decide(&root.state)?;
        if events.is_empty() {
            return Err(Failure::business_rule(format!(
                "{} factory produced no creation event",
                A::aggregate_type()
            )));
        }

        root.record(aggregate_id, actor, events)?;
        Ok(root)
    }

    /// Runs a decision against the current state and applies what it emits.
    ///
    /// Returns the number of events applied; zero means the call was a no-op
    /// and nothing changed.
    pub fn execute<F>(&mut self, actor: Option<&str>, decide: F) -> Outcome<usize>
    where
        F: FnOnce(&A) -> Outcome<Vec<A::Event>>,
    {
        let Some(aggregate_id) = self.id() else {
            return Err(Failure::not_found(format!(
                "{} has no identity",
                A::aggregate_type()
            )));
        };

        let events = decide(&self.state).inspect_err(|failure| {
            metrics::counter!("aggregate_commands_rejected_total", "kind" => failure.kind().as_str())
                .increment(1);
        })?;

        if events.is_empty() {
            tracing::trace!(%aggregate_id, version = %self.version, "no-op command");
            return Ok(0);
        }

        self.record(aggregate_id, actor, events)
    }

    /// Rebuilds an aggregate from its committed history.
    ///
    /// Events are applied in order against the blank state. Nothing is added
    /// to the pending list and the resulting version equals the number of
    /// events. A history with gaps, foreign events or an invalid end state is
    /// rejected as corrupted.
    pub fn replay<I>(history: I) -> Result<Self, CorruptedHistory>
    where
        I: IntoIterator<Item = RecordedEvent<A::Event>>,
    {
        let mut state = A::default();
        let mut version = Version::initial();
        let mut stream_id: Option<AggregateId> = None;

        for event in history {
            let expected = version.next();
            if event.version != expected {
                return Err(CorruptedHistory::VersionGap {
                    expected,
                    found: event.version,
                });
            }
            match stream_id {
                None => stream_id = Some(event.aggregate_id),
                Some(expected) if expected != event.aggregate_id => {
                    return Err(CorruptedHistory::ForeignEvent {
                        expected,
                        found: event.aggregate_id,
                    });
                }
                Some(_) => {}
            }

            state.apply(&event);
            version = expected;
        }

        if version == Version::initial() {
            return Err(CorruptedHistory::Empty);
        }

        let violations = state.check_invariants();
        if !violations.is_empty() {
            tracing::error!(
                aggregate_type = A::aggregate_type(),
                ?violations,
                "replayed history violates invariants"
            );
            return Err(CorruptedHistory::InvariantsViolated { violations });
        }

        Ok(Self {
            state,
            version,
            committed_version: version,
            pending: Vec::new(),
        })
    }

    pub fn id(&self) -> Option<AggregateId> {
        self.state.entity().id()
    }

    /// Version after every applied event, pending ones included.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Version the store is expected to hold, i.e. before pending events.
    pub fn committed_version(&self) -> Version {
        self.committed_version
    }

    pub fn state(&self) -> &A {
        &self.state
    }

    pub fn pending_events(&self) -> &[RecordedEvent<A::Event>] {
        &self.pending
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Accepts the pending events as committed and hands them over, in
    /// emission order, for dispatch.
    pub fn take_pending_events(&mut self) -> Vec<RecordedEvent<A::Event>> {
        self.committed_version = self.version;
        std::mem::take(&mut self.pending)
    }

    /// Accepts the pending events as committed and discards them.
    pub fn mark_committed(&mut self) {
        self.take_pending_events();
    }

    /// Applies a batch against a scratch copy, checks invariants and only
    /// then makes the copy current.
    fn record(
        &mut self,
        aggregate_id: AggregateId,
        actor: Option<&str>,
        events: Vec<A::Event>,
    ) -> Outcome<usize> {
        let mut next = self.state.clone();
        let mut version = self.version;
        let mut recorded = Vec::with_capacity(events.len());

        for payload in events {
            version = version.next();
            let event = RecordedEvent::new(aggregate_id, version, actor.map(str::to_owned), payload);
            next.apply(&event);
            recorded.push(event);
        }

        let violations = next.check_invariants();
        if !violations.is_empty() {
            tracing::error!(
                aggregate_type = A::aggregate_type(),
                %aggregate_id,
                ?violations,
                "validated command would break invariants"
            );
            let failure = Failure::business_rule(violations.join("; "));
            metrics::counter!("aggregate_commands_rejected_total", "kind" => failure.kind().as_str())
                .increment(1);
            return Err(failure);
        }

        for event in &recorded {
            tracing::debug!(
                aggregate_type = A::aggregate_type(),
                %aggregate_id,
                event_type = event.event_type(),
                version = %event.version,
                "event applied"
            );
        }
        metrics::counter!("aggregate_events_applied_total", "aggregate" => A::aggregate_type())
            .increment(recorded.len() as u64);

        let applied = recorded.len();
        self.state = next;
        self.version = version;
        self.pending.extend(recorded);
        Ok(applied)
    }
}
