//! Command handling infrastructure.

use common::{AggregateId, Failure, Outcome};
use event_store::{EventStore, EventStoreExt, Version};

use crate::aggregate::{Aggregate, AggregateRoot};
use crate::error::DomainError;
use crate::event::RecordedEvent;
use crate::repository::Repository;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult<A: Aggregate> {
    /// The aggregate after the command, with no pending events left.
    pub aggregate: AggregateRoot<A>,

    /// The events that were committed, in emission order. Empty for a no-op.
    pub events: Vec<RecordedEvent<A::Event>>,

    /// The aggregate version after the command.
    pub new_version: Version,
}

impl<A: Aggregate> CommandResult<A> {
    pub fn is_no_op(&self) -> bool {
        self.events.is_empty()
    }
}

/// Trait for commands that can be executed against an aggregate.
///
/// Commands represent an intention to perform an action. They may be rejected
/// if the aggregate's current state doesn't allow the action.
pub trait Command: Send + Sync {
    /// The type of aggregate this command targets.
    type Aggregate: Aggregate;

    /// Returns the ID of the aggregate this command targets.
    fn aggregate_id(&self) -> AggregateId;

    /// Returns who issued the command, recorded on the resulting events.
    fn actor(&self) -> Option<&str> {
        None
    }
}

/// Runs the load → decide → save cycle for one aggregate type.
///
/// Version conflicts surface as `ConcurrencyConflict` failures; the caller is
/// expected to reload and retry. Dispatching the committed events is left to
/// the caller.
pub struct CommandHandler<S, A>
where
    S: EventStore,
    A: Aggregate,
{
    repository: Repository<S, A>,
}

impl<S, A> CommandHandler<S, A>
where
    S: EventStore,
    A: Aggregate,
{
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    pub fn repository(&self) -> &Repository<S, A> {
        &self.repository
    }

    /// Creates a new aggregate with `factory` and persists its creation events.
    pub async fn create<F>(
        &self,
        aggregate_id: AggregateId,
        factory: F,
    ) -> Result<CommandResult<A>, DomainError>
    where
        F: FnOnce() -> Outcome<AggregateRoot<A>>,
    {
        if self.repository.store().aggregate_exists(aggregate_id).await? {
            return Err(Failure::business_rule(format!(
                "{} {aggregate_id} already exists",
                A::aggregate_type()
            ))
            .into());
        }

        let mut aggregate = factory()?;
        let events = self.repository.save(&mut aggregate).await?;
        let new_version = aggregate.version();

        Ok(CommandResult {
            aggregate,
            events,
            new_version,
        })
    }

    /// Loads an existing aggregate, runs `decide` against it and persists the
    /// resulting events.
    pub async fn execute<F>(
        &self,
        aggregate_id: AggregateId,
        actor: Option<&str>,
        decide: F,
    ) -> Result<CommandResult<A>, DomainError>
    where
        F: FnOnce(&A) -> Outcome<Vec<A::Event>>,
    {
        let mut aggregate = self.repository.get(aggregate_id).await?;
        aggregate.execute(actor, decide)?;
        let events = self.repository.save(&mut aggregate).await?;
        let new_version = aggregate.version();

        Ok(CommandResult {
            aggregate,
            events,
            new_version,
        })
    }
}
