//! Customer service: load, decide, save, then dispatch.

use common::{AggregateId, Failure};
use dispatch::EventDispatcher;
use domain::{
    ActivateCustomer, AggregateRoot, ChangeAddress, ChangeEmail, ChangePhone, CommandHandler,
    CommandResult, Customer, CustomerEvent, DeactivateCustomer, DeleteCustomer, DomainError,
    RegisterCustomer, RenameCustomer,
};
use event_store::EventStore;

use crate::error::AppError;

/// Service for managing customers.
///
/// Every command runs through the command handler and, once its events are
/// stored, hands them to the dispatcher in commit order. Dispatch failures
/// are logged but never undo or fail the command.
pub struct CustomerService<S: EventStore> {
    handler: CommandHandler<S, Customer>,
    dispatcher: EventDispatcher<CustomerEvent>,
}

impl<S: EventStore> CustomerService<S> {
    pub fn new(store: S, dispatcher: EventDispatcher<CustomerEvent>) -> Self {
        Self {
            handler: CommandHandler::new(store),
            dispatcher,
        }
    }

    /// Returns a reference to the underlying command handler.
    pub fn handler(&self) -> &CommandHandler<S, Customer> {
        &self.handler
    }

    #[tracing::instrument(skip(self))]
    pub async fn register(&self, cmd: RegisterCustomer) -> Result<CommandResult<Customer>, AppError> {
        let result = self
            .handler
            .create(cmd.customer_id, || Customer::register(&cmd))
            .await;
        self.finish("register", result).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn rename(&self, cmd: RenameCustomer) -> Result<CommandResult<Customer>, AppError> {
        let result = self
            .handler
            .execute(cmd.customer_id, cmd.actor.as_deref(), |c| c.rename(&cmd.new_name))
            .await;
        self.finish("rename", result).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn change_email(&self, cmd: ChangeEmail) -> Result<CommandResult<Customer>, AppError> {
        let result = self
            .handler
            .execute(cmd.customer_id, cmd.actor.as_deref(), |c| {
                c.change_email(&cmd.new_email)
            })
            .await;
        self.finish("change_email", result).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn change_phone(&self, cmd: ChangePhone) -> Result<CommandResult<Customer>, AppError> {
        let result = self
            .handler
            .execute(cmd.customer_id, cmd.actor.as_deref(), |c| c.change_phone(&cmd.phone))
            .await;
        self.finish("change_phone", result).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn change_address(
        &self,
        cmd: ChangeAddress,
    ) -> Result<CommandResult<Customer>, AppError> {
        let result = self
            .handler
            .execute(cmd.customer_id, cmd.actor.as_deref(), |c| {
                c.change_address(&cmd.address)
            })
            .await;
        self.finish("change_address", result).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, cmd: ActivateCustomer) -> Result<CommandResult<Customer>, AppError> {
        let result = self
            .handler
            .execute(cmd.customer_id, cmd.actor.as_deref(), |c| c.activate())
            .await;
        self.finish("activate", result).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn deactivate(
        &self,
        cmd: DeactivateCustomer,
    ) -> Result<CommandResult<Customer>, AppError> {
        let result = self
            .handler
            .execute(cmd.customer_id, cmd.actor.as_deref(), |c| c.deactivate(&cmd.reason))
            .await;
        self.finish("deactivate", result).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, cmd: DeleteCustomer) -> Result<CommandResult<Customer>, AppError> {
        let result = self
            .handler
            .execute(cmd.customer_id, cmd.actor.as_deref(), |c| c.delete(&cmd.reason))
            .await;
        self.finish("delete", result).await
    }

    /// Loads a customer. Deleted customers are reported as not found.
    #[tracing::instrument(skip(self))]
    pub async fn get_customer(&self, id: AggregateId) -> Result<AggregateRoot<Customer>, AppError> {
        let customer = self.handler.repository().get(id).await?;
        if customer.state().is_deleted() {
            return Err(DomainError::from(Failure::not_found(format!("Customer {id} not found"))).into());
        }
        Ok(customer)
    }

    async fn finish(
        &self,
        command: &'static str,
        result: Result<CommandResult<Customer>, DomainError>,
    ) -> Result<CommandResult<Customer>, AppError> {
        let result = match result {
            Ok(result) => result,
            Err(err) => {
                if err.failure().is_some() {
                    tracing::info!(command, error = %err, "command rejected");
                } else {
                    tracing::error!(command, error = %err, "command failed");
                }
                metrics::counter!("customer_commands_total", "command" => command, "outcome" => "rejected")
                    .increment(1);
                return Err(err.into());
            }
        };

        metrics::counter!("customer_commands_total", "command" => command, "outcome" => "accepted")
            .increment(1);

        let report = self.dispatcher.dispatch_many(&result.events).await;
        tracing::debug!(
            command,
            version = %result.new_version,
            events = report.events,
            delivered = report.delivered,
            failed = report.failures.len(),
            "command completed"
        );

        Ok(result)
    }
}
