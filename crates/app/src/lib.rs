//! Customer management built on the aggregate consistency kernel.
//!
//! Commands are decided by the `Customer` aggregate, stored in an event
//! store, then dispatched to handlers that queue welcome and confirmation
//! emails for a background worker.

pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod service;
pub mod telemetry;

use std::sync::Arc;

use background::{BackgroundQueue, QueueWorker};
use dispatch::EventDispatcher;
use domain::CustomerEvent;
use event_store::EventStore;

use config::Config;
use handlers::{EmailChangeConfirmationHandler, WelcomeEmailHandler};
use mailer::Mailer;
use service::CustomerService;

/// A wired application. The worker still needs to be spawned.
///
/// The dispatcher's handlers hold queue handles of their own, so the worker
/// only stops on its own once `service` and `queue` are both dropped. Call
/// [`BackgroundQueue::shutdown`] to stop it without draining.
pub struct App<S: EventStore> {
    pub service: Arc<CustomerService<S>>,
    pub queue: BackgroundQueue,
    pub worker: QueueWorker,
}

/// Wires the customer service, its email handlers and the background queue.
pub fn create_app<S: EventStore>(store: S, config: &Config, mailer: Arc<dyn Mailer>) -> App<S> {
    let (queue, worker) = config.background_queue();

    let mut dispatcher = EventDispatcher::<CustomerEvent>::new();
    dispatcher
        .subscribe(Arc::new(WelcomeEmailHandler::new(queue.clone(), mailer.clone())))
        .subscribe(Arc::new(EmailChangeConfirmationHandler::new(queue.clone(), mailer)));

    App {
        service: Arc::new(CustomerService::new(store, dispatcher)),
        queue,
        worker,
    }
}
