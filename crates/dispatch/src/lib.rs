//! Event dispatch for committed domain events.
//!
//! Events are wrapped in a typed [`Notification`] envelope and fanned out to
//! the handlers subscribed to their concrete payload type. Routing is static:
//! each event enum implements [`Routable`] with a table holding one handler
//! list per variant.
//!
//! Delivery is sequential and best effort. A handler that fails or panics is
//! logged and recorded in the [`DispatchReport`]; the remaining handlers and
//! events are still delivered, and nothing is retried.

pub mod customer;
pub mod dispatcher;
pub mod handler;
pub mod notification;

pub use customer::CustomerRoutes;
pub use dispatcher::{DispatchReport, EventDispatcher, Routable, Subscribe};
pub use handler::{HandlerError, HandlerFailure, Handlers, NotificationHandler};
pub use notification::{EventHeader, Notification};
