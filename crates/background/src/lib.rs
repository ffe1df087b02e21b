//! Background work queue.
//!
//! A [`BackgroundQueue`] accepts deferred [`WorkItem`]s from any number of
//! producers and hands them to exactly one [`QueueWorker`], which runs them
//! one at a time. Two modes are available:
//!
//! - **bounded**: producers wait once the queue holds `capacity` items
//! - **unbounded**: producers never wait
//!
//! Execution is at most once and best effort. An item that fails or panics is
//! logged and the worker moves on. Shutting down stops the worker from waiting
//! for more items but lets the item in flight finish; items still queued are
//! dropped.

mod cancellation;
mod error;
mod queue;
mod worker;

pub use cancellation::Cancellation;
pub use error::{QueueError, WorkError};
pub use queue::{BackgroundQueue, WorkItem};
pub use worker::QueueWorker;
