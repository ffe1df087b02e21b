//! Shared types for the aggregate consistency kernel.
//!
//! - [`AggregateId`]: identity of an aggregate instance
//! - [`Outcome`], [`Failure`], [`ErrorKind`]: the uniform success/failure
//!   result returned by every command and mutation
//! - [`panic_message`]: readable text for a caught panic payload

pub mod outcome;
pub mod panic;
pub mod types;

pub use outcome::{ErrorKind, Failure, Outcome};
pub use panic::panic_message;
pub use types::AggregateId;
