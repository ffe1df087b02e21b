use thiserror::Error;

/// Error returned by a work item. Any error type will do.
pub type WorkError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The queue was shut down or its worker has gone away.
    #[error("background queue has been shut down")]
    ShutDown,
}
