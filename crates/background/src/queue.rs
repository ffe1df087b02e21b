//! Producer side of the queue.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::{mpsc, watch};

use crate::cancellation::Cancellation;
use crate::error::{QueueError, WorkError};
use crate::worker::{QueueReceiver, QueueWorker};

type Task = Box<dyn FnOnce(Cancellation) -> BoxFuture<'static, Result<(), WorkError>> + Send>;

/// A unit of deferred work.
pub struct WorkItem {
    label: Cow<'static, str>,
    task: Task,
}

impl WorkItem {
    /// Wraps an async closure. `label` names the item in logs.
    pub fn new<F, Fut>(label: impl Into<Cow<'static, str>>, task: F) -> Self
    where
        F: FnOnce(Cancellation) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), WorkError>> + Send + 'static,
    {
        Self {
            label: label.into(),
            task: Box::new(move |cancellation| Box::pin(task(cancellation))),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn into_parts(self) -> (Cow<'static, str>, Task) {
        (self.label, self.task)
    }
}

impl std::fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkItem")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
enum QueueSender {
    Bounded(mpsc::Sender<WorkItem>),
    Unbounded(mpsc::UnboundedSender<WorkItem>),
}

/// Handle for enqueueing work. Cheap to clone; all clones feed the same worker.
#[derive(Clone)]
pub struct BackgroundQueue {
    sender: QueueSender,
    shutdown: Arc<watch::Sender<bool>>,
}

impl BackgroundQueue {
    /// Creates a queue holding at most `capacity` items. A capacity of zero
    /// is treated as one.
    pub fn bounded(capacity: usize) -> (Self, QueueWorker) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self::with_channel(QueueSender::Bounded(tx), QueueReceiver::Bounded(rx))
    }

    pub fn unbounded() -> (Self, QueueWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        Self::with_channel(QueueSender::Unbounded(tx), QueueReceiver::Unbounded(rx))
    }

    fn with_channel(sender: QueueSender, receiver: QueueReceiver) -> (Self, QueueWorker) {
        let (shutdown, cancellation) = Cancellation::new();
        let queue = Self {
            sender,
            shutdown: Arc::new(shutdown),
        };
        (queue, QueueWorker::new(receiver, cancellation))
    }

    /// Adds an item, waiting for a free slot if the queue is bounded and full.
    pub async fn enqueue(&self, item: WorkItem) -> Result<(), QueueError> {
        self.ensure_open()?;
        tracing::trace!(label = item.label(), "enqueueing work item");

        match &self.sender {
            QueueSender::Bounded(tx) => tx.send(item).await.map_err(|_| QueueError::ShutDown),
            QueueSender::Unbounded(tx) => tx.send(item).map_err(|_| QueueError::ShutDown),
        }
    }

    /// Adds an item from synchronous code, blocking the thread while a bounded
    /// queue is full.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime context.
    pub fn enqueue_blocking(&self, item: WorkItem) -> Result<(), QueueError> {
        self.ensure_open()?;

        match &self.sender {
            QueueSender::Bounded(tx) => tx.blocking_send(item).map_err(|_| QueueError::ShutDown),
            QueueSender::Unbounded(tx) => tx.send(item).map_err(|_| QueueError::ShutDown),
        }
    }

    /// Stops the worker from taking further items. The item in flight, if
    /// any, runs to completion; queued items are dropped with the worker.
    pub fn shutdown(&self) {
        if !self.shutdown.send_replace(true) {
            tracing::info!("background queue shutting down");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Maximum number of queued items, or None when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        match &self.sender {
            QueueSender::Bounded(tx) => Some(tx.max_capacity()),
            QueueSender::Unbounded(_) => None,
        }
    }

    fn ensure_open(&self) -> Result<(), QueueError> {
        if self.is_shut_down() {
            return Err(QueueError::ShutDown);
        }
        Ok(())
    }
}

impl std::fmt::Debug for BackgroundQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundQueue")
            .field("capacity", &self.capacity())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(label: &'static str) -> WorkItem {
        WorkItem::new(label, |_| async { Ok(()) })
    }

    #[test]
    fn zero_capacity_is_rounded_up() {
        let (queue, _worker) = BackgroundQueue::bounded(0);
        assert_eq!(queue.capacity(), Some(1));
    }

    #[test]
    fn unbounded_has_no_capacity() {
        let (queue, _worker) = BackgroundQueue::unbounded();
        assert_eq!(queue.capacity(), None);
    }

    #[tokio::test]
    async fn enqueue_after_shutdown_fails() {
        let (queue, _worker) = BackgroundQueue::unbounded();
        queue.shutdown();

        assert!(queue.is_shut_down());
        assert_eq!(queue.enqueue(noop("late")).await, Err(QueueError::ShutDown));
    }

    #[tokio::test]
    async fn enqueue_fails_once_worker_is_gone() {
        let (queue, worker) = BackgroundQueue::bounded(4);
        drop(worker);

        assert_eq!(queue.enqueue(noop("orphan")).await, Err(QueueError::ShutDown));
    }

    #[test]
    fn item_debug_shows_label() {
        let rendered = format!("{:?}", noop("send-welcome"));
        assert!(rendered.contains("send-welcome"));
    }
}
