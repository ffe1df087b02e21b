//! Consumer side of the queue.

use std::panic::AssertUnwindSafe;

use common::panic_message;
use futures_util::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cancellation::Cancellation;
use crate::queue::WorkItem;

pub(crate) enum QueueReceiver {
    Bounded(mpsc::Receiver<WorkItem>),
    Unbounded(mpsc::UnboundedReceiver<WorkItem>),
}

impl QueueReceiver {
    async fn recv(&mut self) -> Option<WorkItem> {
        match self {
            QueueReceiver::Bounded(rx) => rx.recv().await,
            QueueReceiver::Unbounded(rx) => rx.recv().await,
        }
    }
}

/// The single consumer of a [`BackgroundQueue`](crate::BackgroundQueue).
pub struct QueueWorker {
    receiver: QueueReceiver,
    cancellation: Cancellation,
}

impl QueueWorker {
    pub(crate) fn new(receiver: QueueReceiver, cancellation: Cancellation) -> Self {
        Self {
            receiver,
            cancellation,
        }
    }

    pub fn cancellation(&self) -> Cancellation {
        self.cancellation.clone()
    }

    /// Waits for the next item.
    ///
    /// Returns None once shutdown is requested or every producer is gone.
    /// Shutdown wins over items that are already queued.
    pub async fn next(&mut self) -> Option<WorkItem> {
        if self.cancellation.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => None,
            item = self.receiver.recv() => item,
        }
    }

    /// Runs one item to completion. Returns false if it failed or panicked.
    pub async fn process(&self, item: WorkItem) -> bool {
        let (label, task) = item.into_parts();
        let cancellation = self.cancellation.clone();

        let outcome = AssertUnwindSafe(async move { task(cancellation).await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => {
                tracing::debug!(label = %label, "work item completed");
                metrics::counter!("background_items_processed_total").increment(1);
                true
            }
            Ok(Err(error)) => {
                tracing::error!(label = %label, %error, "work item failed");
                metrics::counter!("background_items_failed_total").increment(1);
                false
            }
            Err(payload) => {
                tracing::error!(
                    label = %label,
                    panic = %panic_message(payload.as_ref()),
                    "work item panicked"
                );
                metrics::counter!("background_items_failed_total").increment(1);
                false
            }
        }
    }

    /// Processes items until shutdown or until every producer is dropped.
    /// Returns how many items were taken off the queue.
    #[tracing::instrument(name = "background_worker", skip_all)]
    pub async fn run(mut self) -> usize {
        tracing::info!("background worker started");

        let mut taken = 0;
        while let Some(item) = self.next().await {
            taken += 1;
            self.process(item).await;
        }

        tracing::info!(taken, "background worker stopped");
        taken
    }

    /// Runs the worker on its own task.
    pub fn spawn(self) -> JoinHandle<usize> {
        tokio::spawn(self.run())
    }
}
