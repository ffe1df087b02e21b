//! Cooperative cancellation signal shared by a queue and its worker.

use tokio::sync::watch;

/// Read side of the shutdown signal.
///
/// Handed to every work item so long-running items can stop early. The
/// worker itself only uses it to stop waiting for the next item.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

impl Cancellation {
    pub(crate) fn new() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    /// A signal that never fires.
    pub fn never() -> Self {
        let (_, cancellation) = Self::new();
        cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested. Never resolves if the
    /// signalling side is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn fires_once_signalled() {
        let (tx, cancellation) = Cancellation::new();
        assert!(!cancellation.is_cancelled());

        tx.send_replace(true);

        cancellation.cancelled().await;
        assert!(cancellation.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn never_does_not_fire() {
        let cancellation = Cancellation::never();

        let waited =
            tokio::time::timeout(Duration::from_secs(60), cancellation.cancelled()).await;

        assert!(waited.is_err());
        assert!(!cancellation.is_cancelled());
    }
}
