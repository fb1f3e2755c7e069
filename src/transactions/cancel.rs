//! Cancellation for in-flight confirmation waits and event listeners.

use std::sync::Arc;
use tokio::sync::watch;

/// Handle that cancels every wait subscribed to it.
///
/// Cancellation is sticky: a wait that subscribes after [`cancel`](Self::cancel)
/// ends immediately. Cloning the token shares the same signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// Create a new, untriggered token.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to the cancellation signal.
    pub fn subscribe(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger cancellation.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Number of waits currently listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a [`CancelToken`].
#[derive(Debug)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Resolve once the token is triggered, or at once if it already was.
    ///
    /// If every token handle is dropped without triggering, this never
    /// resolves.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_wakes_subscribers() {
        let token = CancelToken::new();
        let mut a = token.subscribe();
        let mut b = token.clone().subscribe();
        assert_eq!(token.receiver_count(), 2);

        token.cancel();
        a.cancelled().await;
        b.cancelled().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_subscribe() {
        let token = CancelToken::new();
        token.cancel();
        assert!(token.is_cancelled());

        let mut late = token.subscribe();
        let result = tokio::time::timeout(Duration::from_millis(10), late.cancelled()).await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_token_never_cancels() {
        let token = CancelToken::new();
        let mut signal = token.subscribe();
        drop(token);

        let result = tokio::time::timeout(Duration::from_secs(5), signal.cancelled()).await;
        assert!(result.is_err());
    }
}
