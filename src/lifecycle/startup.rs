//! Counted start-up barrier for multi-listener listen().
//!
//! # Responsibilities
//! - Track N asynchronous listener starts (N ∈ {0, 1, 2})
//! - Fire the ready callback exactly once, after the slowest bind
//! - Suppress the callback entirely on any bind failure, or when N = 0
//!
//! # Design Decisions
//! - Explicit counter over nested callbacks so error propagation stays
//!   visible
//! - A dropped-without-signal listener also suppresses the callback

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handed to one listener task; reports its bind outcome to the barrier.
pub struct StartSignal {
    tx: mpsc::UnboundedSender<Result<(), std::io::Error>>,
}

impl StartSignal {
    /// The listener has bound successfully.
    pub fn started(self) {
        let _ = self.tx.send(Ok(()));
    }

    /// The listener failed to bind.
    pub fn failed(self, err: std::io::Error) {
        let _ = self.tx.send(Err(err));
    }
}

/// Join/barrier over N asynchronous listener starts.
pub struct StartBarrier {
    expected: usize,
    tx: mpsc::UnboundedSender<Result<(), std::io::Error>>,
    rx: mpsc::UnboundedReceiver<Result<(), std::io::Error>>,
}

impl StartBarrier {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            expected: 0,
            tx,
            rx,
        }
    }

    /// Register one listener; returns the signal its task must complete.
    pub fn register(&mut self) -> StartSignal {
        self.expected += 1;
        StartSignal {
            tx: self.tx.clone(),
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Consume the barrier and spawn the waiter task.
    ///
    /// The callback fires exactly once, after every registered listener
    /// reports success. With zero registered listeners the callback is
    /// never invoked.
    pub fn spawn<F>(self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let StartBarrier {
            expected,
            tx,
            mut rx,
        } = self;
        drop(tx);

        tokio::spawn(async move {
            if expected == 0 {
                return;
            }

            let mut remaining = expected;
            while remaining > 0 {
                match rx.recv().await {
                    Some(Ok(())) => remaining -= 1,
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "listener failed to start");
                        return;
                    }
                    // A signal was dropped without reporting; never ready.
                    None => return,
                }
            }

            callback();
        })
    }
}

impl Default for StartBarrier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_callback_fires_once_after_the_slowest_start() {
        let mut barrier = StartBarrier::new();
        let fast = barrier.register();
        let slow = barrier.register();

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        barrier.spawn(move || {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        fast.started();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0, "must wait for the slow one");

        slow.started();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_listeners_never_fires() {
        let barrier = StartBarrier::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let waiter = barrier.spawn(move || {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        waiter.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bind_failure_suppresses_the_callback() {
        let mut barrier = StartBarrier::new();
        let ok = barrier.register();
        let bad = barrier.register();

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let waiter = barrier.spawn(move || {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        ok.started();
        bad.failed(std::io::Error::other("address in use"));

        waiter.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
