// src/dag/signal.rs

//! Sticky one-shot broadcast signal.
//!
//! Built on a `tokio::sync::watch<bool>` channel: the sender lives inside the
//! signal, so the value survives with or without subscribers, and every
//! waiter subscribes on demand. `wait` checks the current value before
//! suspending, which makes waiting on an already-fired signal free.

use tokio::sync::watch;

/// One-shot, idempotent, multi-waiter completion signal.
///
/// - [`fire`](Self::fire) flips the signal exactly once; later calls are
///   no-ops and never wake anyone a second time.
/// - [`wait`](Self::wait) returns once the signal has fired (immediately if
///   it already has). Any number of tasks may wait concurrently.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: watch::Sender<bool>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Fire the signal.
    ///
    /// Returns `true` only for the call that performed the transition.
    /// Concurrent callers race on the channel lock; exactly one wins.
    pub fn fire(&self) -> bool {
        self.tx.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    /// Suspend until the signal has fired.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender is owned by `self`, so the channel cannot close while we
        // hold `&self`; an error here is unreachable.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn fire_is_idempotent() {
        let signal = CompletionSignal::new();
        assert!(!signal.is_fired());
        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(signal.is_fired());
    }

    #[tokio::test]
    async fn wait_after_fire_returns_immediately() {
        let signal = CompletionSignal::new();
        signal.fire();
        tokio::time::timeout(Duration::from_millis(100), signal.wait())
            .await
            .expect("wait on fired signal must not block");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn many_waiters_are_released_by_one_fire() {
        let signal = Arc::new(CompletionSignal::new());
        let mut waiters = Vec::new();
        for _ in 0..16 {
            let s = Arc::clone(&signal);
            waiters.push(tokio::spawn(async move { s.wait().await }));
        }

        tokio::task::yield_now().await;
        signal.fire();

        for w in waiters {
            tokio::time::timeout(Duration::from_secs(1), w)
                .await
                .expect("waiter released")
                .expect("waiter did not panic");
        }
    }

    #[test]
    fn concurrent_fire_has_exactly_one_winner() {
        let signal = Arc::new(CompletionSignal::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = Arc::clone(&signal);
                std::thread::spawn(move || s.fire())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
