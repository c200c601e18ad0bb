// src/exec/cancel.rs

//! Shared cancellation signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::dag::CompletionSignal;

/// Clonable cancellation indicator observed by every task activity and by the
/// executor's join.
///
/// Cancelling never interrupts an action that is already running; it only
/// stops actions that have not started yet and lets the executor return
/// early.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    inner: Arc<CompletionSignal>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger cancellation. Returns `true` for the call that actually
    /// cancelled; later calls are no-ops.
    pub fn cancel(&self) -> bool {
        self.inner.fire()
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_fired()
    }

    /// Resolve once cancellation has been triggered.
    pub async fn cancelled(&self) {
        self.inner.wait().await
    }

    /// New signal that is cancelled whenever `self` is, but can be cancelled
    /// on its own without touching `self`.
    ///
    /// Must be called from within a Tokio runtime. The returned handle drives
    /// the link; aborting it stops forwarding.
    pub fn child(&self) -> (CancelSignal, JoinHandle<()>) {
        let child = CancelSignal::new();
        if self.is_cancelled() {
            child.cancel();
        }

        let parent = self.clone();
        let linked = child.clone();
        let link = tokio::spawn(async move {
            tokio::select! {
                _ = parent.cancelled() => {
                    linked.cancel();
                }
                _ = linked.cancelled() => {}
            }
        });
        (child, link)
    }

    /// Cancel automatically once `timeout` has elapsed.
    ///
    /// Must be called from within a Tokio runtime. Aborting the returned
    /// handle disarms the deadline.
    pub fn cancel_after(&self, timeout: Duration) -> JoinHandle<()> {
        let signal = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    if signal.cancel() {
                        info!(timeout_ms = timeout.as_millis() as u64, "deadline elapsed; cancelling run");
                    }
                }
                _ = signal.cancelled() => {}
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a = CancelSignal::new();
        let b = a.clone();
        assert!(b.cancel());
        assert!(a.is_cancelled());
        assert!(!a.cancel());
    }

    #[tokio::test]
    async fn deadline_cancels() {
        let signal = CancelSignal::new();
        let _deadline = signal.cancel_after(Duration::from_millis(20));
        tokio::time::timeout(Duration::from_secs(2), signal.cancelled())
            .await
            .expect("deadline should fire");
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn aborted_deadline_never_fires() {
        let signal = CancelSignal::new();
        let deadline = signal.cancel_after(Duration::from_millis(20));
        deadline.abort();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!signal.is_cancelled());
    }

    #[tokio::test]
    async fn parent_cancellation_reaches_child() {
        let parent = CancelSignal::new();
        let (child, _link) = parent.child();
        assert!(!child.is_cancelled());

        parent.cancel();
        tokio::time::timeout(Duration::from_secs(2), child.cancelled())
            .await
            .expect("child should follow its parent");
    }

    #[tokio::test]
    async fn child_cancellation_stays_local() {
        let parent = CancelSignal::new();
        let (child, link) = parent.child();

        child.cancel();
        tokio::time::timeout(Duration::from_secs(2), link)
            .await
            .expect("link should end once the child is cancelled")
            .unwrap();
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn child_of_cancelled_parent_starts_cancelled() {
        let parent = CancelSignal::new();
        parent.cancel();
        let (child, _link) = parent.child();
        assert!(child.is_cancelled());
    }
}
