//! Cancellation and deadline context passed to every store operation.
//!
//! An [`OpContext`] pairs an optional deadline with a cancellation token. Store
//! operations derive a bounded child from the caller's context so the tighter
//! of the two deadlines always wins.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::{StoreError, StoreResult};

/// Caller-supplied cancellation and deadline scope
#[derive(Debug, Clone)]
pub struct OpContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl Default for OpContext {
    fn default() -> Self {
        Self::background()
    }
}

impl OpContext {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self {
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    /// A context driven by an existing cancellation token
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            deadline: None,
            cancel: token,
        }
    }

    /// Bound the context by `deadline`, keeping an earlier one if present
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Bound the context to expire `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Derive a child scope that expires after `timeout` or with its parent,
    /// whichever comes first. Cancelling the parent cancels the child.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let child = Self {
            deadline: self.deadline,
            cancel: self.cancel.child_token(),
        };
        child.with_timeout(timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel this context and every child derived from it
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The error an operation started now would fail with, if any
    pub fn err(&self) -> Option<StoreError> {
        if self.cancel.is_cancelled() {
            return Some(StoreError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(StoreError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `fut` to completion unless the context is cancelled or its
    /// deadline passes first. `fut` is never polled when the context is
    /// already done.
    pub async fn run<F, T>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(StoreError::DeadlineExceeded),
                },
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(StoreError::Cancelled),
            result = bounded => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_background_context_runs_to_completion() {
        let ctx = OpContext::background();
        assert!(ctx.err().is_none());
        assert!(ctx.deadline().is_none());

        let value = ctx.run(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_expired_context_never_polls_future() {
        let ctx = OpContext::background().with_timeout(Duration::ZERO);
        let polled = AtomicBool::new(false);

        let result = ctx
            .run(async {
                polled.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(StoreError::DeadlineExceeded)));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancelled_context_fails_immediately() {
        let ctx = OpContext::background();
        ctx.cancel();

        let result = ctx.run(async { Ok(()) }).await;
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses_during_run() {
        let ctx = OpContext::background().with_timeout(Duration::from_secs(1));

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(StoreError::DeadlineExceeded)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_run() {
        let token = CancellationToken::new();
        let ctx = OpContext::with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;

        canceller.await.unwrap();
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_keeps_tighter_deadline() {
        let parent = OpContext::background().with_timeout(Duration::from_secs(2));
        let child = parent.child_with_timeout(Duration::from_secs(30));
        assert_eq!(child.deadline(), parent.deadline());

        let tight = parent.child_with_timeout(Duration::from_millis(500));
        assert!(tight.deadline().unwrap() < parent.deadline().unwrap());
    }

    #[tokio::test]
    async fn test_parent_cancellation_reaches_child() {
        let parent = OpContext::background();
        let child = parent.child_with_timeout(Duration::from_secs(30));

        parent.cancel();
        assert!(child.is_cancelled());

        let other = OpContext::background();
        let other_child = other.child_with_timeout(Duration::from_secs(30));
        other_child.cancel();
        assert!(!other.is_cancelled());
    }
}
