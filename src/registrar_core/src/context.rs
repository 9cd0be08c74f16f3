//! Cancellation and deadline propagation for a single registration.
//!
//! Every collaborator call made on behalf of a registration receives the same
//! [`RegistrationContext`], so upstream timeout policy applies uniformly.

use std::future::Future;

use thiserror::Error;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("operation cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RegistrationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the context to `timeout` from now. Never extends an earlier deadline.
    ///
    /// A timeout too large to represent as an instant leaves the context unbounded.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derive a context that is cancelled whenever `self` is, but can also be
    /// cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn check(&self) -> Result<(), ContextError> {
        if self.token.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the context is cancelled or its
    /// deadline passes first.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ContextError::Cancelled),
            () = deadline => Err(ContextError::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes_without_deadline() {
        let ctx = RegistrationContext::new();
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_run_on_cancelled_context_fails_fast() {
        let ctx = RegistrationContext::new();
        ctx.cancel();

        let result = ctx.run(async { 7 }).await;
        assert_eq!(result, Err(ContextError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out_at_deadline() {
        let ctx = RegistrationContext::new().with_timeout(Duration::from_millis(50));

        let result = ctx
            .run(tokio::time::sleep(Duration::from_secs(10)))
            .await;
        assert_eq!(result, Err(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_cancelling_parent_cancels_child() {
        let parent = RegistrationContext::new();
        let child = parent.child();

        parent.cancel();
        assert!(child.is_cancelled());
        assert_eq!(child.check(), Err(ContextError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancelling_child_leaves_parent_running() {
        let parent = RegistrationContext::new();
        let child = parent.child();

        child.cancel();
        assert!(!parent.is_cancelled());
        assert_eq!(parent.check(), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_keeps_earlier_deadline() {
        let ctx = RegistrationContext::new()
            .with_timeout(Duration::from_millis(10))
            .with_timeout(Duration::from_secs(60));

        let deadline = ctx.deadline().unwrap();
        assert!(deadline <= Instant::now() + Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_unrepresentable_timeout_leaves_context_unbounded() {
        let ctx = RegistrationContext::new().with_timeout(Duration::MAX);

        assert_eq!(ctx.deadline(), None);
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_timeout_keeps_existing_deadline() {
        let ctx = RegistrationContext::new()
            .with_timeout(Duration::from_millis(10))
            .with_timeout(Duration::MAX);

        let deadline = ctx.deadline().unwrap();
        assert!(deadline <= Instant::now() + Duration::from_millis(10));
    }
}
