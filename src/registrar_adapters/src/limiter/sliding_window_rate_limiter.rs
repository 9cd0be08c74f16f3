//! Sliding window admission control.
//!
//! Admits at most `max_requests` registrations in any rolling `window`.

use std::{collections::VecDeque, sync::Arc};

use registrar_core::{RateLimiter, RateLimiterError, RegistrationContext};
use tokio::{
    sync::Mutex,
    time::{Duration, Instant},
};

#[derive(Debug, Clone)]
pub struct SlidingWindowRateLimiter {
    max_requests: u32,
    window: Duration,
    admitted: Arc<Mutex<VecDeque<Instant>>>,
}

impl SlidingWindowRateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            admitted: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Admissions still counted against the current window.
    pub async fn in_window(&self) -> usize {
        let mut admitted = self.admitted.lock().await;
        evict_expired(&mut admitted, Instant::now(), self.window);
        admitted.len()
    }

    pub async fn reset(&self) {
        self.admitted.lock().await.clear();
    }
}

fn evict_expired(admitted: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = admitted.front() {
        if now.duration_since(*oldest) < window {
            break;
        }
        admitted.pop_front();
    }
}

#[async_trait::async_trait]
impl RateLimiter for SlidingWindowRateLimiter {
    #[tracing::instrument(name = "Checking SlidingWindowRateLimiter", skip_all)]
    async fn check_limit(&self, ctx: &RegistrationContext) -> Result<(), RateLimiterError> {
        ctx.check()?;

        if self.max_requests == 0 {
            return Err(RateLimiterError::LimitExceeded { retry_after: None });
        }

        let now = Instant::now();
        let mut admitted = self.admitted.lock().await;
        evict_expired(&mut admitted, now, self.window);

        if admitted.len() < self.max_requests as usize {
            admitted.push_back(now);
            return Ok(());
        }

        let retry_after = admitted
            .front()
            .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)));

        tracing::debug!(
            limit = self.max_requests,
            window_secs = self.window.as_secs(),
            "Registration limit reached"
        );

        Err(RateLimiterError::LimitExceeded { retry_after })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_core::ContextError;

    #[tokio::test(start_paused = true)]
    async fn test_admits_up_to_limit() {
        let limiter = SlidingWindowRateLimiter::new(2, Duration::from_secs(60));
        let ctx = RegistrationContext::new();

        assert!(limiter.check_limit(&ctx).await.is_ok());
        assert!(limiter.check_limit(&ctx).await.is_ok());

        let result = limiter.check_limit(&ctx).await;
        assert_eq!(
            result,
            Err(RateLimiterError::LimitExceeded {
                retry_after: Some(Duration::from_secs(60))
            })
        );
        assert_eq!(limiter.in_window().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_slides() {
        let limiter = SlidingWindowRateLimiter::new(1, Duration::from_secs(10));
        let ctx = RegistrationContext::new();

        limiter.check_limit(&ctx).await.unwrap();

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(
            limiter.check_limit(&ctx).await,
            Err(RateLimiterError::LimitExceeded {
                retry_after: Some(Duration::from_secs(6))
            })
        );

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(limiter.check_limit(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_zero_limit_rejects_everything() {
        let limiter = SlidingWindowRateLimiter::new(0, Duration::from_secs(60));

        let result = limiter.check_limit(&RegistrationContext::new()).await;
        assert_eq!(
            result,
            Err(RateLimiterError::LimitExceeded { retry_after: None })
        );
    }

    #[tokio::test]
    async fn test_reset_clears_window() {
        let limiter = SlidingWindowRateLimiter::new(1, Duration::from_secs(60));
        let ctx = RegistrationContext::new();

        limiter.check_limit(&ctx).await.unwrap();
        limiter.reset().await;

        assert!(limiter.check_limit(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_context_is_not_admitted() {
        let limiter = SlidingWindowRateLimiter::new(5, Duration::from_secs(60));
        let ctx = RegistrationContext::new();
        ctx.cancel();

        let result = limiter.check_limit(&ctx).await;
        assert_eq!(
            result,
            Err(RateLimiterError::Interrupted(ContextError::Cancelled))
        );
        assert_eq!(limiter.in_window().await, 0);
    }
}
