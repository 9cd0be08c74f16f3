use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

use crate::context::{ContextError, RegistrationContext};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RateLimiterError {
    #[error("Registration limit exceeded")]
    LimitExceeded { retry_after: Option<Duration> },
    #[error("Rate limiter unavailable: {0}")]
    Unavailable(String),
    #[error("Rate limit check interrupted: {0}")]
    Interrupted(#[from] ContextError),
}

/// Admission-control gate consulted before every registration.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check_limit(&self, ctx: &RegistrationContext) -> Result<(), RateLimiterError>;
}

#[async_trait]
impl<T> RateLimiter for Arc<T>
where
    T: RateLimiter + ?Sized,
{
    async fn check_limit(&self, ctx: &RegistrationContext) -> Result<(), RateLimiterError> {
        (**self).check_limit(ctx).await
    }
}
