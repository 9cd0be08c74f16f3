use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    context::{ContextError, RegistrationContext},
    events::RegistrationEvent,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventQueueError {
    #[error("No subscribers for event")]
    NoSubscribers,
    #[error("Failed to publish event: {0}")]
    PublishFailed(String),
    #[error("Publish interrupted: {0}")]
    Interrupted(#[from] ContextError),
}

/// Best-effort sink for registration outcome events.
#[async_trait]
pub trait EventQueue: Send + Sync {
    async fn poll_success(
        &self,
        ctx: &RegistrationContext,
        event: RegistrationEvent,
    ) -> Result<(), EventQueueError>;

    async fn poll_failure(
        &self,
        ctx: &RegistrationContext,
        event: RegistrationEvent,
    ) -> Result<(), EventQueueError>;
}

#[async_trait]
impl<T> EventQueue for Arc<T>
where
    T: EventQueue + ?Sized,
{
    async fn poll_success(
        &self,
        ctx: &RegistrationContext,
        event: RegistrationEvent,
    ) -> Result<(), EventQueueError> {
        (**self).poll_success(ctx, event).await
    }

    async fn poll_failure(
        &self,
        ctx: &RegistrationContext,
        event: RegistrationEvent,
    ) -> Result<(), EventQueueError> {
        (**self).poll_failure(ctx, event).await
    }
}
