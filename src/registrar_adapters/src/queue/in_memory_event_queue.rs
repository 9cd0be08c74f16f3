use std::sync::Arc;
use tokio::sync::RwLock;

use registrar_core::{EventQueue, EventQueueError, RegistrationContext, RegistrationEvent};

/// Event queue that keeps every published event in memory.
///
/// Publishing can be made to fail on either channel, which is useful for
/// exercising advisory failure paths.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventQueue {
    successes: Arc<RwLock<Vec<RegistrationEvent>>>,
    failures: Arc<RwLock<Vec<RegistrationEvent>>>,
    reject_successes: bool,
    reject_failures: bool,
}

impl InMemoryEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_successes(mut self) -> Self {
        self.reject_successes = true;
        self
    }

    pub fn rejecting_failures(mut self) -> Self {
        self.reject_failures = true;
        self
    }

    pub async fn successes(&self) -> Vec<RegistrationEvent> {
        self.successes.read().await.clone()
    }

    pub async fn failures(&self) -> Vec<RegistrationEvent> {
        self.failures.read().await.clone()
    }
}

#[async_trait::async_trait]
impl EventQueue for InMemoryEventQueue {
    #[tracing::instrument(name = "Recording success event in InMemoryEventQueue", skip_all)]
    async fn poll_success(
        &self,
        ctx: &RegistrationContext,
        event: RegistrationEvent,
    ) -> Result<(), EventQueueError> {
        ctx.check()?;
        if self.reject_successes {
            return Err(EventQueueError::PublishFailed(
                "success channel rejected event".to_string(),
            ));
        }
        self.successes.write().await.push(event);
        Ok(())
    }

    #[tracing::instrument(name = "Recording failure event in InMemoryEventQueue", skip_all)]
    async fn poll_failure(
        &self,
        ctx: &RegistrationContext,
        event: RegistrationEvent,
    ) -> Result<(), EventQueueError> {
        ctx.check()?;
        if self.reject_failures {
            return Err(EventQueueError::PublishFailed(
                "failure channel rejected event".to_string(),
            ));
        }
        self.failures.write().await.push(event);
        Ok(())
    }
}
