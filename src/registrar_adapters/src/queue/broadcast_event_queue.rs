use registrar_core::{EventQueue, EventQueueError, RegistrationContext, RegistrationEvent};
use tokio::sync::broadcast;

/// Fans outcome events out to any number of downstream consumers
/// (analytics, notification, auditing).
///
/// Slow consumers lag and miss events rather than blocking registration.
#[derive(Debug, Clone)]
pub struct BroadcastEventQueue {
    sender: broadcast::Sender<RegistrationEvent>,
}

impl BroadcastEventQueue {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistrationEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[tracing::instrument(
        name = "Broadcasting registration event",
        skip_all,
        fields(kind = %event.kind())
    )]
    fn publish(
        &self,
        ctx: &RegistrationContext,
        event: RegistrationEvent,
    ) -> Result<(), EventQueueError> {
        ctx.check()?;
        let delivered = self
            .sender
            .send(event)
            .map_err(|_| EventQueueError::NoSubscribers)?;
        tracing::debug!(delivered, "Event broadcast");
        Ok(())
    }
}

#[async_trait::async_trait]
impl EventQueue for BroadcastEventQueue {
    async fn poll_success(
        &self,
        ctx: &RegistrationContext,
        event: RegistrationEvent,
    ) -> Result<(), EventQueueError> {
        self.publish(ctx, event)
    }

    async fn poll_failure(
        &self,
        ctx: &RegistrationContext,
        event: RegistrationEvent,
    ) -> Result<(), EventQueueError> {
        self.publish(ctx, event)
    }
}
