use std::time::Duration;

use registrar_adapters::{BroadcastEventQueue, HashMapUserStore, SlidingWindowRateLimiter};
use registrar_application::{RegisterError, RegisterUseCase};
use registrar_core::{RegistrationContext, RegistrationEvent, User};
use tokio::sync::broadcast;

use crate::settings::RegistrarSettings;

/// Process-wide registration service.
///
/// Owns the collaborators and a root context. Every registration runs in a
/// child of that context bounded by the configured call timeout, and
/// [`RegistrarService::shutdown`] interrupts all of them.
pub struct RegistrarService {
    use_case: RegisterUseCase<SlidingWindowRateLimiter, HashMapUserStore, BroadcastEventQueue>,
    user_store: HashMapUserStore,
    events: BroadcastEventQueue,
    root: RegistrationContext,
    call_timeout: Duration,
}

impl RegistrarService {
    pub fn from_settings(settings: &RegistrarSettings) -> Self {
        let rate_limiter = SlidingWindowRateLimiter::new(
            settings.rate_limit.max_registrations,
            settings.rate_limit.window(),
        );
        let user_store = HashMapUserStore::new();
        let events = BroadcastEventQueue::new(settings.events.channel_capacity);

        tracing::info!(
            max_registrations = settings.rate_limit.max_registrations,
            window_secs = settings.rate_limit.window_secs,
            call_timeout_millis = settings.call_timeout_millis,
            "Registrar service configured"
        );

        Self {
            use_case: RegisterUseCase::new(rate_limiter, user_store.clone(), events.clone()),
            user_store,
            events,
            root: RegistrationContext::new(),
            call_timeout: settings.call_timeout(),
        }
    }

    /// Register `user`, bounded by the configured call timeout.
    pub async fn register(&self, user: User) -> Result<(), RegisterError> {
        let ctx = self.root.child().with_timeout(self.call_timeout);
        self.use_case.execute(&ctx, user).await
    }

    /// Receive every outcome event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistrationEvent> {
        self.events.subscribe()
    }

    pub fn user_store(&self) -> &HashMapUserStore {
        &self.user_store
    }

    /// Cancel in-flight registrations and refuse new ones.
    pub fn shutdown(&self) {
        tracing::info!("Registrar service shutting down");
        self.root.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}
