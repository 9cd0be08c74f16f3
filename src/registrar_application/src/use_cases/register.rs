use std::time::Duration;

use registrar_core::{
    DetectedBy, Email, EventKind, EventQueue, EventQueueError, RateLimiter, RateLimiterError,
    RegistrationContext, RegistrationEvent, User, UserStore, UserStoreError,
};

/// Time allowed for publishing a failure event once the registration itself
/// has already failed, independent of the caller's context.
pub const FAILURE_PUBLISH_GRACE: Duration = Duration::from_secs(1);

/// Failure category of a registration, one per failure event tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    LimitExceeded,
    LookupFailed,
    UserAlreadyExists,
    UserCreationFailed,
}

impl FailureKind {
    pub fn event_kind(&self) -> EventKind {
        match self {
            Self::LimitExceeded => EventKind::LimitExceeded,
            Self::LookupFailed => EventKind::UserLookupFailed,
            Self::UserAlreadyExists => EventKind::UserAlreadyExists,
            Self::UserCreationFailed => EventKind::UserCreationFailed,
        }
    }
}

/// Error types for register use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("limit check failed: {0}")]
    LimitExceeded(#[source] RateLimiterError),
    #[error("user lookup failed: {0}")]
    LookupFailed(#[source] UserStoreError),
    #[error("user already exists: {email}")]
    UserAlreadyExists { email: Email },
    #[error("user creation failed: {0}")]
    UserCreationFailed(#[source] UserStoreError),
}

impl RegisterError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::LimitExceeded(_) => FailureKind::LimitExceeded,
            Self::LookupFailed(_) => FailureKind::LookupFailed,
            Self::UserAlreadyExists { .. } => FailureKind::UserAlreadyExists,
            Self::UserCreationFailed(_) => FailureKind::UserCreationFailed,
        }
    }
}

/// Register use case - admits, deduplicates, persists and announces a new user
pub struct RegisterUseCase<L, U, Q>
where
    L: RateLimiter,
    U: UserStore,
    Q: EventQueue,
{
    rate_limiter: L,
    user_store: U,
    event_queue: Q,
}

impl<L, U, Q> RegisterUseCase<L, U, Q>
where
    L: RateLimiter,
    U: UserStore,
    Q: EventQueue,
{
    pub fn new(rate_limiter: L, user_store: U, event_queue: Q) -> Self {
        Self {
            rate_limiter,
            user_store,
            event_queue,
        }
    }

    /// Execute the register use case
    ///
    /// Runs limit check, duplicate lookup, create and notify in that order,
    /// stopping at the first failure. Exactly one outcome event is published
    /// per call. A failure to publish any event is logged and never changes
    /// the returned result.
    ///
    /// # Arguments
    /// * `ctx` - Cancellation and deadline, forwarded to every collaborator call
    /// * `user` - Candidate user
    ///
    /// # Returns
    /// Ok(()) once the user is persisted, or the RegisterError of the failed step
    #[tracing::instrument(
        name = "RegisterUseCase::execute",
        skip_all,
        fields(user_id = %user.id())
    )]
    pub async fn execute(
        &self,
        ctx: &RegistrationContext,
        user: User,
    ) -> Result<(), RegisterError> {
        if let Err(e) = self.check_limit(ctx).await {
            tracing::debug!(error = %e, "Registration rejected by rate limiter");
            self.publish_failure(RegistrationEvent::limit_exceeded(user, &e)).await;
            return Err(RegisterError::LimitExceeded(e));
        }

        match self.find_existing(ctx, user.email()).await {
            Ok(None) => {}
            Ok(Some(existing)) => {
                tracing::debug!(existing_user_id = %existing.id(), "Email already registered");
                let email = user.email().clone();
                let detected_by = DetectedBy::Lookup {
                    existing_user_id: existing.id().clone(),
                };
                self.publish_failure(RegistrationEvent::already_exists(user, detected_by)).await;
                return Err(RegisterError::UserAlreadyExists { email });
            }
            Err(e) => {
                tracing::debug!(error = %e, "User lookup failed");
                self.publish_failure(RegistrationEvent::lookup_failed(user, &e)).await;
                return Err(RegisterError::LookupFailed(e));
            }
        }

        match self.create(ctx, user.clone()).await {
            Ok(()) => {}
            // Another registration for the same email won the race after our lookup.
            Err(UserStoreError::UserAlreadyExists) => {
                tracing::debug!("Store reported a uniqueness conflict on create");
                let email = user.email().clone();
                self.publish_failure(RegistrationEvent::already_exists(
                    user,
                    DetectedBy::CreateConflict,
                ))
                .await;
                return Err(RegisterError::UserAlreadyExists { email });
            }
            Err(e) => {
                tracing::debug!(error = %e, "User creation failed");
                self.publish_failure(RegistrationEvent::creation_failed(user, &e)).await;
                return Err(RegisterError::UserCreationFailed(e));
            }
        }

        if let Err(e) = self
            .publish_success(ctx, RegistrationEvent::succeeded(user))
            .await
        {
            tracing::warn!(error = %e, "Failed to publish registration success event");
        }

        tracing::info!("User registered");
        Ok(())
    }

    async fn check_limit(&self, ctx: &RegistrationContext) -> Result<(), RateLimiterError> {
        ctx.run(self.rate_limiter.check_limit(ctx)).await?
    }

    async fn find_existing(
        &self,
        ctx: &RegistrationContext,
        email: &Email,
    ) -> Result<Option<User>, UserStoreError> {
        ctx.run(self.user_store.get_user_by_email(ctx, email)).await?
    }

    async fn create(&self, ctx: &RegistrationContext, user: User) -> Result<(), UserStoreError> {
        ctx.run(self.user_store.create_user(ctx, user)).await?
    }

    async fn publish_success(
        &self,
        ctx: &RegistrationContext,
        event: RegistrationEvent,
    ) -> Result<(), EventQueueError> {
        ctx.run(self.event_queue.poll_success(ctx, event)).await?
    }

    /// Publish a failure event. Errors are logged, never propagated.
    ///
    /// Runs under a fresh context bounded by [`FAILURE_PUBLISH_GRACE`], so a
    /// registration that failed because its own context was cancelled or timed
    /// out still reports its outcome.
    async fn publish_failure(&self, event: RegistrationEvent) {
        let kind = event.kind();
        let grace = RegistrationContext::new().with_timeout(FAILURE_PUBLISH_GRACE);
        let result = match grace.run(self.event_queue.poll_failure(&grace, event)).await {
            Ok(result) => result,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            tracing::warn!(
                error = %e,
                event_kind = %kind,
                "Failed to publish registration failure event"
            );
        }
    }
}
