pub mod context;
pub mod domain;
pub mod events;
pub mod ports;

// Re-export commonly used types for convenience
pub use context::{ContextError, RegistrationContext};

pub use domain::{
    email::{Email, EmailError},
    user::{Profile, User, UserId, UserIdError},
};

pub use events::{
    DetectedBy, DuplicateUser, EventKind, RegistrationEvent, RegistrationOutcome,
    RegistrationRejected, UserRegistered,
};

pub use ports::{
    event_queue::{EventQueue, EventQueueError},
    rate_limiter::{RateLimiter, RateLimiterError},
    user_store::{UserStore, UserStoreError},
};
