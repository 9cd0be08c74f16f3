//! In-process implementations of the registration collaborators.

pub mod limiter;
pub mod persistence;
pub mod queue;

pub use limiter::SlidingWindowRateLimiter;
pub use persistence::HashMapUserStore;
pub use queue::{BroadcastEventQueue, InMemoryEventQueue};
