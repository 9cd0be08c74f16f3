pub mod event_queue;
pub mod rate_limiter;
pub mod user_store;
