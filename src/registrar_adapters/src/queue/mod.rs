pub mod broadcast_event_queue;
pub mod in_memory_event_queue;

pub use broadcast_event_queue::BroadcastEventQueue;
pub use in_memory_event_queue::InMemoryEventQueue;
