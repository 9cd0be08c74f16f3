//! # Registrar - User Registration Library
//!
//! This is a facade crate that re-exports all public APIs from the registrar components.
//! Use this crate to get access to all registration functionality in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! registrar = { path = "../registrar" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `UserId`, `User`, `RegistrationEvent`, etc.
//! - **Collaborator traits**: `RateLimiter`, `UserStore`, `EventQueue`
//! - **Use cases**: `RegisterUseCase`
//! - **Adapters**: `HashMapUserStore`, `SlidingWindowRateLimiter`, `BroadcastEventQueue`, etc.
//! - **Service**: `RegistrarService` - process-wide wiring with explicit shutdown

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use registrar_core::*;
}

// Re-export most commonly used core types at the root level
pub use registrar_core::{
    ContextError, DetectedBy, Email, EmailError, EventKind, Profile, RegistrationContext,
    RegistrationEvent, RegistrationOutcome, User, UserId, UserIdError,
};

// ============================================================================
// Collaborator Traits (Ports)
// ============================================================================

/// Collaborator trait definitions
pub mod ports {
    pub use registrar_core::{
        EventQueue, EventQueueError, RateLimiter, RateLimiterError, UserStore, UserStoreError,
    };
}

// Re-export collaborator traits at root level
pub use registrar_core::{
    EventQueue, EventQueueError, RateLimiter, RateLimiterError, UserStore, UserStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use registrar_application::*;
}

// Re-export use cases at root level
pub use registrar_application::{FailureKind, RegisterError, RegisterUseCase};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// In-process collaborator implementations
pub mod adapters {
    /// User store implementations
    pub mod persistence {
        pub use registrar_adapters::persistence::*;
    }

    /// Rate limiter implementations
    pub mod limiter {
        pub use registrar_adapters::limiter::*;
    }

    /// Event queue implementations
    pub mod queue {
        pub use registrar_adapters::queue::*;
    }
}

// Re-export commonly used adapters at root level
pub use registrar_adapters::{
    BroadcastEventQueue, HashMapUserStore, InMemoryEventQueue, SlidingWindowRateLimiter,
};

// ============================================================================
// Registrar Service (Main Entry Point)
// ============================================================================

/// Main registrar service
pub use registrar_service::{
    EventSettings, RateLimitSettings, RegistrarService, RegistrarSettings, init_tracing,
    install_error_reporting,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing collaborator traits
pub use async_trait::async_trait;
