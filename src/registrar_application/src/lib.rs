pub mod use_cases;

pub use use_cases::register::{FAILURE_PUBLISH_GRACE, FailureKind, RegisterError, RegisterUseCase};
