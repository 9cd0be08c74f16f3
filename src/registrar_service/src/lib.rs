mod registrar_service;
pub mod settings;
pub mod telemetry;

pub use registrar_service::RegistrarService;
pub use settings::{EventSettings, RateLimitSettings, RegistrarSettings};
pub use telemetry::{init_tracing, install_error_reporting};
