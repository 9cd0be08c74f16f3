use color_eyre::eyre::Result;
use registrar_core::{Email, User, UserId};
use registrar_service::{RegistrarService, RegistrarSettings, init_tracing, install_error_reporting};

/// Register one user from the command line against an in-process registrar.
#[tokio::main]
async fn main() -> Result<()> {
    install_error_reporting()?;
    init_tracing()?;

    let settings = RegistrarSettings::load()?;
    let service = RegistrarService::from_settings(&settings);
    let mut events = service.subscribe();

    let email = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demo@example.com".to_string());
    let user = User::new(UserId::generate(), Email::parse(email)?);

    match service.register(user).await {
        Ok(()) => tracing::info!("Registration succeeded"),
        Err(e) => tracing::warn!(error = %e, kind = ?e.kind(), "Registration failed"),
    }

    while let Ok(event) = events.try_recv() {
        tracing::info!(event_id = %event.id(), kind = %event.kind(), "Outcome event published");
    }

    service.shutdown();
    Ok(())
}
