mod bootstrap;
mod config;
mod error;
mod logger;
mod periodic_tasks;
mod runtime;

pub use config::ConfigError;
pub use error::StartupError;

pub async fn run() -> Result<(), StartupError> {
    // Install rustls crypto provider before any TLS connections. A provider
    // installed earlier in the process is kept.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let bootstrap::CoreBootstrap {
        config,
        periodic_tasks_deps,
    } = bootstrap::build_core().await?;

    display_banner(&config.environment);

    runtime::run(runtime::RuntimeDeps {
        periodic_tasks_deps,
        reservation: config.reservation.clone(),
    })
    .await
}

fn display_banner(environment: &str) {
    tracing::info!("======================================================");
    tracing::info!("             Spade Client v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("======================================================");
    tracing::info!("Client is running in {} environment", environment);
}
