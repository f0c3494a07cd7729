use std::future::Future;

use tokio::{select, signal::unix::SignalKind, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use super::{RuntimeDeps, shutdown};
use crate::{error::StartupError, periodic_tasks};

pub(crate) async fn run(deps: RuntimeDeps) -> Result<(), StartupError> {
    let mut sigterm =
        tokio::signal::unix::signal(SignalKind::terminate()).map_err(StartupError::Signal)?;

    let periodic_shutdown = CancellationToken::new();
    let periodic_handle = tokio::task::spawn(periodic_tasks::run(
        deps.periodic_tasks_deps,
        deps.reservation,
        periodic_shutdown.clone(),
    ));

    // Wait for shutdown signal (SIGINT or SIGTERM)
    let shutdown_signal = async move {
        select! {
            _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT, initiating shutdown..."),
            _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating shutdown..."),
        }
    };

    supervise(shutdown_signal, periodic_shutdown, periodic_handle).await
}

async fn supervise<S>(
    shutdown_signal: S,
    periodic_shutdown: CancellationToken,
    mut periodic_handle: JoinHandle<()>,
) -> Result<(), StartupError>
where
    S: Future<Output = ()>,
{
    select! {
        _ = shutdown_signal => {}
        result = &mut periodic_handle => {
            tracing::error!(result = ?result, "Periodic tasks exited unexpectedly");
            return Err(StartupError::PeriodicTasksExited);
        }
    }

    shutdown::graceful_shutdown(shutdown::ShutdownContext {
        periodic_shutdown,
        periodic_handle,
    })
    .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tasks_exiting_on_their_own_is_an_error() {
        let periodic_handle = tokio::spawn(async {});

        let result = supervise(
            std::future::pending(),
            CancellationToken::new(),
            periodic_handle,
        )
        .await;

        assert!(matches!(result, Err(StartupError::PeriodicTasksExited)));
    }

    #[tokio::test]
    async fn shutdown_signal_cancels_tasks() {
        let periodic_shutdown = CancellationToken::new();
        let token = periodic_shutdown.clone();
        let periodic_handle = tokio::spawn(async move { token.cancelled().await });

        let result = supervise(async {}, periodic_shutdown.clone(), periodic_handle).await;

        assert!(result.is_ok());
        assert!(periodic_shutdown.is_cancelled());
    }
}
