use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;

/// Run `run_once` until `shutdown` fires, sleeping for the delay it returns
/// between runs. An in-flight run is dropped on shutdown.
pub(crate) async fn run_with_shutdown<F, Fut>(
    task_name: &'static str,
    shutdown: CancellationToken,
    mut run_once: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Duration>,
{
    loop {
        let delay = tokio::select! {
            delay = run_once() => delay,
            _ = shutdown.cancelled() => {
                tracing::info!(task = task_name, "Periodic task cancelled mid-run");
                break;
            }
        };
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.cancelled() => {
                tracing::info!(task = task_name, "Periodic task shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn runs_on_returned_delay_until_cancelled() {
        let shutdown = CancellationToken::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let task = tokio::spawn({
            let shutdown = shutdown.clone();
            let runs = Arc::clone(&runs);
            async move {
                run_with_shutdown("test", shutdown, || {
                    let runs = Arc::clone(&runs);
                    async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                        Duration::from_secs(10)
                    }
                })
                .await;
            }
        });

        tokio::time::sleep(Duration::from_secs(25)).await;
        shutdown.cancel();
        task.await.unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_hung_run() {
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(run_with_shutdown("test", shutdown.clone(), || async {
            std::future::pending::<()>().await;
            Duration::from_secs(1)
        }));

        tokio::time::sleep(Duration::from_secs(1)).await;
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}
