//! Shutdown signal handling

use std::future::Future;

use tracing::warn;

/// Resolves on Ctrl-C, or SIGTERM on unix.
///
/// If no handler can be installed the future never resolves, so the
/// caller falls back to its other exit conditions.
pub fn shutdown_signal() -> impl Future<Output = ()> {
    async {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => Some(sigterm),
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    None
                }
            };

            tokio::select! {
                _ = ctrl_c() => {}
                _ = async {
                    match sigterm.as_mut() {
                        Some(sigterm) => { sigterm.recv().await; }
                        None => std::future::pending::<()>().await,
                    }
                } => {}
            }
        }

        #[cfg(not(unix))]
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
