//! Listener setup and serve loop.

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::router;
use crate::config::ServerConfig;
use crate::state::AppState;

/// Bind to the configured address and serve until `shutdown` resolves.
pub async fn serve<F>(config: &ServerConfig, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!(
        listen_addr = %addr,
        snapshot_path = %config.snapshot_path.display(),
        "Bank ledger server listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped accepting connections");
    Ok(())
}
