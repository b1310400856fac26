//! HTTP endpoint for foldersize.
//!
//! Serves `GET /<folder>.<selector>.json` (selector `size` by default) and
//! answers with a JSON object keyed by the paths of the folder's immediate
//! child folders:
//!
//! ```json
//! {
//!   "/content/dam/foo/a": { "totalAssets": 3, "countedAssets": 2, "size": 30 },
//!   "/content/dam/foo/b": { "totalAssets": 1, "countedAssets": 1, "size": 5 }
//! }
//! ```
//!
//! Unknown or non-folder targets yield `404`, repository failures `500`
//! (`503` when the repository reports itself unavailable), always with a
//! JSON `{ "error": ... }` body.

mod config;
mod error;
mod routes;
mod selector;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use foldersize_aggregate::AggregateConfig;

pub use config::{
    DEFAULT_BIND, DEFAULT_SELECTOR, ServerConfig, ServerConfigBuilder, validate_selector,
};
pub use error::ApiError;
pub use routes::{AppState, SharedRepository, folder_size, health, router, unknown_route};
pub use selector::parse_request_path;

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server loop failed.
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Serve a repository until Ctrl-C.
pub async fn serve(
    config: ServerConfig,
    aggregate_config: AggregateConfig,
    repository: SharedRepository,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind.as_str())
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind.clone(),
            source,
        })?;

    let local_addr = listener.local_addr()?;
    info!(
        "listening on http://{local_addr} (GET /<folder>.{}.json)",
        config.selector
    );

    let app = router(AppState::with_aggregate_config(
        repository,
        &config,
        aggregate_config,
    ));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
