//! Router and request handlers.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::routing::get;
use tracing::debug;

use foldersize_aggregate::{AggregateConfig, AggregationResult, FolderSizeAggregator};
use foldersize_core::Repository;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::selector::parse_request_path;

/// Repository shared by all requests.
pub type SharedRepository = Arc<dyn Repository + Send + Sync>;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<FolderSizeAggregator<SharedRepository>>,
    selector: Arc<str>,
}

impl AppState {
    /// Create handler state for a repository with default aggregation settings.
    pub fn new(repository: SharedRepository, config: &ServerConfig) -> Self {
        Self::with_aggregate_config(repository, config, AggregateConfig::default())
    }

    /// Create handler state with explicit aggregation settings.
    pub fn with_aggregate_config(
        repository: SharedRepository,
        config: &ServerConfig,
        aggregate_config: AggregateConfig,
    ) -> Self {
        Self {
            aggregator: Arc::new(FolderSizeAggregator::with_config(repository, aggregate_config)),
            selector: Arc::from(config.selector.as_str()),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/{*path}", get(folder_size))
        .fallback(unknown_route)
        .with_state(state)
}

/// Anything the routes above do not match, including `GET /`.
pub async fn unknown_route(uri: Uri) -> ApiError {
    ApiError::UnknownRoute {
        path: uri.path().to_string(),
    }
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// `GET /<folder>.<selector>.json`
///
/// Responds with the per-child-folder stats of the addressed folder.
pub async fn folder_size(
    State(state): State<AppState>,
    Path(rest): Path<String>,
) -> Result<Json<AggregationResult>, ApiError> {
    let target = parse_request_path(&format!("/{rest}"), &state.selector)?;
    debug!(target: "foldersize::server", "folder size requested for {}", target);

    let aggregator = Arc::clone(&state.aggregator);
    let report = tokio::task::spawn_blocking(move || aggregator.run(&target))
        .await
        .map_err(|e| ApiError::Internal {
            message: e.to_string(),
        })??;

    Ok(Json(report.buckets))
}
