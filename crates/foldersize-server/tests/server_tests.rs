use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use tower::ServiceExt;

use foldersize_core::{
    AssetQuery, AssetStream, ChildResource, FolderPath, RepositoryError, ResourceKind,
    ResourceTree,
};
use foldersize_repo::MemoryRepository;
use foldersize_server::{
    AppState, ServerConfig, SharedRepository, folder_size, health, router,
};

fn dam_state() -> AppState {
    let mut repo = MemoryRepository::new();
    repo.add_folder("/content/dam/foo/a").unwrap();
    repo.add_folder("/content/dam/foo/b").unwrap();
    repo.add_asset("/content/dam/foo/a/1.jpg", Some(10)).unwrap();
    repo.add_asset("/content/dam/foo/a/x/2.jpg", Some(20)).unwrap();
    repo.add_asset("/content/dam/foo/a/x/y/3.jpg", None).unwrap();
    repo.add_asset("/content/dam/foo/b/4.jpg", Some(5)).unwrap();
    repo.add_asset("/content/dam/foo/loose.jpg", Some(1)).unwrap();

    let shared: SharedRepository = Arc::new(repo);
    AppState::new(shared, &ServerConfig::default())
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_folder_size_body() {
    let response = folder_size(State(dam_state()), Path("content/dam/foo.size.json".to_string()))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    assert_eq!(
        body_json(response).await,
        serde_json::json!({
            "/content/dam/foo/a": {"totalAssets": 3, "countedAssets": 2, "size": 30},
            "/content/dam/foo/b": {"totalAssets": 1, "countedAssets": 1, "size": 5},
        })
    );
}

#[tokio::test]
async fn test_folder_without_children_is_empty_object() {
    let response = folder_size(
        State(dam_state()),
        Path("content/dam/foo/b.size.json".to_string()),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({}));
}

#[tokio::test]
async fn test_unknown_folder_is_not_found() {
    let response = folder_size(
        State(dam_state()),
        Path("content/dam/missing.size.json".to_string()),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("/content/dam/missing"));
}

#[tokio::test]
async fn test_asset_target_is_not_found() {
    let response = folder_size(
        State(dam_state()),
        Path("content/dam/foo/loose.jpg.size.json".to_string()),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_selector_is_not_found() {
    let response = folder_size(State(dam_state()), Path("content/dam/foo.json".to_string()))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_custom_selector() {
    let mut repo = MemoryRepository::new();
    repo.add_asset("/dam/a/1.jpg", Some(2)).unwrap();
    let config = ServerConfig::builder().selector("usage").build().unwrap();
    let state = AppState::new(Arc::new(repo), &config);

    let response = folder_size(State(state.clone()), Path("dam.usage.json".to_string()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let response = folder_size(State(state), Path("dam.size.json".to_string()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Repository whose descendant query always fails.
struct BrokenQuery(MemoryRepository);

impl ResourceTree for BrokenQuery {
    fn kind(&self, path: &FolderPath) -> Result<Option<ResourceKind>, RepositoryError> {
        self.0.kind(path)
    }

    fn list_children(&self, path: &FolderPath) -> Result<Vec<ChildResource>, RepositoryError> {
        self.0.list_children(path)
    }
}

impl AssetQuery for BrokenQuery {
    fn scan_descendants<'a>(
        &'a self,
        _folder: &FolderPath,
    ) -> Result<AssetStream<'a>, RepositoryError> {
        Err(RepositoryError::Query {
            message: "malformed query".into(),
        })
    }
}

#[tokio::test]
async fn test_scan_failure_is_server_error() {
    let mut repo = MemoryRepository::new();
    repo.add_folder("/content/dam/foo/a").unwrap();
    let state = AppState::new(Arc::new(BrokenQuery(repo)), &ServerConfig::default());

    let response = folder_size(State(state), Path("content/dam/foo.size.json".to_string()))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("malformed query"));
}

#[tokio::test]
async fn test_health() {
    assert_eq!(health().await, "ok");
}

async fn get(uri: &str) -> axum::response::Response {
    router(dam_state())
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_router_serves_folder_size() {
    let response = get("/content/dam/foo.size.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body = body_json(response).await;
    assert_eq!(body["/content/dam/foo/b"]["size"], 5);
}

#[tokio::test]
async fn test_router_health() {
    let response = get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_router_unmatched_path_is_json_not_found() {
    let response = get("/").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body = body_json(response).await;
    assert_eq!(body["error"], "No such endpoint: /");
}
