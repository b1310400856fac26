//! JSON snapshot format for repositories.
//!
//! ```json
//! { "nodes": [ { "path": "/content/dam/foo/a/x.jpg", "kind": "asset", "size": 10 } ] }
//! ```
//!
//! `kind` defaults to `asset`; `size` is optional size metadata.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use foldersize_core::{FolderPath, Repository, RepositoryError, ResourceKind};

/// A single node in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    /// Full path of the node.
    pub path: FolderPath,
    /// Kind of the node.
    #[serde(default)]
    pub kind: ResourceKind,
    /// Size metadata in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Flat list of repository nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Nodes in any order.
    pub nodes: Vec<SnapshotNode>,
}

impl Snapshot {
    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, RepositoryError> {
        serde_json::from_str(json).map_err(|e| RepositoryError::Snapshot {
            message: e.to_string(),
        })
    }

    /// Read a snapshot file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RepositoryError::io(path, e))?;
        let snapshot = Self::from_json(&content)?;
        debug!("loaded {} snapshot nodes from {}", snapshot.nodes.len(), path.display());
        Ok(snapshot)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RepositoryError> {
        serde_json::to_string_pretty(self).map_err(|e| RepositoryError::Snapshot {
            message: e.to_string(),
        })
    }

    /// Capture everything below `root` from any repository.
    ///
    /// Folders and other non-asset nodes come from the resource listing,
    /// assets (with their size metadata) from the descendant query.
    pub fn capture<R>(repo: &R, root: &FolderPath) -> Result<Self, RepositoryError>
    where
        R: Repository + ?Sized,
    {
        let mut nodes = Vec::new();
        let mut pending = vec![root.clone()];
        while let Some(folder) = pending.pop() {
            for child in repo.list_children(&folder)? {
                match child.kind {
                    ResourceKind::Asset => {}
                    ResourceKind::Folder => {
                        pending.push(child.path.clone());
                        nodes.push(SnapshotNode {
                            path: child.path,
                            kind: child.kind,
                            size: None,
                        });
                    }
                    ResourceKind::Other => nodes.push(SnapshotNode {
                        path: child.path,
                        kind: child.kind,
                        size: None,
                    }),
                }
            }
        }

        for asset in repo.scan_descendants(root)? {
            let asset = asset?;
            nodes.push(SnapshotNode {
                path: asset.path,
                kind: ResourceKind::Asset,
                size: asset.size_bytes,
            });
        }

        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Self { nodes })
    }
}
