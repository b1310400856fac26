//! Resource and asset records exchanged with repository collaborators.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::path::FolderPath;

/// Kind of a repository node.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    /// A node that groups other nodes.
    Folder,
    /// A content asset.
    #[default]
    Asset,
    /// Anything else (symlinks, devices, unsupported node types).
    Other,
}

impl ResourceKind {
    /// Check if this is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, ResourceKind::Folder)
    }

    /// Check if this is an asset.
    pub fn is_asset(&self) -> bool {
        matches!(self, ResourceKind::Asset)
    }
}

/// An immediate child as reported by a resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildResource {
    /// Full path of the child.
    pub path: FolderPath,
    /// Kind of the child.
    pub kind: ResourceKind,
}

impl ChildResource {
    /// Create a new child record.
    pub fn new(path: FolderPath, kind: ResourceKind) -> Self {
        Self { path, kind }
    }

    /// Check if the child is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }
}

/// One asset found below a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Full path of the asset.
    pub path: FolderPath,
    /// Size metadata in bytes, when the asset carries it.
    pub size_bytes: Option<u64>,
}

impl AssetRecord {
    /// Create an asset with size metadata.
    pub fn sized(path: FolderPath, size_bytes: u64) -> Self {
        Self {
            path,
            size_bytes: Some(size_bytes),
        }
    }

    /// Create an asset without size metadata.
    pub fn without_size(path: FolderPath) -> Self {
        Self {
            path,
            size_bytes: None,
        }
    }

    /// Check if size metadata is present.
    pub fn has_size(&self) -> bool {
        self.size_bytes.is_some()
    }
}
