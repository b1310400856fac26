//! In-memory repository.

use std::collections::BTreeMap;
use std::path::Path;

use foldersize_core::{
    AssetQuery, AssetRecord, AssetStream, ChildResource, FolderPath, PathError, RepositoryError,
    ResourceKind, ResourceTree,
};

use crate::snapshot::{Snapshot, SnapshotNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MemoryNode {
    kind: ResourceKind,
    size: Option<u64>,
}

/// A repository held entirely in memory.
///
/// The root `/` always exists as a folder. Inserting a node materializes
/// any missing ancestors as folders; ancestors that already exist keep
/// their kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRepository {
    nodes: BTreeMap<FolderPath, MemoryNode>,
}

impl MemoryRepository {
    /// Create a repository containing only the root folder.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            FolderPath::root(),
            MemoryNode {
                kind: ResourceKind::Folder,
                size: None,
            },
        );
        Self { nodes }
    }

    /// Insert or replace a node.
    pub fn insert(&mut self, path: FolderPath, kind: ResourceKind, size: Option<u64>) {
        if path.is_root() {
            return;
        }

        let mut ancestor = path.parent();
        while let Some(current) = ancestor {
            ancestor = current.parent();
            self.nodes.entry(current).or_insert(MemoryNode {
                kind: ResourceKind::Folder,
                size: None,
            });
        }

        self.nodes.insert(path, MemoryNode { kind, size });
    }

    /// Add a folder.
    pub fn add_folder(&mut self, path: &str) -> Result<(), PathError> {
        self.insert(path.parse()?, ResourceKind::Folder, None);
        Ok(())
    }

    /// Add an asset with optional size metadata.
    pub fn add_asset(&mut self, path: &str, size: Option<u64>) -> Result<(), PathError> {
        self.insert(path.parse()?, ResourceKind::Asset, size);
        Ok(())
    }

    /// Add a node that is neither a folder nor an asset.
    pub fn add_other(&mut self, path: &str) -> Result<(), PathError> {
        self.insert(path.parse()?, ResourceKind::Other, None);
        Ok(())
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Build a repository from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut repo = Self::new();
        for node in snapshot.nodes {
            repo.insert(node.path, node.kind, node.size);
        }
        repo
    }

    /// Parse a JSON snapshot.
    pub fn from_snapshot_json(json: &str) -> Result<Self, RepositoryError> {
        Snapshot::from_json(json).map(Self::from_snapshot)
    }

    /// Read a JSON snapshot file.
    pub fn from_snapshot_file(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        Snapshot::read(path).map(Self::from_snapshot)
    }

    /// Dump every node except the root.
    pub fn to_snapshot(&self) -> Snapshot {
        let nodes = self
            .nodes
            .iter()
            .filter(|(path, _)| !path.is_root())
            .map(|(path, node)| SnapshotNode {
                path: path.clone(),
                kind: node.kind,
                size: node.size,
            })
            .collect();
        Snapshot { nodes }
    }

    fn node(&self, path: &FolderPath) -> Result<&MemoryNode, RepositoryError> {
        self.nodes
            .get(path)
            .ok_or_else(|| RepositoryError::NotFound { path: path.clone() })
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceTree for MemoryRepository {
    fn kind(&self, path: &FolderPath) -> Result<Option<ResourceKind>, RepositoryError> {
        Ok(self.nodes.get(path).map(|node| node.kind))
    }

    fn list_children(&self, path: &FolderPath) -> Result<Vec<ChildResource>, RepositoryError> {
        if !self.node(path)?.kind.is_folder() {
            return Ok(Vec::new());
        }

        Ok(self
            .nodes
            .iter()
            .filter(|(child, _)| child.parent().as_ref() == Some(path))
            .map(|(child, node)| ChildResource::new(child.clone(), node.kind))
            .collect())
    }
}

impl AssetQuery for MemoryRepository {
    fn scan_descendants<'a>(
        &'a self,
        folder: &FolderPath,
    ) -> Result<AssetStream<'a>, RepositoryError> {
        self.node(folder)?;

        let folder = folder.clone();
        Ok(Box::new(
            self.nodes
                .iter()
                .filter(move |(path, node)| node.kind.is_asset() && folder.is_ancestor_of(path))
                .map(|(path, node)| {
                    Ok(AssetRecord {
                        path: path.clone(),
                        size_bytes: node.size,
                    })
                }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> FolderPath {
        FolderPath::parse(s).unwrap()
    }

    #[test]
    fn test_insert_materializes_ancestors() {
        let mut repo = MemoryRepository::new();
        repo.add_asset("/content/dam/foo/a/x.jpg", Some(1)).unwrap();

        assert_eq!(repo.kind(&p("/content")).unwrap(), Some(ResourceKind::Folder));
        assert_eq!(repo.kind(&p("/content/dam/foo/a")).unwrap(), Some(ResourceKind::Folder));
        assert_eq!(repo.kind(&p("/content/dam/foo/a/x.jpg")).unwrap(), Some(ResourceKind::Asset));
        assert_eq!(repo.kind(&p("/missing")).unwrap(), None);
        assert_eq!(repo.len(), 6);
    }

    #[test]
    fn test_existing_ancestor_keeps_kind() {
        let mut repo = MemoryRepository::new();
        repo.add_other("/content/link").unwrap();
        repo.add_asset("/content/link/x.jpg", None).unwrap();
        assert_eq!(repo.kind(&p("/content/link")).unwrap(), Some(ResourceKind::Other));
    }

    #[test]
    fn test_list_children_is_one_level() {
        let mut repo = MemoryRepository::new();
        repo.add_folder("/content/a").unwrap();
        repo.add_asset("/content/a/deep/x.jpg", None).unwrap();
        repo.add_asset("/content/b.jpg", Some(3)).unwrap();
        repo.add_folder("/content-other").unwrap();

        let children = repo.list_children(&p("/content")).unwrap();
        assert_eq!(
            children,
            vec![
                ChildResource::new(p("/content/a"), ResourceKind::Folder),
                ChildResource::new(p("/content/b.jpg"), ResourceKind::Asset),
            ]
        );

        assert!(repo.list_children(&p("/content/b.jpg")).unwrap().is_empty());
        assert!(matches!(
            repo.list_children(&p("/nope")),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_scan_descendants_yields_assets_only() {
        let mut repo = MemoryRepository::new();
        repo.add_asset("/content/a/x.jpg", Some(1)).unwrap();
        repo.add_asset("/content/a/b/y.jpg", None).unwrap();
        repo.add_other("/content/a/link").unwrap();
        repo.add_asset("/contentious/z.jpg", Some(2)).unwrap();

        let mut assets: Vec<_> = repo
            .scan_descendants(&p("/content"))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assets.sort_by(|a: &AssetRecord, b| a.path.cmp(&b.path));

        assert_eq!(
            assets,
            vec![
                AssetRecord::without_size(p("/content/a/b/y.jpg")),
                AssetRecord::sized(p("/content/a/x.jpg"), 1),
            ]
        );
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut repo = MemoryRepository::new();
        repo.add_asset("/content/a/x.jpg", Some(1)).unwrap();
        repo.add_other("/content/b").unwrap();

        let rebuilt = MemoryRepository::from_snapshot(repo.to_snapshot());
        assert_eq!(rebuilt, repo);
        assert!(!rebuilt.is_empty());
        assert!(MemoryRepository::new().is_empty());
    }
}
