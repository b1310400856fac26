//! Collaborator contracts the aggregation depends on.
//!
//! The aggregation never talks to a content store directly. It asks a
//! [`ResourceTree`] for the kind and children of a folder, and an
//! [`AssetQuery`] for every asset below it.

use crate::error::RepositoryError;
use crate::path::FolderPath;
use crate::resource::{AssetRecord, ChildResource, ResourceKind};

/// Single-use stream of descendant assets.
///
/// An `Err` item ends the scan; consumers must not keep reading after it.
pub type AssetStream<'a> = Box<dyn Iterator<Item = Result<AssetRecord, RepositoryError>> + 'a>;

/// Read access to the resource hierarchy.
pub trait ResourceTree {
    /// Kind of the node at `path`, or `None` if there is no such node.
    fn kind(&self, path: &FolderPath) -> Result<Option<ResourceKind>, RepositoryError>;

    /// Immediate children of the folder at `path`.
    fn list_children(&self, path: &FolderPath) -> Result<Vec<ChildResource>, RepositoryError>;
}

/// Query for every asset below a folder, at any depth.
pub trait AssetQuery {
    /// Open a scan of the descendants of `folder`, in unspecified order.
    fn scan_descendants<'a>(&'a self, folder: &FolderPath)
    -> Result<AssetStream<'a>, RepositoryError>;
}

/// A repository that offers both collaborators.
pub trait Repository: ResourceTree + AssetQuery {}

impl<T: ResourceTree + AssetQuery> Repository for T {}

impl<T: ResourceTree + ?Sized> ResourceTree for &T {
    fn kind(&self, path: &FolderPath) -> Result<Option<ResourceKind>, RepositoryError> {
        (**self).kind(path)
    }

    fn list_children(&self, path: &FolderPath) -> Result<Vec<ChildResource>, RepositoryError> {
        (**self).list_children(path)
    }
}

impl<T: AssetQuery + ?Sized> AssetQuery for &T {
    fn scan_descendants<'a>(
        &'a self,
        folder: &FolderPath,
    ) -> Result<AssetStream<'a>, RepositoryError> {
        (**self).scan_descendants(folder)
    }
}

impl<T: ResourceTree + ?Sized> ResourceTree for std::sync::Arc<T> {
    fn kind(&self, path: &FolderPath) -> Result<Option<ResourceKind>, RepositoryError> {
        (**self).kind(path)
    }

    fn list_children(&self, path: &FolderPath) -> Result<Vec<ChildResource>, RepositoryError> {
        (**self).list_children(path)
    }
}

impl<T: AssetQuery + ?Sized> AssetQuery for std::sync::Arc<T> {
    fn scan_descendants<'a>(
        &'a self,
        folder: &FolderPath,
    ) -> Result<AssetStream<'a>, RepositoryError> {
        (**self).scan_descendants(folder)
    }
}
