//! Directory tree served as a content repository.
//!
//! The configured root directory is the repository root `/`. Directories
//! are folders, regular files are assets whose size metadata is the file
//! length, and everything else is reported as [`ResourceKind::Other`].

use std::fs::{self, FileType, Metadata};
use std::io;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use jwalk::{Parallelism, WalkDir};
use tracing::debug;

use foldersize_core::{
    AssetQuery, AssetRecord, AssetStream, ChildResource, FolderPath, FsRepoConfig,
    RepositoryError, ResourceKind, ResourceTree,
};

/// Repository backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct FsRepository {
    root: PathBuf,
    config: FsRepoConfig,
    ignore: GlobSet,
}

impl FsRepository {
    /// Open the directory named by `config.root`.
    pub fn open(config: FsRepoConfig) -> Result<Self, RepositoryError> {
        let root = config
            .root
            .canonicalize()
            .map_err(|e| RepositoryError::io(&config.root, e))?;

        if !root.is_dir() {
            return Err(RepositoryError::io(
                &root,
                io::Error::new(io::ErrorKind::NotADirectory, "repository root is not a directory"),
            ));
        }

        let ignore = build_ignore_set(&config.ignore_patterns)?;
        debug!("serving {} as repository root", root.display());

        Ok(Self {
            root,
            config,
            ignore,
        })
    }

    /// Canonical directory mapped to `/`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory or file backing a repository path.
    pub fn to_fs_path(&self, path: &FolderPath) -> PathBuf {
        path.segments()
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    /// Repository path of a file below the root.
    pub fn to_folder_path(&self, fs_path: &Path) -> Option<FolderPath> {
        let relative = fs_path.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Option<_>>()?;
        FolderPath::from_segments(segments.iter().map(String::as_str)).ok()
    }

    fn is_visible(&self, name: &str) -> bool {
        !self.config.should_skip_hidden(name) && !self.ignore.is_match(name)
    }

    fn metadata(&self, fs_path: &Path) -> io::Result<Metadata> {
        if self.config.follow_symlinks {
            fs::metadata(fs_path)
        } else {
            fs::symlink_metadata(fs_path)
        }
    }

    fn not_found_or_io(
        &self,
        path: &FolderPath,
        fs_path: &Path,
        err: io::Error,
    ) -> RepositoryError {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                RepositoryError::NotFound { path: path.clone() }
            }
            io::ErrorKind::PermissionDenied => {
                RepositoryError::PermissionDenied { path: path.clone() }
            }
            _ => RepositoryError::io(fs_path, err),
        }
    }

    /// Map a traversal error, keeping its I/O kind.
    fn walk_error(&self, folder: &FolderPath, err: jwalk::Error) -> RepositoryError {
        let fs_path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let path = self
            .to_folder_path(&fs_path)
            .unwrap_or_else(|| folder.clone());
        match err.into_io_error() {
            Some(io_err) => self.not_found_or_io(&path, &fs_path, io_err),
            None => RepositoryError::io(fs_path, io::Error::other("filesystem loop detected")),
        }
    }

    fn walker(&self, dir: PathBuf) -> WalkDir {
        let parallelism = match self.config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: std::time::Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let ignore = self.ignore.clone();
        WalkDir::new(dir)
            .parallelism(parallelism)
            .skip_hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|entry| {
                    entry
                        .as_ref()
                        .map(|e| !ignore.is_match(e.file_name()))
                        .unwrap_or(true)
                });
            })
    }
}

fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, RepositoryError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| RepositoryError::Query {
            message: format!("invalid ignore pattern {pattern:?}: {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| RepositoryError::Query {
        message: e.to_string(),
    })
}

fn kind_of(file_type: FileType) -> ResourceKind {
    if file_type.is_dir() {
        ResourceKind::Folder
    } else if file_type.is_file() {
        ResourceKind::Asset
    } else {
        ResourceKind::Other
    }
}

impl ResourceTree for FsRepository {
    fn kind(&self, path: &FolderPath) -> Result<Option<ResourceKind>, RepositoryError> {
        if !path.segments().all(|segment| self.is_visible(segment)) {
            return Ok(None);
        }

        let fs_path = self.to_fs_path(path);
        match self.metadata(&fs_path) {
            Ok(metadata) => Ok(Some(kind_of(metadata.file_type()))),
            // A segment naming a regular file means the path does not exist
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(self.not_found_or_io(path, &fs_path, err)),
        }
    }

    fn list_children(&self, path: &FolderPath) -> Result<Vec<ChildResource>, RepositoryError> {
        let fs_path = self.to_fs_path(path);
        let entries = fs::read_dir(&fs_path).map_err(|e| self.not_found_or_io(path, &fs_path, e))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RepositoryError::io(&fs_path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.is_visible(&name) {
                continue;
            }

            let kind = match self.metadata(&entry.path()) {
                Ok(metadata) => kind_of(metadata.file_type()),
                // Dangling symlink when following links
                Err(_) => ResourceKind::Other,
            };
            let Ok(child) = path.join(&name) else {
                continue;
            };
            children.push(ChildResource::new(child, kind));
        }

        children.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(children)
    }
}

impl AssetQuery for FsRepository {
    fn scan_descendants<'a>(
        &'a self,
        folder: &FolderPath,
    ) -> Result<AssetStream<'a>, RepositoryError> {
        match self.kind(folder)? {
            Some(ResourceKind::Folder) => {}
            Some(_) => return Ok(Box::new(std::iter::empty())),
            None => {
                return Err(RepositoryError::NotFound {
                    path: folder.clone(),
                });
            }
        }

        let walker = self.walker(self.to_fs_path(folder));
        let folder = folder.clone();
        Ok(Box::new(walker.into_iter().filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => return Some(Err(self.walk_error(&folder, err))),
            };

            if !entry.file_type().is_file() {
                return None;
            }

            let path = entry.path();
            let folder_path = self.to_folder_path(&path)?;
            let size_bytes = entry.metadata().ok().map(|m| m.len());
            Some(Ok(AssetRecord {
                path: folder_path,
                size_bytes,
            }))
        })))
    }
}
