//! Error types for path handling, repository access and aggregation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::FolderPath;

/// Errors raised while parsing or building a [`FolderPath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Empty input.
    #[error("Path is empty")]
    Empty,

    /// Path does not start at the repository root.
    #[error("Path is not absolute: {path}")]
    Relative { path: String },

    /// A `.` or `..` segment inside a path.
    #[error("Invalid segment {segment:?} in {path}")]
    InvalidSegment { path: String, segment: String },

    /// A single name that cannot be used as a segment.
    #[error("Invalid path segment: {name:?}")]
    InvalidName { name: String },
}

/// Errors reported by repository collaborators.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Path does not exist in the repository.
    #[error("Resource not found: {path}")]
    NotFound { path: FolderPath },

    /// Access to a path was refused.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: FolderPath },

    /// I/O error while reading the backing store.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descendant query could not be executed.
    #[error("Query failed: {message}")]
    Query { message: String },

    /// The repository cannot serve requests right now.
    #[error("Repository unavailable: {message}")]
    Unavailable { message: String },

    /// A snapshot file could not be decoded.
    #[error("Invalid snapshot: {message}")]
    Snapshot { message: String },
}

impl RepositoryError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the repository reported itself unavailable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Errors that abort an aggregation run.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// Target folder does not exist.
    #[error("Folder not found: {path}")]
    NotFound { path: FolderPath },

    /// Target exists but is not a folder.
    #[error("Not a folder: {path}")]
    NotAFolder { path: FolderPath },

    /// Listing the target's children failed.
    #[error("Failed to list children of {path}: {source}")]
    Listing {
        path: FolderPath,
        #[source]
        source: RepositoryError,
    },

    /// The descendant scan failed.
    #[error("Descendant scan of {path} failed: {source}")]
    ScanFailure {
        path: FolderPath,
        #[source]
        source: RepositoryError,
    },
}

impl AggregateError {
    /// Check if the failure is caused by the caller's target rather than the repository.
    pub fn is_target_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotAFolder { .. })
    }

    /// The repository error behind this failure, if any.
    pub fn repository_error(&self) -> Option<&RepositoryError> {
        match self {
            Self::Listing { source, .. } | Self::ScanFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// An asset path that does not lie below the target folder.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Asset {asset} is not a descendant of {target}")]
pub struct MalformedPathError {
    /// Folder the aggregation ran on.
    pub target: FolderPath,
    /// Offending asset path.
    pub asset: FolderPath,
}

/// Non-fatal problem recorded during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateWarning {
    /// Path the warning is about.
    pub path: FolderPath,
    /// Human-readable message.
    pub message: String,
}

impl From<MalformedPathError> for AggregateWarning {
    fn from(err: MalformedPathError) -> Self {
        Self {
            message: err.to_string(),
            path: err.asset,
        }
    }
}
