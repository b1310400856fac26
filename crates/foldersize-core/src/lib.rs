//! Core types and traits for foldersize.
//!
//! This crate provides the data structures shared by the aggregation,
//! repository and server crates: repository paths, asset records, bucket
//! accumulators, error types and the collaborator traits a repository
//! implements.

mod config;
mod error;
mod path;
mod repository;
mod resource;
mod stats;

pub use config::{FsRepoConfig, FsRepoConfigBuilder};
pub use error::{AggregateError, AggregateWarning, MalformedPathError, PathError, RepositoryError};
pub use path::{FolderPath, SEPARATOR};
pub use repository::{AssetQuery, AssetStream, Repository, ResourceTree};
pub use resource::{AssetRecord, ChildResource, ResourceKind};
pub use stats::{AggregationResult, BucketKey, BucketStats, FolderSizeReport, RunStats};
