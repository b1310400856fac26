//! Repository backends for foldersize.
//!
//! Two implementations of the collaborator traits from `foldersize-core`:
//!
//! - [`MemoryRepository`] - an in-memory node table, usually loaded from a
//!   JSON [`Snapshot`]
//! - [`FsRepository`] - a directory tree on disk, walked in parallel with
//!   jwalk for descendant queries
//!
//! # Example
//!
//! ```rust,no_run
//! use foldersize_repo::{FsRepository, FsRepoConfig, Snapshot};
//! use foldersize_core::FolderPath;
//!
//! let repo = FsRepository::open(FsRepoConfig::new("/srv/dam")).unwrap();
//! let snapshot = Snapshot::capture(&repo, &FolderPath::root()).unwrap();
//!
//! println!("{}", snapshot.to_json().unwrap());
//! ```

mod fs;
mod memory;
mod snapshot;

pub use fs::FsRepository;
pub use memory::MemoryRepository;
pub use snapshot::{Snapshot, SnapshotNode};

// Re-export core types for convenience
pub use foldersize_core::{FsRepoConfig, FsRepoConfigBuilder, RepositoryError};
