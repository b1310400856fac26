//! Application configuration file.
//!
//! ```toml
//! log_level = "info"
//!
//! [server]
//! bind = "127.0.0.1:4502"
//! selector = "size"
//!
//! [aggregate]
//! max_warnings = 100
//!
//! [repository]
//! backend = "filesystem"
//! root = "/srv/dam"
//! ignore_patterns = ["*.tmp"]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use foldersize_aggregate::AggregateConfig;
use foldersize_core::FsRepoConfig;
use foldersize_repo::{FsRepository, MemoryRepository};
use foldersize_server::{ServerConfig, SharedRepository};

/// Where the repository content comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum RepositorySource {
    /// A directory tree on disk.
    Filesystem(FsRepoConfig),
    /// A JSON snapshot file loaded into memory.
    Snapshot { path: PathBuf },
}

impl Default for RepositorySource {
    fn default() -> Self {
        Self::Filesystem(FsRepoConfig::new("."))
    }
}

impl RepositorySource {
    /// Open the repository for shared use.
    pub fn open(&self) -> Result<SharedRepository> {
        match self {
            Self::Filesystem(config) => {
                let repo = FsRepository::open(config.clone())
                    .with_context(|| format!("Cannot open {}", config.root.display()))?;
                Ok(Arc::new(repo))
            }
            Self::Snapshot { path } => {
                let repo = MemoryRepository::from_snapshot_file(path)
                    .with_context(|| format!("Cannot load snapshot {}", path.display()))?;
                Ok(Arc::new(repo))
            }
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// HTTP endpoint settings.
    pub server: ServerConfig,
    /// Settings shared by `serve` and `size` runs.
    pub aggregate: AggregateConfig,
    /// Repository backend.
    pub repository: RepositorySource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            aggregate: AggregateConfig::default(),
            repository: RepositorySource::default(),
        }
    }
}

impl AppConfig {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("foldersize").join("config.toml"))
    }

    /// Load an explicit config file, or the default one if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parse TOML config content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        foldersize_server::validate_selector(&config.server.selector)
            .map_err(color_eyre::eyre::Report::msg)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldersize_core::{ResourceKind, ResourceTree};

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_filesystem_backend() {
        let config = AppConfig::parse(
            r#"
            log_level = "debug"

            [server]
            bind = "0.0.0.0:8080"

            [repository]
            backend = "filesystem"
            root = "/srv/dam"
            include_hidden = false
            ignore_patterns = ["*.tmp"]
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.selector, "size");
        match config.repository {
            RepositorySource::Filesystem(fs) => {
                assert_eq!(fs.root, PathBuf::from("/srv/dam"));
                assert!(!fs.include_hidden);
                assert_eq!(fs.ignore_patterns, vec!["*.tmp".to_string()]);
            }
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn test_aggregate_section() {
        let config = AppConfig::parse("[aggregate]\nmax_warnings = 5").unwrap();
        assert_eq!(config.aggregate.max_warnings, 5);
        assert_eq!(AppConfig::parse("").unwrap().aggregate.max_warnings, 100);
    }

    #[test]
    fn test_snapshot_backend() {
        let config = AppConfig::parse(
            r#"
            [repository]
            backend = "snapshot"
            path = "dam.json"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.repository,
            RepositorySource::Snapshot {
                path: PathBuf::from("dam.json")
            }
        );
    }

    #[test]
    fn test_invalid_selector_rejected() {
        assert!(AppConfig::parse("[server]\nselector = \"\"").is_err());
    }

    #[test]
    fn test_open_snapshot_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dam.json");
        std::fs::write(&path, r#"{"nodes":[{"path":"/dam/a/x.jpg","size":3}]}"#).unwrap();

        let repo = RepositorySource::Snapshot { path }.open().unwrap();
        let kind = repo.kind(&"/dam/a".parse().unwrap()).unwrap();
        assert_eq!(kind, Some(ResourceKind::Folder));
    }
}
