//! Filesystem repository configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for serving a directory tree as a content repository.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct FsRepoConfig {
    /// Directory mapped to the repository root `/`.
    pub root: PathBuf,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden entries (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Glob patterns matched against entry names; matches are invisible.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Number of threads for descendant walks (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

fn default_true() -> bool {
    true
}

impl FsRepoConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl FsRepoConfig {
    /// Create a new config builder.
    pub fn builder() -> FsRepoConfigBuilder {
        FsRepoConfigBuilder::default()
    }

    /// Create a simple config for a root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            include_hidden: true,
            ignore_patterns: Vec::new(),
            threads: 0,
        }
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = FsRepoConfig::builder()
            .root("/srv/dam")
            .threads(4usize)
            .include_hidden(false)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/srv/dam"));
        assert_eq!(config.threads, 4);
        assert!(!config.include_hidden);
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn test_config_builder_requires_root() {
        assert!(FsRepoConfig::builder().build().is_err());
        assert!(FsRepoConfig::builder().root("").build().is_err());
    }

    #[test]
    fn test_should_skip_hidden() {
        let mut config = FsRepoConfig::new("/srv/dam");
        assert!(!config.should_skip_hidden(".git"));

        config.include_hidden = false;
        assert!(config.should_skip_hidden(".git"));
        assert!(!config.should_skip_hidden("assets"));
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: FsRepoConfig = serde_json::from_str(r#"{"root": "/srv/dam"}"#).unwrap();
        assert_eq!(config, FsRepoConfig::new("/srv/dam"));
    }
}
