//! Server configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default selector in `/<folder>.<selector>.json`.
pub const DEFAULT_SELECTOR: &str = "size";

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:4502";

/// Configuration for the HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ServerConfig {
    /// Address to listen on.
    #[builder(default = "DEFAULT_BIND.to_string()")]
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Selector that routes a folder URL to the size endpoint.
    #[builder(default = "DEFAULT_SELECTOR.to_string()")]
    #[serde(default = "default_selector")]
    pub selector: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_selector() -> String {
    DEFAULT_SELECTOR.to_string()
}

impl ServerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref selector) = self.selector {
            validate_selector(selector)?;
        }
        if let Some(ref bind) = self.bind {
            if bind.is_empty() {
                return Err("Bind address cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Check that a selector is a single non-empty URL token.
pub fn validate_selector(selector: &str) -> Result<(), String> {
    if selector.is_empty() {
        return Err("Selector cannot be empty".to_string());
    }
    if !selector
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(format!("Invalid selector: {selector:?}"));
    }
    Ok(())
}

impl ServerConfig {
    /// Create a new config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            selector: default_selector(),
        }
    }
}
