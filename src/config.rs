use crate::filter::DEFAULT_MAX_DEPTH;
use crate::query::ResourceDefaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    /// Deepest parenthesized nesting accepted in a filter.
    pub max_depth: usize,
    pub resource: ResourceDefaults,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            profile_name: "base".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            resource: ResourceDefaults::default(),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<CompilerConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<CompilerConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<CompilerConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static CompilerConfig {
    static DEFAULT_CONFIG: LazyLock<CompilerConfig> = LazyLock::new(CompilerConfig::default);
    &DEFAULT_CONFIG
}
