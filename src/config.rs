//! Server configuration loaded from a TOML file.
//!
//! ```toml
//! field = "@genre"
//! index = "~/data/movies.json"
//! maximum_number_of_values = 3
//! ignore_accents = true
//! ```

use crate::error::Result;
use crate::suggest::SuggestionOptions;
use crate::types::{DEFAULT_MAXIMUM_NUMBER_OF_VALUES, FieldName};
use anyhow::Context;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when no argument is given.
pub const CONFIG_ENV: &str = "FACET_SUGGEST_CONFIG";

/// Error returned for config contents that parse but cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("maximum_number_of_values must be at least 1")]
    ZeroMaximum,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Field whose values are suggested
    pub field: FieldName,
    /// Documents to index: a `.json` array or a binary snapshot
    pub index: PathBuf,
    #[serde(default = "default_maximum_number_of_values")]
    pub maximum_number_of_values: usize,
    #[serde(default = "default_ignore_accents")]
    pub ignore_accents: bool,
}

const fn default_maximum_number_of_values() -> usize {
    DEFAULT_MAXIMUM_NUMBER_OF_VALUES
}

const fn default_ignore_accents() -> bool {
    true
}

impl Config {
    /// Parse config text without touching the filesystem.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        if config.maximum_number_of_values == 0 {
            return Err(ConfigError::ZeroMaximum);
        }
        Ok(config)
    }

    /// Read a config file. A relative `index` path is resolved against the
    /// file's directory, and `~` is expanded.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config {}", path.display()))?;

        let index = PathBuf::from(&*expand_tilde(&config.index.to_string_lossy()));
        config.index = match path.parent() {
            Some(dir) if index.is_relative() => dir.join(index),
            _ => index,
        };

        tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn suggestion_options(&self) -> SuggestionOptions {
        SuggestionOptions {
            field: self.field.clone(),
            maximum_number_of_values: self.maximum_number_of_values,
            ignore_accents: self.ignore_accents,
        }
    }
}

/// Pick the config path: the explicit argument first, then [`CONFIG_ENV`].
pub fn resolve_config_path(argument: Option<String>) -> Option<PathBuf> {
    argument
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .filter(|path| !path.trim().is_empty())
        .map(|path| PathBuf::from(&*expand_tilde(&path)))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
