//! Configuration parsing.
//!
//! Every table and field is optional; an empty file yields the defaults,
//! which reproduce the key layout and product catalog earlier releases
//! shipped with.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::keys::Keys;

/// Products offered when no catalog is configured.
pub const DEFAULT_PRODUCTS: [&str; 13] = [
    "RockMa Better Body Butter - Vanilla Cream",
    "RockMa Better Body Butter - Choco Love",
    "RockMa Better Body Butter - Cherry Kiss",
    "RockMa Better Body Butter - Coco Beach",
    "RockMa Better Body Butter - Orange Crush",
    "RockMa Better Body Butter - Almondina",
    "RockMa Better Body Butter - Berry Patch",
    "RockMa Lips Organics - Fab 5 Flavor Boxes: Happy",
    "RockMa Lips Organics - Fab 5 Flavor Boxes: Dreamy",
    "RockMa Lips Organics - Fab 5 Flavor Boxes: Cozy",
    "RockMa Lips Organics - Fab 5 Flavor Boxes: Sunny",
    "RockMa Aesthetic Apparel",
    "RockMa Beautiful Accents",
];

/// Configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// Where and under which key prefix blobs are stored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of the on-disk store.
    pub path: PathBuf,
    /// Prepended to every blob name.
    pub key_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".copydesk"),
            key_prefix: Keys::DEFAULT_PREFIX.to_string(),
        }
    }
}

/// The product inventory used by the spotlight and product attention.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub products: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            products: DEFAULT_PRODUCTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings for binaries embedding the library.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `copydesk=debug`.
    pub level: String,
    pub format: LogFormat,
    /// `stderr`, `stdout`, or a file path to append to.
    pub output: String,
    /// ANSI colors, only honored on a terminal.
    pub color: bool,
    /// Include the event target.
    pub target: bool,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            output: "stderr".to_string(),
            color: true,
            target: false,
            timestamps: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        content.parse()
    }

    /// Key builder for the configured prefix.
    pub fn keys(&self) -> Keys {
        Keys::new(self.store.key_prefix.clone())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    /// Parse configuration from a TOML string.
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file '{0}': {1}")]
    Io(String, #[source] std::io::Error),
    /// TOML parse error.
    #[error("Failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}
