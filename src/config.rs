use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::convert::DEFAULT_BASE_URI;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "BIOPAX_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

/// Output settings
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Version tag for identifiers; the source graph's own version when unset.
    #[serde(default)]
    pub db_version: Option<u32>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_validate")]
    pub validate: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            db_version: None,
            output_dir: default_output_dir(),
            base_uri: default_base_uri(),
            log_level: default_log_level(),
            validate: default_validate(),
        }
    }
}

/// Where the source graph comes from. A JSON snapshot wins over the
/// SQLite store when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub graph_path: Option<PathBuf>,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_base_uri() -> String {
    DEFAULT_BASE_URI.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_validate() -> bool {
    true
}

impl Config {
    /// Load and validate configuration
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in BIOPAX_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let config_path = Self::locate().unwrap_or_else(|| PathBuf::from("config.toml"));
        let config = Self::from_file(&config_path)?;
        config.validate()?;
        Ok(config)
    }

    /// Config file to read, if any. An explicit BIOPAX_CONFIG is returned
    /// even when the file is missing so the caller reports it.
    pub fn locate() -> Option<PathBuf> {
        // .env is optional
        let _ = dotenv::dotenv();

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from("config.toml");
        local.exists().then_some(local)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.source.graph_path.is_none() && self.source.db_path.is_none() {
            anyhow::bail!(
                "No source configured. Set source.graph_path or source.db_path in config.toml, or pass --input/--db."
            );
        }

        let base = url::Url::parse(&self.export.base_uri)
            .with_context(|| format!("export.base_uri is not a valid URL: {}", self.export.base_uri))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("export.base_uri must be a hierarchical URL: {}", self.export.base_uri);
        }
        if !self.export.base_uri.ends_with('/') {
            anyhow::bail!("export.base_uri must end with '/': {}", self.export.base_uri);
        }

        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        &self.export.output_dir
    }
}
