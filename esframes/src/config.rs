//! Configuration management for esframes
//!
//! Default config location: ~/.esframes/config.toml

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Markers the engine wraps around highlighted phrases.
///
/// These must match the `pre_tags`/`post_tags` sent with the search request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HighlightConfig {
    #[serde(default = "default_pre_tag")]
    pub pre_tag: String,
    #[serde(default = "default_post_tag")]
    pub post_tag: String,
}

fn default_pre_tag() -> String {
    "@HIGHLIGHT@".to_string()
}

fn default_post_tag() -> String {
    "@/HIGHLIGHT@".to_string()
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            pre_tag: default_pre_tag(),
            post_tag: default_post_tag(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogsConfig {
    /// Time field used for hit frames when a target does not name one
    #[serde(default = "default_time_field")]
    pub time_field: String,
    /// Field holding the log line
    #[serde(default)]
    pub message_field: Option<String>,
    /// Field holding the log severity, remapped to `level`
    #[serde(default)]
    pub level_field: Option<String>,
}

fn default_time_field() -> String {
    "@timestamp".to_string()
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            time_field: default_time_field(),
            message_field: None,
            level_field: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL requests are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_timeout() -> u64 {
    30000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter string
    /// Override with RUST_LOG env var
    #[serde(default = "default_level")]
    pub level: String,

    /// Log output format: "pretty" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info,esframes=debug".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl Config {
    /// Default config path (~/.esframes/config.toml)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".esframes")
            .join("config.toml")
    }

    /// Load config from file path
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = expand_tilde(config_path)?;
        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file path, or create default
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        let config_path = expand_tilde(config_path)?;
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            let config = Config::default();
            // Try to save default config
            let _ = config.save(&config_path);
            Ok(config)
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.highlight.pre_tag.is_empty() || self.highlight.post_tag.is_empty() {
            return Err(anyhow!("highlight tags must not be empty"));
        }
        if self.logs.time_field.is_empty() {
            return Err(anyhow!("logs.time_field must not be empty"));
        }
        Ok(())
    }
}

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
        Ok(home.join(rest))
    } else if s == "~" {
        dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))
    } else {
        Ok(path.to_path_buf())
    }
}
