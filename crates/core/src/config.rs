//! Configuration management
//!
//! Loads and saves the bb configuration file, stored in TOML format at
//! ~/.config/bb/config.toml. The file names the target bucket and region,
//! the local download directory, an optional default object key for the
//! one-shot get flow, and optionally static credentials for the file-based
//! credential mode.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target store and local paths
    pub storage: StorageConfig,

    /// Static credentials for the file-based credential mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialsConfig>,
}

/// Target bucket and download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,

    /// Target bucket name
    pub bucket: String,

    /// Default key for the one-shot get flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_key: Option<String>,

    /// Local directory downloads are written to
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Custom endpoint URL for S3-compatible servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Static access credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Access key ID
    #[serde(default)]
    pub access_key: String,

    /// Secret access key
    #[serde(default)]
    pub secret_key: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Validate fields that serde alone cannot check
    fn validate(&self) -> Result<()> {
        if self.storage.bucket.is_empty() {
            return Err(Error::Config("'storage.bucket' must not be empty".into()));
        }
        if let Some(endpoint) = &self.storage.endpoint {
            url::Url::parse(endpoint).map_err(|e| {
                Error::Config(format!("invalid 'storage.endpoint' URL '{endpoint}': {e}"))
            })?;
        }
        Ok(())
    }
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("could not determine config directory".into()))?;
        let config_path = config_dir.join("bb").join("config.toml");
        Ok(Self { config_path })
    }

    /// Create a ConfigManager with a custom path (tests and the --config flag)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// A missing file is an error: the bucket and region have no usable
    /// defaults for this tool.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                self.config_path.display()
            )));
        }

        let content = std::fs::read_to_string(&self.config_path).map_err(|e| {
            Error::Config(format!(
                "failed to read {}: {e}",
                self.config_path.display()
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "failed to parse {}: {e}",
                self.config_path.display()
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk
    ///
    /// Creates parent directories if they don't exist. Sets file permissions
    /// to 600 on Unix since the file may hold credentials.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("failed to create {}: {e}", parent.display())))?;
        }

        let content = toml::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(&self.config_path, content).map_err(|e| {
            Error::Config(format!(
                "failed to write {}: {e}",
                self.config_path.display()
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions).map_err(|e| {
                Error::Config(format!(
                    "failed to set permissions on {}: {e}",
                    self.config_path.display()
                ))
            })?;
        }

        Ok(())
    }
}
