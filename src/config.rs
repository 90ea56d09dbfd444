use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{PublishError, Result};
use crate::retry::RetryPolicy;

const CONFIG_FILE_NAME: &str = "gitsync.toml";

/// Represents the complete configuration for git-sync-publish.
///
/// Every section is optional; the defaults reproduce the behavior of running
/// without any configuration file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub tagging: TaggingConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_primary_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Which branch is the mainline and which remote it is published to
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    #[serde(default = "default_primary_branch")]
    pub primary_branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            primary_branch: default_primary_branch(),
            remote: default_remote(),
        }
    }
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

/// Returns the default list of breaking change markers.
fn default_breaking_change_markers() -> Vec<String> {
    vec![
        "BREAKING CHANGE".to_string(),
        "BREAKING-CHANGE".to_string(),
    ]
}

/// Tag naming and change classification settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TaggingConfig {
    #[serde(default = "default_tag_prefix")]
    pub prefix: String,

    #[serde(default = "default_breaking_change_markers")]
    pub breaking_change_markers: Vec<String>,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        TaggingConfig {
            prefix: default_tag_prefix(),
            breaking_change_markers: default_breaking_change_markers(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    2000
}

/// Bounds for retried push operations
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

impl Config {
    /// Check values that deserialize fine but cannot drive a run
    pub fn validate(&self) -> Result<()> {
        if self.repository.primary_branch.trim().is_empty() {
            return Err(PublishError::config("repository.primary_branch must not be empty"));
        }
        if self.repository.remote.trim().is_empty() {
            return Err(PublishError::config("repository.remote must not be empty"));
        }
        if self.tagging.prefix.chars().any(|c| c.is_ascii_digit()) {
            return Err(PublishError::config(format!(
                "tagging.prefix '{}' must not contain digits",
                self.tagging.prefix
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(PublishError::config("retry.max_attempts must be at least 1"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitsync.toml` in `working_dir` (the working copy being published)
/// 3. `.gitsync.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded (and validated) or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>, working_dir: &Path) -> Result<Config> {
    let local_config = working_dir.join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        read_config_file(Path::new(path))?
    } else if local_config.exists() {
        read_config_file(&local_config)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)
        .map_err(|e| PublishError::config(format!("Invalid configuration: {}", e)))?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        PublishError::config(format!("Cannot read '{}': {}", path.display(), e))
    })
}
