//! Configuration management for snapfeed
//!
//! Handles loading and validation of TOML configuration files. The board
//! topology (lists, categories, labels) is pre-configured here; discovery is
//! out of scope.

use crate::error::ConfigError;
use crate::report::Label;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for snapfeed
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Remote board API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Screenshot capture settings
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Storage-related settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pre-configured board topology
    #[serde(default)]
    pub board: BoardConfig,
}

/// Remote board API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Pre-obtained access token; the `SNAPFEED_TOKEN` environment variable
    /// takes precedence when set
    #[serde(default)]
    pub token: String,

    /// Base URL of the board REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: default_base_url(),
        }
    }
}

/// Screenshot capture configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Whether to capture a screenshot when the form opens (default: true)
    #[serde(default = "default_include_screenshot")]
    pub include_screenshot: bool,

    /// Upper bound in seconds on waiting for the capture file to appear
    /// (default: 10)
    #[serde(default = "default_file_wait_secs")]
    pub file_wait_secs: u64,

    /// Number of attempts to read the capture file back (default: 5)
    #[serde(default = "default_read_attempts")]
    pub read_attempts: u32,

    /// Delay in milliseconds between read attempts (default: 100)
    #[serde(default = "default_read_retry_ms")]
    pub read_retry_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            include_screenshot: default_include_screenshot(),
            file_wait_secs: default_file_wait_secs(),
            read_attempts: default_read_attempts(),
            read_retry_ms: default_read_retry_ms(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Base data directory (default: ~/.snapfeed/)
    #[serde(
        default = "default_data_dir",
        deserialize_with = "deserialize_data_dir"
    )]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Pre-configured board topology: lists, categories, and labels
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Board identifier
    #[serde(default)]
    pub id: String,

    /// Names of all lists on the board
    #[serde(default)]
    pub list_names: Vec<String>,

    /// Ids of all lists on the board, parallel to `list_names`
    #[serde(default)]
    pub list_ids: Vec<String>,

    /// Category names offered to the user (default: Feedback, Bug)
    #[serde(default = "default_category_names")]
    pub category_names: Vec<String>,

    /// List ids the categories file into, parallel to `category_names`
    #[serde(default = "default_category_ids")]
    pub category_ids: Vec<String>,

    /// Priority labels offered to the user
    #[serde(default = "default_labels")]
    pub labels: Vec<Label>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            list_names: Vec::new(),
            list_ids: Vec::new(),
            category_names: default_category_names(),
            category_ids: default_category_ids(),
            labels: default_labels(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://api.trello.com/1".to_string()
}

fn default_include_screenshot() -> bool {
    true
}

fn default_file_wait_secs() -> u64 {
    10
}

fn default_read_attempts() -> u32 {
    5
}

fn default_read_retry_ms() -> u64 {
    100
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".snapfeed")
}

fn default_category_names() -> Vec<String> {
    vec!["Feedback".to_string(), "Bug".to_string()]
}

fn default_category_ids() -> Vec<String> {
    vec![String::new(), String::new()]
}

fn default_labels() -> Vec<Label> {
    vec![
        Label::new("1", None, "Low Priority"),
        Label::new("2", None, "Medium Priority"),
        Label::new("3", None, "High Priority"),
    ]
}

/// Expands tilde (~) in a path to the home directory
fn expand_tilde(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if path_str.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path_str.strip_prefix("~/").unwrap());
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    path.to_path_buf()
}

/// Custom deserializer for data_dir that expands tilde
fn deserialize_data_dir<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let path_str = String::deserialize(deserializer)?;
    let path = PathBuf::from(path_str);
    Ok(expand_tilde(&path))
}

impl Config {
    /// Validates the configuration values
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if:
    /// - `api.base_url` is empty
    /// - `capture.read_attempts` is 0
    /// - the category name/id arrays differ in length
    /// - no labels are configured
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "base_url must not be empty".to_string(),
            ));
        }

        if self.capture.read_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "read_attempts must be > 0".to_string(),
            ));
        }

        if self.board.category_names.len() != self.board.category_ids.len() {
            return Err(ConfigError::InvalidValue(format!(
                "category_names ({}) and category_ids ({}) must have the same length",
                self.board.category_names.len(),
                self.board.category_ids.len()
            )));
        }

        if self.board.labels.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one label must be configured".to_string(),
            ));
        }

        Ok(())
    }
}

/// Returns the default configuration file path (`~/.snapfeed/config.toml`)
pub fn get_default_config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

/// Loads configuration from the specified path
///
/// If the file doesn't exist, creates a default configuration file.
/// If the file is invalid or contains invalid values, returns default
/// configuration.
///
/// # Errors
/// Returns `ConfigError` only for IO errors during file creation.
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = Config::default();
        let toml_str = toml::to_string_pretty(&default_config)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, &toml_str)?;

        tracing::info!("Created default configuration file at {:?}", path);
        return Ok(default_config);
    }

    let content = fs::read_to_string(path)?;

    let config: Config = match toml::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(
                "Failed to parse configuration file {:?}: {}. Using default configuration.",
                path,
                e
            );
            return Ok(Config::default());
        }
    };

    if let Err(e) = config.validate() {
        tracing::warn!(
            "Invalid configuration in {:?}: {}. Using default configuration.",
            path,
            e
        );
        return Ok(Config::default());
    }

    Ok(config)
}

/// Loads configuration from the default path (`~/.snapfeed/config.toml`)
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from_path(&get_default_config_path())
}
