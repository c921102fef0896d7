//! TOML Configuration File Support
//!
//! Centralized configuration loading for the Orb console, backed by a TOML
//! file at `~/.config/orb/console.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [kernel]
//! url = "http://localhost:8000"
//! request_timeout_secs = 120
//! connect_timeout_ms = 5000
//!
//! [thoughts]
//! degraded_status = "no-brain-configured"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::DEGRADED_STATUS;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Kernel section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelToml {
    /// Base URL of the kernel bridge
    pub url: Option<String>,

    /// Whole-request timeout in seconds
    pub request_timeout_secs: Option<u64>,

    /// Connection timeout in milliseconds
    pub connect_timeout_ms: Option<u64>,
}

/// Thoughts section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThoughtsToml {
    /// Status value that means "saved locally only"
    pub degraded_status: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbToml {
    /// Kernel configuration section
    pub kernel: KernelToml,

    /// Thoughts configuration section
    pub thoughts: ThoughtsToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration for the console and its controllers
#[derive(Clone, Debug)]
pub struct OrbConfig {
    /// Base URL of the kernel bridge
    pub kernel_url: String,

    /// Whole-request timeout
    pub request_timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Thought status that signals degraded mode
    pub degraded_status: String,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            kernel_url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(5),
            degraded_status: DEGRADED_STATUS.to_string(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl OrbConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check values that would make every kernel call fail
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a non-http(s) URL, a zero timeout or an
    /// empty degraded status.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.kernel_url.starts_with("http://") || self.kernel_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "kernel url must start with http:// or https://, got {:?}",
                self.kernel_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "connect timeout must be greater than zero".to_string(),
            ));
        }
        if self.degraded_status.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "degraded status must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/orb/console.toml` or
/// `~/.config/orb/console.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("orb").join("console.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<OrbConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<OrbConfig, ConfigError> {
    let mut config = OrbConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: OrbToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut OrbConfig, toml: &OrbToml) {
    if let Some(ref url) = toml.kernel.url {
        config.kernel_url = url.clone();
    }
    if let Some(secs) = toml.kernel.request_timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = toml.kernel.connect_timeout_ms {
        config.connect_timeout = Duration::from_millis(ms);
    }
    if let Some(ref status) = toml.thoughts.degraded_status {
        config.degraded_status = status.clone();
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut OrbConfig) {
    if let Ok(url) = std::env::var("ORB_KERNEL_URL") {
        config.kernel_url = url;
        config.source = ConfigSource::Env;
    }
    if let Ok(timeout) = std::env::var("ORB_REQUEST_TIMEOUT") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.request_timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(timeout) = std::env::var("ORB_CONNECT_TIMEOUT") {
        if let Ok(ms) = timeout.parse::<u64>() {
            config.connect_timeout = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(status) = std::env::var("ORB_DEGRADED_STATUS") {
        config.degraded_status = status;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Kernel URL override
    pub kernel_url: Option<String>,

    /// Request timeout override (seconds)
    pub request_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set kernel URL override
    #[must_use]
    pub fn with_kernel_url(mut self, url: String) -> Self {
        self.kernel_url = Some(url);
        self
    }

    /// Set request timeout override
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut OrbConfig) {
        if self.kernel_url.is_some() || self.request_timeout_secs.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref url) = self.kernel_url {
            config.kernel_url = url.clone();
        }

        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// Serializes tests that read or write process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_config_env_vars() {
        std::env::remove_var("ORB_KERNEL_URL");
        std::env::remove_var("ORB_REQUEST_TIMEOUT");
        std::env::remove_var("ORB_CONNECT_TIMEOUT");
        std::env::remove_var("ORB_DEGRADED_STATUS");
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = OrbConfig::default();

        assert_eq!(config.kernel_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.degraded_status, "no-brain-configured");
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("orb/console.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        let file = write_toml(
            r#"
[kernel]
url = "http://kernel.local:9000"
request_timeout_secs = 30
connect_timeout_ms = 750

[thoughts]
degraded_status = "offline"
"#,
        );

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.kernel_url, "http://kernel.local:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_millis(750));
        assert_eq!(config.degraded_status, "offline");
        assert_eq!(config.config_file_path, Some(file.path().to_path_buf()));
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_parse_partial_toml() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        let file = write_toml("[kernel]\nrequest_timeout_secs = 10\n");
        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.kernel_url, "http://localhost:8000");
        assert_eq!(config.degraded_status, "no-brain-configured");
    }

    #[test]
    fn test_missing_file_graceful() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        let path = PathBuf::from("/nonexistent/path/console.toml");
        let config = load_config_from_path(Some(path)).unwrap();

        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[kernel\nurl = 3\n");

        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    // =========================================================================
    // Priority Ordering Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        let file = write_toml(
            r#"
[kernel]
url = "http://file:8000"
request_timeout_secs = 30
"#,
        );

        std::env::set_var("ORB_KERNEL_URL", "http://env:8000");
        std::env::set_var("ORB_REQUEST_TIMEOUT", "not-a-number");

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();
        clear_config_env_vars();

        assert_eq!(config.kernel_url, "http://env:8000");
        // unparsable values are ignored, the file value stands
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = OrbConfig::default();
        config.kernel_url = "http://env:8000".to_string();
        config.source = ConfigSource::Env;

        ConfigOverrides::new()
            .with_kernel_url("http://cli:8000".to_string())
            .with_request_timeout_secs(7)
            .apply(&mut config);

        assert_eq!(config.kernel_url, "http://cli:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(7));
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = OrbConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = OrbConfig::default();
        config.kernel_url = "localhost:8000".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = OrbConfig::default();
        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = OrbConfig::default();
        config.degraded_status = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::Cli), "CLI");
        assert_eq!(format!("{}", ConfigSource::Env), "environment");
        assert_eq!(format!("{}", ConfigSource::File), "config file");
        assert_eq!(format!("{}", ConfigSource::Default), "default");
    }

    #[test]
    fn test_config_error_display() {
        let read_err = ConfigError::ReadError {
            path: PathBuf::from("/test/path"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = format!("{}", read_err);
        assert!(msg.contains("/test/path"));
        assert!(msg.contains("Failed to read"));
    }
}
