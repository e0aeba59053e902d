//! Configuration module for the chart viewer.
//!
//! Loads YAML with environment variable interpolation and validates the
//! result. Every field has a default, so an empty document is a valid
//! configuration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chart_viewer::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod cache;
mod defaults;
mod observability;
mod provider;
mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::CacheConfig;
pub use defaults::DefaultsConfig;
pub use observability::{LogFormat, LoggingConfig, MetricsSettings, ObservabilityConfig};
pub use provider::ProviderConfig;
pub use server::ServerConfig;

use crate::domain::shared::Symbol;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Market data provider configuration.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Series cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Form defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.http_port == 0 {
        return Err(ConfigError::ValidationError(
            "server.http_port must be non-zero".to_string(),
        ));
    }

    let base_url = &config.provider.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "provider.base_url must be an http(s) URL, got '{base_url}'"
        )));
    }

    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "provider.timeout_secs must be positive".to_string(),
        ));
    }

    if config.cache.persist && config.cache.directory.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "cache.directory is required when cache.persist is true".to_string(),
        ));
    }

    Symbol::new(&config.defaults.symbol)
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("defaults.symbol: {e}")))?;

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    let level = config.observability.logging.level.to_ascii_lowercase();
    if !valid_levels.contains(&level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.level must be one of: {valid_levels:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.http_port, 8501);
        assert_eq!(config.server.listen_addr(), "0.0.0.0:8501");
        assert_eq!(config.provider.base_url, "https://query1.finance.yahoo.com");
        assert_eq!(config.provider.timeout_secs, 30);
        assert!(config.cache.persist);
        assert_eq!(config.defaults.symbol, "RELIANCE.NS");
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
        assert!(config.observability.metrics.enabled);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = match load_config_from_string("") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config.server.http_port, 8501);
    }

    #[test]
    fn test_load_minimal_config() {
        let yaml = r"
server:
  http_port: 9000
";
        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "symbol: ${CHART_VIEWER_TEST_NONEXISTENT_VAR:-AAPL}";
        assert_eq!(interpolate_env_vars(input), "symbol: AAPL");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "user_agent: ${CHART_VIEWER_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "user_agent: ");
    }

    #[test]
    fn test_validation_rejects_non_http_base_url() {
        let yaml = r#"
provider:
  base_url: "ftp://example.com"
"#;
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for ftp base_url");
        };
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_validation_rejects_bad_default_symbol() {
        let yaml = r#"
defaults:
  symbol: "NOT A TICKER"
"#;
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid symbol");
        };
        assert!(err.to_string().contains("defaults.symbol"));
    }

    #[test]
    fn test_validation_rejects_unknown_log_level() {
        let yaml = r"
observability:
  logging:
    level: verbose
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid level");
        };
        assert!(err.to_string().contains("level"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
server:
  http_port: 8080
  bind_address: "127.0.0.1"

provider:
  base_url: "http://localhost:9999"
  user_agent: "tests"
  timeout_secs: 5

cache:
  persist: false
  directory: "/tmp/series"

defaults:
  symbol: "AAPL"

observability:
  logging:
    level: "debug"
    format: "json"
  metrics:
    enabled: false
"#;
        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.server.listen_addr(), "127.0.0.1:8080");
        assert_eq!(config.provider.base_url, "http://localhost:9999");
        assert_eq!(config.provider.timeout_secs, 5);
        assert!(!config.cache.persist);
        assert_eq!(config.defaults.symbol, "AAPL");
        assert_eq!(config.observability.logging.level, "debug");
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert!(!config.observability.metrics.enabled);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = load_config(Some("/nonexistent/chart-viewer.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
