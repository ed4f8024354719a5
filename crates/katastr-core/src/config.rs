use katastr_cuzk::{CUZK_API_BASE, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "KATASTR_CONFIG";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Deadline for a whole request, retries included
    pub request_timeout_secs: u64,
    /// How long in-flight requests may finish after a shutdown signal
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            shutdown_grace_secs: 5,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Registry API key; usually supplied through `CUZK_API_KEY`
    pub api_key: Option<String>,
    /// Per-attempt HTTP timeout
    pub timeout_secs: u64,
    pub max_attempts: u32,
    /// Backoff before the second attempt, doubled for each later one
    pub backoff_base_ms: u64,
    /// One upstream call may start per period
    pub rate_limit_period_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: CUZK_API_BASE.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base_ms: DEFAULT_BASE_DELAY_MS,
            rate_limit_period_ms: 1000,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn rate_limit_period(&self) -> Duration {
        Duration::from_millis(self.rate_limit_period_ms)
    }

    /// The API key, treating an empty string as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Which cache backend to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    #[default]
    Redis,
    Memory,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackendKind,
    /// `host:port` or a `redis://` URL
    pub redis_url: String,
    /// TTL for search and polygon results
    pub search_ttl_secs: u64,
    /// TTL for single-resource lookups
    pub detail_ttl_secs: u64,
    pub connect_timeout_secs: u64,
    /// Bound on each Redis command; a slower answer counts as a miss
    pub op_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Redis,
            redis_url: "localhost:6379".to_string(),
            search_ttl_secs: 60,
            detail_ttl_secs: 300,
            connect_timeout_secs: 3,
            op_timeout_ms: 3000,
        }
    }
}

impl CacheConfig {
    pub fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }

    pub fn detail_ttl(&self) -> Duration {
        Duration::from_secs(self.detail_ttl_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// `"*"` allows any origin
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed_headers: ["Accept", "Content-Type", "Authorization"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_age_secs: 300,
        }
    }
}

impl Config {
    /// Load configuration from `$KATASTR_CONFIG` or the user config directory,
    /// then apply environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            Some(path) => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse a TOML file without applying environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Apply `PORT`, `REDIS_URL`, `CUZK_API_KEY` and `CUZK_BASE_URL`.
    ///
    /// Unset and empty variables leave the current value in place.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(port) = var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(url) = var("REDIS_URL") {
            self.cache.redis_url = url;
        }
        if let Some(key) = var("CUZK_API_KEY") {
            self.upstream.api_key = Some(key);
        }
        if let Some(url) = var("CUZK_BASE_URL") {
            self.upstream.base_url = url;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.upstream.base_url, "upstream.base_url", &mut result);

        if self.server.port == 0 {
            result.add_error("server.port", "Port cannot be 0");
        }
        if self.server.request_timeout_secs == 0 {
            result.add_error("server.request_timeout_secs", "Request timeout must be greater than 0");
        }

        if self.upstream.max_attempts == 0 {
            result.add_error("upstream.max_attempts", "At least one attempt is required");
        }
        if self.upstream.rate_limit_period_ms == 0 {
            result.add_error("upstream.rate_limit_period_ms", "Rate limit period must be greater than 0");
        }
        if self.upstream.timeout_secs == 0 {
            result.add_error("upstream.timeout_secs", "Timeout must be greater than 0");
        }
        if self.upstream.api_key().is_none() {
            result.add_warning(
                "upstream.api_key",
                "CUZK API key not set - upstream requests will be rejected with 401",
            );
        }

        if self.cache.backend == CacheBackendKind::Redis && self.cache.redis_url.is_empty() {
            result.add_error("cache.redis_url", "Redis address is required for the redis backend");
        }
        if self.cache.backend == CacheBackendKind::Redis && self.cache.op_timeout_ms == 0 {
            result.add_error("cache.op_timeout_ms", "Redis operation timeout must be greater than 0");
        }
        if self.cache.search_ttl_secs == 0 {
            result.add_warning("cache.search_ttl_secs", "Search results expire immediately (0 seconds)");
        }
        if self.cache.detail_ttl_secs == 0 {
            result.add_warning("cache.detail_ttl_secs", "Detail results expire immediately (0 seconds)");
        }

        if self.cors.allowed_origins.is_empty() {
            result.add_warning("cors.allowed_origins", "No origins allowed - browsers will block cross-origin calls");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Path of the config file: `$KATASTR_CONFIG` or `<config dir>/katastr/config.toml`
    fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("katastr").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_upstream_defaults_match_client() {
        let upstream = UpstreamConfig::default();
        let client = katastr_cuzk::ClientConfig::default();
        assert_eq!(upstream.base_url, client.base_url);
        assert_eq!(upstream.timeout(), client.timeout);
        assert_eq!(upstream.max_attempts, client.retry.max_attempts);
    }

    #[test]
    fn test_zero_redis_op_timeout_rejected() {
        let mut config = Config::default();
        config.cache.op_timeout_ms = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "cache.op_timeout_ms"));
        assert_eq!(CacheConfig::default().op_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let result = Config::default().validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "upstream.api_key"));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.upstream.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "upstream.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.upstream.base_url = "ftp://api-kn.cuzk.gov.cz".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_values_are_errors() {
        let mut config = Config::default();
        config.server.port = 0;
        config.upstream.max_attempts = 0;
        config.upstream.rate_limit_period_ms = 0;
        let result = config.validate();

        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"server.port"));
        assert!(fields.contains(&"upstream.max_attempts"));
        assert!(fields.contains(&"upstream.rate_limit_period_ms"));
    }

    #[test]
    fn test_zero_ttl_is_warning() {
        let mut config = Config::default();
        config.cache.search_ttl_secs = 0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "cache.search_ttl_secs"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[
            ("PORT", "9090"),
            ("REDIS_URL", "cache:6380"),
            ("CUZK_API_KEY", "secret"),
            ("CUZK_BASE_URL", "http://localhost:3000/api"),
        ]));

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.cache.redis_url, "cache:6380");
        assert_eq!(config.upstream.api_key(), Some("secret"));
        assert_eq!(config.upstream.base_url, "http://localhost:3000/api");
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("CUZK_API_KEY", ""), ("PORT", ""), ("REDIS_URL", "")]));

        assert_eq!(config.upstream.api_key(), None);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.redis_url, "localhost:6379");
    }

    #[test]
    fn test_invalid_port_env_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("PORT", "eighty")]));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9000

[cache]
backend = "memory"
detail_ttl_secs = 600
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cache.backend, CacheBackendKind::Memory);
        assert_eq!(config.cache.detail_ttl(), Duration::from_secs(600));
        assert_eq!(config.cache.search_ttl(), Duration::from_secs(60));
        assert_eq!(config.upstream.max_attempts, 3);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        assert_eq!(result.error_summary(), "field1: error1; field2: error2");
    }
}
