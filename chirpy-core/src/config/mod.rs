//! Configuration management for Chirpy
//!
//! Defaults, TOML files and environment overrides, plus validation.

use crate::core_auth::{TokenSigner, DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL};
use crate::core_content::{ContentFilter, DEFAULT_BANNED_WORDS, DEFAULT_MAX_CHIRP_LENGTH};
use crate::logging::{LogConfig, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store configuration
    pub store: StoreConfig,

    /// Token configuration
    pub auth: AuthConfig,

    /// Chirp body rules
    pub content: ContentConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON database file
    pub path: PathBuf,
}

/// Token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens
    pub jwt_secret: String,

    /// Access token lifetime
    #[serde(with = "humantime_serde")]
    pub access_token_ttl: Duration,

    /// Refresh token lifetime
    #[serde(with = "humantime_serde")]
    pub refresh_token_ttl: Duration,
}

/// Chirp body rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Maximum body length in bytes
    pub max_chirp_length: usize,

    /// Words masked out of bodies
    pub banned_words: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("database.json"),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl: DEFAULT_ACCESS_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TTL,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_chirp_length: DEFAULT_MAX_CHIRP_LENGTH,
            banned_words: DEFAULT_BANNED_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl AuthConfig {
    /// Signer for the configured secret. An empty secret is refused.
    pub fn signer(&self) -> Result<TokenSigner, ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "jwt_secret must be set to issue or verify tokens".to_string(),
            ));
        }
        Ok(TokenSigner::new(&self.jwt_secret))
    }
}

impl ContentConfig {
    pub fn filter(&self) -> ContentFilter {
        ContentFilter::new(self.max_chirp_length, &self.banned_words)
    }
}

impl LoggingConfig {
    /// Logging subsystem settings for this section
    pub fn to_log_config(&self) -> Result<LogConfig, ConfigError> {
        let level: LogLevel = self
            .level
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("Invalid log level: {}", self.level)))?;

        Ok(LogConfig::new(level)
            .with_timestamp(self.with_timestamp)
            .with_target(self.with_target)
            .json_format(self.json_format))
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: CHIRPY_<SECTION>_<KEY>
    /// Example: CHIRPY_STORE_PATH=/var/lib/chirpy/database.json
    ///
    /// `JWT_SECRET` is honoured when `CHIRPY_AUTH_JWT_SECRET` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&contents)?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `CHIRPY_*` overrides looked up through `lookup`
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        // Store config
        if let Some(path) = lookup("CHIRPY_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }

        // Auth config
        if let Some(secret) = lookup("CHIRPY_AUTH_JWT_SECRET").or_else(|| lookup("JWT_SECRET")) {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("CHIRPY_AUTH_ACCESS_TOKEN_TTL") {
            self.auth.access_token_ttl = parse_duration("access token TTL", &ttl)?;
        }
        if let Some(ttl) = lookup("CHIRPY_AUTH_REFRESH_TOKEN_TTL") {
            self.auth.refresh_token_ttl = parse_duration("refresh token TTL", &ttl)?;
        }

        // Content config
        if let Some(max) = lookup("CHIRPY_CONTENT_MAX_CHIRP_LENGTH") {
            self.content.max_chirp_length = max.parse().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid max chirp length: {}", e))
            })?;
        }
        if let Some(words) = lookup("CHIRPY_CONTENT_BANNED_WORDS") {
            self.content.banned_words = words
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(String::from)
                .collect();
        }

        // Logging config
        if let Some(level) = lookup("CHIRPY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("CHIRPY_LOG_JSON") {
            self.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid JSON flag: {}", e)))?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "store path must not be empty".to_string(),
            ));
        }

        if self.auth.access_token_ttl.is_zero() || self.auth.refresh_token_ttl.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "token lifetimes must be greater than 0".to_string(),
            ));
        }

        if self.content.max_chirp_length == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_chirp_length must be greater than 0".to_string(),
            ));
        }

        if self.logging.level.parse::<LogLevel>().is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;

        std::fs::write(path, contents).map_err(|source| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}

fn parse_duration(what: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value)
        .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", what, e)))
}
