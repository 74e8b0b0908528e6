//! Configuration types for the scoreboard server.
//!
//! Configuration comes from three layers, lowest precedence first:
//!
//! - built-in defaults ([`Config::default`])
//! - an optional TOML file ([`Config::load_from`])
//! - command-line flags and environment variables ([`crate::cli::ServeArgs`])
//!
//! The merged result is checked with [`Config::validate`] before the server
//! starts; any error there is fatal.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP listen address.
    pub listen: String,
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub log: LogConfig,
}

/// KV store connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Redis address, `host:port` or a `redis://` URL.
    pub addr: Option<String>,
    /// Redis password; empty means none.
    pub password: String,
    /// Prefix prepended to every username to form its key.
    pub key_prefix: String,
    /// Deadline for a single store call.
    pub timeout_ms: u64,
    /// Use the in-process memory backend instead of Redis.
    pub memory: bool,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Deadline for a whole request.
    pub request_timeout_secs: u64,
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    /// Expose Prometheus metrics at `/metrics`.
    pub metrics: bool,
}

/// Log output settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub format: LogFormat,
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: constants::DEFAULT_LISTEN_ADDR.to_string(),
            store: StoreConfig::default(),
            server: ServerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            addr: None,
            password: String::new(),
            key_prefix: constants::DEFAULT_KEY_PREFIX.to_string(),
            timeout_ms: constants::DEFAULT_STORE_TIMEOUT_MS,
            memory: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            cors_origins: Vec::new(),
            metrics: false,
        }
    }
}

impl Config {
    /// Load configuration from the specified TOML file.
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - A field has the wrong type or is unknown
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration with comprehensive checks.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error listing every problem found if:
    /// - No store address is set and the memory backend is not selected
    /// - The listen address is not `host:port` (an IP or a hostname)
    /// - A timeout is zero
    /// - The key prefix contains glob metacharacters
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut result = ValidationResult::default();

        if !is_host_port(&self.listen) {
            errors.push(format!(
                "listen address '{}' must be host:port",
                self.listen
            ));
        }

        match self.store.addr.as_deref().map(str::trim) {
            _ if self.store.memory => {
                result
                    .warnings
                    .push("using in-memory store: records are lost on exit".to_string());
            },
            None | Some("") => errors.push(
                "store address is required (set REDIS_ADDR or pass --memory)".to_string(),
            ),
            Some(_) => {},
        }

        if self.store.timeout_ms == 0 {
            errors.push("store timeout must be greater than 0".to_string());
        }

        if self.server.request_timeout_secs == 0 {
            errors.push("request timeout must be greater than 0".to_string());
        }

        if self
            .store
            .key_prefix
            .contains(constants::GLOB_METACHARACTERS)
        {
            errors.push(format!(
                "key prefix '{}' must not contain glob characters {:?}",
                self.store.key_prefix,
                constants::GLOB_METACHARACTERS
            ));
        } else if self.store.key_prefix.is_empty() && !self.store.memory {
            result.warnings.push(
                "empty key prefix: records share the store namespace with other keys".to_string(),
            );
        }

        for origin in &self.server.cors_origins {
            if origin.parse::<axum::http::HeaderValue>().is_err() {
                errors.push(format!("CORS origin '{origin}' is not a valid header value"));
            }
        }

        if !errors.is_empty() {
            anyhow::bail!("Invalid configuration:\n  - {}", errors.join("\n  - "));
        }

        Ok(result)
    }
}

/// Accepts socket addresses and `hostname:port`; names resolve at bind time.
fn is_host_port(addr: &str) -> bool {
    if addr.parse::<std::net::SocketAddr>().is_ok() {
        return true;
    }
    match addr.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !host.contains(':') && port.parse::<u16>().is_ok()
        },
        None => false,
    }
}
