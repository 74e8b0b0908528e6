//! Command-line interface.
//!
//! Every flag can also be set through the environment variable shown in
//! `--help`; explicit flags win over the environment, which wins over the
//! config file.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "scoreboard", version, about = "Player win-count registry backed by Redis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Validate configuration, ping the store, and exit
    Check(ServeArgs),
}

impl Command {
    /// Arguments shared by every subcommand.
    pub fn args(&self) -> &ServeArgs {
        match self {
            Self::Serve(args) | Self::Check(args) => args,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(long, short, env = "SCOREBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// HTTP listen address (host:port; hostnames resolve at bind time)
    #[arg(long, env = "SCOREBOARD_LISTEN")]
    pub listen: Option<String>,

    /// Redis address (host:port or redis:// URL)
    #[arg(long, env = "REDIS_ADDR")]
    pub redis_addr: Option<String>,

    /// Redis password (empty for none)
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    pub redis_password: Option<String>,

    /// Use an in-process store instead of Redis (data is lost on exit)
    #[arg(long)]
    pub memory: bool,

    /// Prefix prepended to every username to form its key
    #[arg(long, env = "SCOREBOARD_KEY_PREFIX")]
    pub key_prefix: Option<String>,

    /// Deadline for each store call, in milliseconds
    #[arg(long, env = "SCOREBOARD_STORE_TIMEOUT_MS")]
    pub store_timeout_ms: Option<u64>,

    /// Deadline for each HTTP request, in seconds
    #[arg(long, env = "SCOREBOARD_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Allowed CORS origins, comma separated (default: any)
    #[arg(long = "cors-origin", env = "SCOREBOARD_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Log line format
    #[arg(long, value_enum, env = "SCOREBOARD_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Expose Prometheus metrics at /metrics
    #[arg(long, env = "SCOREBOARD_METRICS")]
    pub metrics: bool,
}

impl ServeArgs {
    /// Builds the effective configuration: file (if any), then overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Applies explicitly given flags and environment variables on top of
    /// `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(listen) = &self.listen {
            config.listen.clone_from(listen);
        }
        if let Some(addr) = &self.redis_addr {
            config.store.addr = Some(addr.clone());
        }
        if let Some(password) = &self.redis_password {
            config.store.password.clone_from(password);
        }
        if self.memory {
            config.store.memory = true;
        }
        if let Some(prefix) = &self.key_prefix {
            config.store.key_prefix.clone_from(prefix);
        }
        if let Some(ms) = self.store_timeout_ms {
            config.store.timeout_ms = ms;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.server.request_timeout_secs = secs;
        }
        if !self.cors_origins.is_empty() {
            config.server.cors_origins = self
                .cors_origins
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(format) = self.log_format {
            config.log.format = format;
        }
        if self.metrics {
            config.server.metrics = true;
        }
    }
}
