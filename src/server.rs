//! Process wiring: store connection, HTTP listener, graceful shutdown.

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::http::{self, AppState};
use crate::metrics;
use crate::record::RecordService;
use crate::store::KvStore;

/// Open the store described by `config`.
///
/// Redis connections are retried with backoff; the in-memory store is used
/// when `store.memory` is set.
///
/// # Errors
///
/// Returns an error if the store cannot be reached once retries run out.
pub async fn connect_store(config: &Config) -> Result<KvStore> {
    let timeout = Duration::from_millis(config.store.timeout_ms);

    if config.store.memory {
        info!("Using in-memory store");
        return Ok(KvStore::memory().with_timeout(timeout));
    }

    let addr = config
        .store
        .addr
        .as_deref()
        .context("store address is not configured")?;
    connect_redis(addr, &config.store.password, timeout).await
}

#[cfg(feature = "redis")]
async fn connect_redis(addr: &str, password: &str, timeout: Duration) -> Result<KvStore> {
    use crate::retry::{RetryConfig, retry_anyhow};

    let store = retry_anyhow(RetryConfig::network(), "redis connect", || {
        KvStore::redis(addr, password)
    })
    .await?;
    Ok(store.with_timeout(timeout))
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(addr: &str, _password: &str, _timeout: Duration) -> Result<KvStore> {
    anyhow::bail!("cannot connect to {addr}: built without the `redis` feature")
}

/// Validate `config`, ping the store, and report what was found.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the store does not
/// answer.
pub async fn check(config: &Config) -> Result<()> {
    let validation = config.validate()?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }

    let store = connect_store(config).await?;
    store.ping().await.context("Store did not answer PING")?;
    store.close().await?;
    info!("Configuration OK, store reachable");
    Ok(())
}

/// Run the HTTP server until Ctrl-C or SIGTERM, then close the store.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the store cannot be
/// reached, or the listener cannot bind.
pub async fn serve(config: Config) -> Result<()> {
    let validation = config.validate()?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }

    let store = connect_store(&config).await?;
    let records = RecordService::new(store.clone(), config.store.key_prefix.clone());

    let mut state = AppState::new(records);
    if config.server.metrics {
        state = state.with_metrics(metrics::install_recorder()?);
    }

    let app = http::router(state, &config.server);
    let listener = TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;

    info!(
        listen = %config.listen,
        key_prefix = %config.store.key_prefix,
        store_timeout_ms = config.store.timeout_ms,
        "Scoreboard listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutting down");
    store.close().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
