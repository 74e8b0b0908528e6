//! Retry with exponential backoff for startup connections.
//!
//! Only the initial store connection is retried. Request paths never retry:
//! a failed store call is reported to the client as-is.

use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (e.g., 2.0 doubles delay each retry).
    pub factor: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::network()
    }
}

impl RetryConfig {
    /// Config for network connections (a handful of retries, capped delay).
    #[must_use]
    pub fn network() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            factor: 2.0,
        }
    }

    /// Set maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    fn build_backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries as usize)
            .with_factor(self.factor)
            .with_jitter()
    }
}

/// Retry an async operation that returns `anyhow::Result`.
///
/// Only errors recognised by [`is_transient_error`] are retried; anything
/// else (bad credentials, malformed address) fails immediately.
///
/// # Errors
///
/// Returns the last error once retries are exhausted or a permanent error
/// is seen.
pub async fn retry_anyhow<F, Fut, T>(
    config: RetryConfig,
    operation_name: &str,
    operation: F,
) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let name = operation_name.to_string();
    let backoff = config.build_backoff();
    let max_retries = config.max_retries;

    let mut attempt = 0u32;
    let notify = |err: &anyhow::Error, dur: Duration| {
        attempt += 1;
        warn!(
            operation = %name,
            attempt = attempt,
            max_retries = max_retries,
            next_delay_ms = dur.as_millis() as u64,
            error = %err,
            "Operation failed, will retry"
        );
    };

    operation
        .retry(backoff)
        .when(is_transient_error)
        .notify(notify)
        .await
}

/// Determine if a connection error is transient and worth retrying.
///
/// Returns `true` for refused/reset connections, timeouts, DNS hiccups and
/// a Redis server that is still loading its dataset.
pub fn is_transient_error(error: &anyhow::Error) -> bool {
    let msg = format!("{error:#}").to_lowercase();

    if msg.contains("connection refused")
        || msg.contains("connection reset")
        || msg.contains("connection closed")
        || msg.contains("broken pipe")
        || msg.contains("network unreachable")
        || msg.contains("host unreachable")
    {
        debug!("Transient error detected: connection issue");
        return true;
    }

    if msg.contains("timed out") || msg.contains("timeout") {
        debug!("Transient error detected: timeout");
        return true;
    }

    if msg.contains("dns") || msg.contains("failed to lookup address") {
        debug!("Transient error detected: name resolution");
        return true;
    }

    if msg.contains("loading") || msg.contains("tryagain") || msg.contains("try again") {
        debug!("Transient error detected: server not ready");
        return true;
    }

    false
}
