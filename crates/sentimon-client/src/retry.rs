//! Retry with exponential back-off and jitter for REST requests.
//!
//! Disabled by default (`max_retries = 0`): the dashboard leaves prior state
//! in place on a failed fetch. When enabled, only transient failures are
//! retried.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::ClientError;

const MAX_DELAY: Duration = Duration::from_secs(60);

/// How many extra attempts a request gets and how long to wait between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub(crate) max_retries: u32,
    pub(crate) backoff_base_ms: u64,
}

impl RetryPolicy {
    /// Delay before the `retry`-th extra attempt (1-based): the base doubled
    /// per earlier retry, scaled by a random factor in `[0.75, 1.25]`, never
    /// above one minute.
    pub(crate) fn delay_for(self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        let nominal = self.backoff_base_ms.saturating_mul(1u64 << exponent);
        let factor = rand::rng().random_range(0.75..=1.25);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let jittered = Duration::from_millis((nominal as f64 * factor) as u64);
        jittered.min(MAX_DELAY)
    }
}

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, and HTTP 5xx.
///
/// **Not retriable:** 4xx statuses, malformed bodies, invalid URLs, and push
/// channel errors (the channel is never reopened).
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::UnexpectedStatus { status, .. } => *status >= 500,
        ClientError::Deserialize { .. }
        | ClientError::InvalidUrl(_)
        | ClientError::WebSocket(_) => false,
    }
}

/// Runs `request` until it succeeds, fails with a non-retriable error, or the
/// policy's retries are spent. `context` names the endpoint in log fields.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    context: &str,
    mut request: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match request().await {
            Ok(value) => {
                if retries > 0 {
                    tracing::info!(context, retries, "request recovered after retry");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !is_retriable(&err) {
            return Err(err);
        }
        if retries >= policy.max_retries {
            if policy.max_retries > 0 {
                tracing::warn!(context, retries, error = %err, "giving up on request");
            }
            return Err(err);
        }

        retries += 1;
        let delay = policy.delay_for(retries);
        tracing::warn!(
            context,
            retry = retries,
            max_retries = policy.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient API error, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
