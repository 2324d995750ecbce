//! Retry with exponential back-off and jitter for the volcano API clients.
//!
//! Retries are opt-in: with `max_retries = 0` (the configured default) an
//! operation runs exactly once and its error is returned as-is. A rate-limit
//! response waits at least as long as the server's `Retry-After` asked.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;
use crate::http::HttpSettings;

const MAX_DELAY: Duration = Duration::from_secs(60);

/// How a failed attempt should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    GiveUp,
    /// Retry, waiting no less than the given floor.
    Retry { at_least: Duration },
}

/// Retry budget and delay schedule shared by the API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Backoff {
    pub max_retries: u32,
    pub base: Duration,
}

impl Backoff {
    pub(crate) fn from_settings(settings: &HttpSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base: Duration::from_millis(settings.backoff_base_ms),
        }
    }

    /// Un-jittered delay before retry number `retry` (1-based): `base × 2^(retry-1)`,
    /// capped at one minute.
    pub(crate) fn nominal_delay(self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(10);
        self.base.saturating_mul(factor).min(MAX_DELAY)
    }

    /// Nominal delay scaled by a random factor in `[0.75, 1.25)`, raised to
    /// `floor` and capped at one minute.
    fn delay(self, retry: u32, floor: Duration) -> Duration {
        let jitter = rand::random::<f64>() * 0.5 + 0.75;
        self.nominal_delay(retry)
            .mul_f64(jitter)
            .max(floor)
            .min(MAX_DELAY)
    }
}

/// Transport failures, 5xx and 429 are retried; 429 honours `Retry-After`.
///
/// 404, other 4xx, malformed bodies and configuration errors would fail the
/// same way on a second attempt.
pub(crate) fn classify(err: &SourceError) -> Verdict {
    let retry_now = Verdict::Retry {
        at_least: Duration::ZERO,
    };
    match err {
        SourceError::Http(e)
            if e.is_timeout()
                || e.is_connect()
                || e.status().is_some_and(|s| s.is_server_error()) =>
        {
            retry_now
        }
        SourceError::UnexpectedStatus { status, .. } if *status >= 500 => retry_now,
        SourceError::RateLimited {
            retry_after_secs, ..
        } => Verdict::Retry {
            at_least: Duration::from_secs(*retry_after_secs),
        },
        _ => Verdict::GiveUp,
    }
}

/// Runs `operation` until it succeeds, `classify` gives up, or the retry
/// budget is spent. The last error is returned unchanged.
pub(crate) async fn retry_when<T, E, F, Fut, C>(
    backoff: Backoff,
    classify: C,
    mut operation: F,
) -> Result<T, E>
where
    E: fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> Verdict,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        let Verdict::Retry { at_least } = classify(&err) else {
            return Err(err);
        };
        if retry >= backoff.max_retries {
            return Err(err);
        }
        retry += 1;

        let delay = backoff.delay(retry, at_least);
        tracing::warn!(
            retry,
            max_retries = backoff.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient volcano API error; retrying after back-off"
        );
        tokio::time::sleep(delay).await;
    }
}

/// [`retry_when`] with the API clients' [`classify`] rules.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    backoff: Backoff,
    operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    retry_when(backoff, classify, operation).await
}
