//! Shared HTTP plumbing: client construction, base-URL handling, and JSON
//! response checking.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use volcwatch_core::AppConfig;

use crate::error::SourceError;

/// Transport settings shared by every client.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    /// `0` leaves requests without a timeout.
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl HttpSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout_secs: config.request_timeout_secs,
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: "volcwatch/0.1 (volcano-alert-map)".to_owned(),
            timeout_secs: 0,
            max_retries: 0,
            backoff_base_ms: 1_000,
        }
    }
}

pub(crate) fn build_client(settings: &HttpSettings) -> Result<Client, SourceError> {
    let mut builder = Client::builder().user_agent(&settings.user_agent);
    if settings.timeout_secs > 0 {
        builder = builder
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.timeout_secs.min(10)));
    }
    Ok(builder.build()?)
}

/// Parses `base_url`, forcing exactly one trailing slash so endpoint segments
/// are appended rather than replacing the last path segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, SourceError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| SourceError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SourceError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: "URL cannot carry a path".to_owned(),
        });
    }
    Ok(url)
}

/// Appends percent-encoded path segments to `base`.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, SourceError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SourceError::InvalidBaseUrl {
            base_url: base.to_string(),
            reason: "URL cannot carry a path".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Sends `request` and decodes a JSON body, mapping non-2xx statuses to
/// typed errors.
pub(crate) async fn send_json(request: RequestBuilder, context: &str) -> Result<Value, SourceError> {
    let response = request.send().await?;
    let status = response.status();
    let url = response.url().to_string();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(SourceError::RateLimited {
            url,
            retry_after_secs,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound { url });
    }

    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    let body = response.text().await?;
    serde_json::from_str::<Value>(&body).map_err(|e| SourceError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
