//! HTTP client for the USGS HANS public volcano API.

use std::future::Future;

use reqwest::{Client, Url};
use volcwatch_core::config::DEFAULT_HANS_BASE_URL;
use volcwatch_core::{AppConfig, DetailFetcher, VolcanoDetail, VolcanoSummary};

use crate::envelope::{unwrap_list, unwrap_object};
use crate::error::SourceError;
use crate::http::{build_client, join_segments, parse_base_url, send_json, HttpSettings};
use crate::retry::{retry_with_backoff, Backoff};

pub(crate) const ELEVATED_ENDPOINT: &str = "getElevatedVolcanoes";
pub(crate) const MONITORED_ENDPOINT: &str = "getMonitoredVolcanoes";
pub(crate) const DETAIL_ENDPOINT: &str = "getVolcano";

/// Client for the HANS volcano endpoints.
///
/// Use [`HansClient::from_config`] in the binary or
/// [`HansClient::with_base_url`] to point at a mock server in tests.
pub struct HansClient {
    client: Client,
    base_url: Url,
    backoff: Backoff,
}

impl HansClient {
    /// Creates a client pointed at the production HANS API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: &HttpSettings) -> Result<Self, SourceError> {
        Self::with_base_url(settings, DEFAULT_HANS_BASE_URL)
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidBaseUrl`] if `hans_base_url` does not
    /// parse, or [`SourceError::Http`] if the client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::with_base_url(&HttpSettings::from_config(config), &config.hans_base_url)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`SourceError::Http`] if the client cannot be built.
    pub fn with_base_url(settings: &HttpSettings, base_url: &str) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: parse_base_url(base_url)?,
            backoff: Backoff::from_settings(settings),
        })
    }

    /// Fetches the volcanoes currently at an elevated alert level.
    ///
    /// # Errors
    ///
    /// Any transport, status, or shape error. Callers treat this as fatal
    /// for the refresh cycle.
    pub async fn get_elevated_volcanoes(&self) -> Result<Vec<VolcanoSummary>, SourceError> {
        self.get_list(ELEVATED_ENDPOINT).await
    }

    /// Fetches the broader registry of monitored volcanoes.
    ///
    /// # Errors
    ///
    /// Any transport, status, or shape error.
    pub async fn get_monitored_volcanoes(&self) -> Result<Vec<VolcanoSummary>, SourceError> {
        self.get_list(MONITORED_ENDPOINT).await
    }

    /// Fetches detail (coordinates and display metadata) for one volcano.
    ///
    /// # Errors
    ///
    /// Any transport, status, or shape error. Missing coordinates are not an
    /// error here; they surface as `None` on the returned detail.
    pub async fn get_volcano(&self, id: &str) -> Result<VolcanoDetail, SourceError> {
        let url = self.endpoint_url(&[DETAIL_ENDPOINT, id])?;
        let context = format!("{DETAIL_ENDPOINT}({id})");
        let body = self.request_json(&url, &context).await?;
        let obj = unwrap_object(body, &context)?;
        Ok(VolcanoDetail::from_object(&obj))
    }

    async fn get_list(&self, endpoint: &'static str) -> Result<Vec<VolcanoSummary>, SourceError> {
        let url = self.endpoint_url(&[endpoint])?;
        let body = self.request_json(&url, endpoint).await?;
        let objects = unwrap_list(body, endpoint)?;
        let summaries: Vec<VolcanoSummary> =
            objects.iter().map(VolcanoSummary::from_object).collect();

        tracing::debug!(endpoint, count = summaries.len(), "fetched volcano list");
        Ok(summaries)
    }

    async fn request_json(&self, url: &Url, context: &str) -> Result<serde_json::Value, SourceError> {
        retry_with_backoff(self.backoff, || {
            let request = self
                .client
                .get(url.clone())
                .header(reqwest::header::ACCEPT, "application/json");
            send_json(request, context)
        })
        .await
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, SourceError> {
        join_segments(&self.base_url, segments)
    }
}

impl DetailFetcher for HansClient {
    type Error = SourceError;

    fn fetch_detail(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<VolcanoDetail, SourceError>> + Send {
        self.get_volcano(id)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
