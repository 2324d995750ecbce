//! Ambee disasters feed.
//!
//! The feed mixes every disaster category; volcano events carry
//! `event_type == "VO"`. An event counts as erupting when its name mentions
//! an eruption, otherwise the volcano is reported as merely active.

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use volcwatch_core::config::DEFAULT_AMBEE_BASE_URL;
use volcwatch_core::fields::{Aliases, JsonObject};
use volcwatch_core::AppConfig;

use crate::envelope::unwrap_list;
use crate::error::SourceError;
use crate::http::{build_client, join_segments, parse_base_url, send_json, HttpSettings};
use crate::retry::{retry_with_backoff, Backoff};

const VOLCANO_EVENT_TYPE: &str = "VO";

const EVENT_TYPE: Aliases = Aliases(&["event_type", "eventType"]);
const EVENT_NAME: Aliases = Aliases(&["event_name", "eventName"]);
const EVENT_DATE: Aliases = Aliases(&["date", "created_time"]);
const EVENT_LAT: Aliases = Aliases(&["lat", "latitude"]);
const EVENT_LNG: Aliases = Aliases(&["lng", "lon", "longitude"]);

/// One raw entry from `disasters/latest/by-country-code`.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbeeEvent {
    pub event_type: Option<String>,
    pub event_name: Option<String>,
    pub date: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl AmbeeEvent {
    /// Reads an event leniently; coordinates may be numbers or numeric strings.
    #[must_use]
    pub fn from_object(obj: &JsonObject) -> Self {
        Self {
            event_type: EVENT_TYPE.string(obj),
            event_name: EVENT_NAME.string(obj),
            date: EVENT_DATE.string(obj),
            lat: EVENT_LAT.number(obj),
            lng: EVENT_LNG.number(obj),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EruptionStatus {
    Erupting,
    Active,
}

impl std::fmt::Display for EruptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EruptionStatus::Erupting => write!(f, "Erupting"),
            EruptionStatus::Active => write!(f, "Active"),
        }
    }
}

/// A volcano event ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolcanoEvent {
    pub name: String,
    pub status: EruptionStatus,
    pub date: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Keeps volcano events with usable coordinates and classifies them.
///
/// With `show_all = false` only erupting volcanoes are returned.
#[must_use]
pub fn volcano_events(events: Vec<AmbeeEvent>, show_all: bool) -> Vec<VolcanoEvent> {
    events
        .into_iter()
        .filter(|e| e.event_type.as_deref().map(str::trim) == Some(VOLCANO_EVENT_TYPE))
        .filter_map(|e| {
            let (Some(latitude), Some(longitude)) = (
                e.lat.filter(|v| v.is_finite()),
                e.lng.filter(|v| v.is_finite()),
            ) else {
                tracing::debug!(
                    event_name = e.event_name.as_deref().unwrap_or_default(),
                    "skipping volcano event without usable coordinates"
                );
                return None;
            };
            let name = e.event_name.unwrap_or_default();
            let status = if name.to_lowercase().contains("eruption") {
                EruptionStatus::Erupting
            } else {
                EruptionStatus::Active
            };
            Some(VolcanoEvent {
                name,
                status,
                date: e.date,
                latitude,
                longitude,
            })
        })
        .filter(|v| show_all || v.status == EruptionStatus::Erupting)
        .collect()
}

/// Client for the Ambee disasters API.
pub struct AmbeeClient {
    client: Client,
    base_url: Url,
    api_key: String,
    backoff: Backoff,
}

impl AmbeeClient {
    /// Creates a client pointed at the production Ambee API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: &HttpSettings, api_key: &str) -> Result<Self, SourceError> {
        Self::with_base_url(settings, api_key, DEFAULT_AMBEE_BASE_URL)
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingApiKey`] if `AMBEE_API_KEY` is unset,
    /// plus the errors of [`AmbeeClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let api_key = config
            .ambee_api_key
            .as_deref()
            .ok_or(SourceError::MissingApiKey("AMBEE_API_KEY"))?;
        Self::with_base_url(
            &HttpSettings::from_config(config),
            api_key,
            &config.ambee_base_url,
        )
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`SourceError::Http`] if the client cannot be built.
    pub fn with_base_url(
        settings: &HttpSettings,
        api_key: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: parse_base_url(base_url)?,
            api_key: api_key.to_owned(),
            backoff: Backoff::from_settings(settings),
        })
    }

    /// Fetches the first page of the latest disasters for an ISO-3 country code.
    ///
    /// A body without a `result` list (missing or `null`) means no events.
    ///
    /// # Errors
    ///
    /// Any transport, status, or shape error.
    pub async fn get_latest_by_country(
        &self,
        country_code: &str,
        limit: u32,
    ) -> Result<Vec<AmbeeEvent>, SourceError> {
        let url = self.latest_by_country_url(country_code, limit)?;
        let context = format!("disasters/latest/by-country-code({country_code})");

        let body = retry_with_backoff(self.backoff, || {
            let request = self
                .client
                .get(url.clone())
                .header("x-api-key", &self.api_key)
                .header(reqwest::header::CONTENT_TYPE, "application/json");
            send_json(request, &context)
        })
        .await?;

        if has_no_result(&body) {
            tracing::warn!(
                country = country_code,
                "Ambee response carried no result list; treating as no events"
            );
            return Ok(Vec::new());
        }

        Ok(unwrap_list(body, &context)?
            .iter()
            .map(AmbeeEvent::from_object)
            .collect())
    }

    fn latest_by_country_url(&self, country_code: &str, limit: u32) -> Result<Url, SourceError> {
        let mut url = join_segments(
            &self.base_url,
            &["disasters", "latest", "by-country-code"],
        )?;
        url.query_pairs_mut()
            .append_pair("countryCode", &country_code.to_uppercase())
            .append_pair("limit", &limit.to_string())
            .append_pair("page", "1");
        Ok(url)
    }
}

fn has_no_result(body: &Value) -> bool {
    match body {
        Value::Object(obj) => obj.get("result").is_none_or(Value::is_null),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn event(event_type: &str, name: &str, lat: Option<f64>, lng: Option<f64>) -> AmbeeEvent {
        AmbeeEvent {
            event_type: Some(event_type.to_owned()),
            event_name: Some(name.to_owned()),
            date: Some("2025-11-03 04:12:00".to_owned()),
            lat,
            lng,
        }
    }

    #[test]
    fn only_volcano_events_are_kept() {
        let events = vec![
            event("FL", "Flood in Jakarta", Some(-6.2), Some(106.8)),
            event("VO", "Eruption of Semeru", Some(-8.1), Some(112.9)),
        ];
        let volcanoes = volcano_events(events, true);
        assert_eq!(volcanoes.len(), 1);
        assert_eq!(volcanoes[0].name, "Eruption of Semeru");
    }

    #[test]
    fn eruption_in_name_marks_erupting_case_insensitively() {
        let events = vec![
            event("VO", "ERUPTION at Merapi", Some(-7.5), Some(110.4)),
            event("VO", "Volcanic activity at Bromo", Some(-7.9), Some(112.9)),
        ];
        let volcanoes = volcano_events(events, true);
        assert_eq!(volcanoes[0].status, EruptionStatus::Erupting);
        assert_eq!(volcanoes[1].status, EruptionStatus::Active);
    }

    #[test]
    fn show_all_false_keeps_only_erupting() {
        let events = vec![
            event("VO", "Eruption of Semeru", Some(-8.1), Some(112.9)),
            event("VO", "Volcanic activity at Bromo", Some(-7.9), Some(112.9)),
        ];
        let volcanoes = volcano_events(events, false);
        assert_eq!(volcanoes.len(), 1);
        assert_eq!(volcanoes[0].status, EruptionStatus::Erupting);
    }

    #[test]
    fn events_without_coordinates_are_dropped() {
        let events = vec![
            event("VO", "Eruption of Semeru", None, Some(112.9)),
            event("VO", "Eruption of Ibu", Some(1.4), None),
        ];
        assert!(volcano_events(events, true).is_empty());
    }

    #[test]
    fn from_object_accepts_numeric_string_coordinates() {
        let obj = json!({
            "event_type": "VO",
            "event_name": "Eruption of Ruang",
            "lat": "2.30",
            "lng": 125.37
        });
        let event = AmbeeEvent::from_object(obj.as_object().unwrap());
        assert_eq!(event.lat, Some(2.30));
        assert_eq!(event.lng, Some(125.37));
        assert_eq!(volcano_events(vec![event], false).len(), 1);
    }

    #[test]
    fn from_object_leaves_unparseable_coordinates_empty() {
        let obj = json!({"event_type": "VO", "lat": "not-a-number", "lng": 112.9});
        let event = AmbeeEvent::from_object(obj.as_object().unwrap());
        assert_eq!(event.lat, None);
        assert!(volcano_events(vec![event], true).is_empty());
    }

    #[test]
    fn null_or_missing_result_means_no_events() {
        assert!(has_no_result(&json!({"message": "success", "result": null})));
        assert!(has_no_result(&json!({"message": "success"})));
        assert!(!has_no_result(&json!({"result": []})));
        assert!(!has_no_result(&json!([])));
    }

    #[test]
    fn latest_by_country_url_has_expected_query() {
        let client =
            AmbeeClient::with_base_url(&HttpSettings::default(), "key", "https://api.ambeedata.com")
                .unwrap();
        let url = client.latest_by_country_url("idn", 50).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.ambeedata.com/disasters/latest/by-country-code?countryCode=IDN&limit=50&page=1"
        );
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = AppConfig {
            env: volcwatch_core::Environment::Test,
            log_level: "info".to_owned(),
            hans_base_url: volcwatch_core::config::DEFAULT_HANS_BASE_URL.to_owned(),
            ambee_base_url: DEFAULT_AMBEE_BASE_URL.to_owned(),
            ambee_api_key: None,
            ambee_country: "IDN".to_owned(),
            user_agent: "volcwatch-test/0.1".to_owned(),
            request_timeout_secs: 0,
            max_retries: 0,
            retry_backoff_base_ms: 0,
            detail_concurrency: 1,
            refresh_interval_secs: 600,
        };
        let result = AmbeeClient::from_config(&config);
        assert!(matches!(
            result,
            Err(SourceError::MissingApiKey("AMBEE_API_KEY"))
        ));
    }
}
