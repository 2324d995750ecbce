//! Volcano records as they arrive from the list and detail endpoints, and the
//! reconciled record handed to renderers.

use serde::Serialize;
use serde_json::Value;

use crate::color::ColorCode;
use crate::fields::{self, JsonObject};

/// Human-facing fields shown in a marker popup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayPayload {
    pub name: Option<String>,
    pub observatory: Option<String>,
    pub alert_level: Option<String>,
    pub published: Option<String>,
    pub synopsis: Option<String>,
    pub notice_url: Option<String>,
    pub image_url: Option<String>,
}

impl DisplayPayload {
    #[must_use]
    pub fn from_object(obj: &JsonObject) -> Self {
        Self {
            name: fields::NAME.string(obj),
            observatory: fields::OBSERVATORY.string(obj),
            alert_level: fields::ALERT_LEVEL.string(obj),
            published: fields::PUBLISHED.string(obj),
            synopsis: fields::SYNOPSIS.string(obj),
            notice_url: fields::NOTICE_URL.string(obj),
            image_url: fields::IMAGE_URL.string(obj),
        }
    }

    /// Fills each missing field from `fallback`, field by field.
    #[must_use]
    pub fn or(self, fallback: &DisplayPayload) -> Self {
        Self {
            name: self.name.or_else(|| fallback.name.clone()),
            observatory: self.observatory.or_else(|| fallback.observatory.clone()),
            alert_level: self.alert_level.or_else(|| fallback.alert_level.clone()),
            published: self.published.or_else(|| fallback.published.clone()),
            synopsis: self.synopsis.or_else(|| fallback.synopsis.clone()),
            notice_url: self.notice_url.or_else(|| fallback.notice_url.clone()),
            image_url: self.image_url.or_else(|| fallback.image_url.clone()),
        }
    }
}

/// One entry from the elevated or monitored volcano list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolcanoSummary {
    /// Trimmed, non-empty identifier, or `None` when no alias carried one.
    pub id: Option<String>,
    /// `None` when the color is missing or outside the known scale.
    pub color_code: Option<ColorCode>,
    /// `Some(false)` when the source flags the volcano as not instrumented.
    pub instrumented: Option<bool>,
    pub display: DisplayPayload,
}

impl VolcanoSummary {
    #[must_use]
    pub fn from_object(obj: &JsonObject) -> Self {
        let instrumented = fields::INSTRUMENTED
            .flag(obj)
            .or_else(|| fields::UNINSTRUMENTED.flag(obj).map(|u| !u));

        Self {
            id: fields::ID.string(obj),
            color_code: fields::COLOR_CODE
                .string(obj)
                .and_then(|raw| ColorCode::parse(&raw)),
            instrumented,
            display: DisplayPayload::from_object(obj),
        }
    }

    /// Returns `None` for non-object JSON values.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_object)
    }
}

/// Per-volcano metadata from the detail endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolcanoDetail {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub display: DisplayPayload,
}

impl VolcanoDetail {
    #[must_use]
    pub fn from_object(obj: &JsonObject) -> Self {
        Self {
            latitude: fields::LATITUDE.number(obj),
            longitude: fields::LONGITUDE.number(obj),
            display: DisplayPayload::from_object(obj),
        }
    }

    /// Both coordinates, or `None` if either is missing.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Which input list produced a reconciled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Elevated,
    Monitored,
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::Elevated => write!(f, "elevated"),
            RecordSource::Monitored => write!(f, "monitored"),
        }
    }
}

/// A deduplicated, color-classified volcano with resolved coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRecord {
    pub id: String,
    pub color_code: ColorCode,
    pub latitude: f64,
    pub longitude: f64,
    pub source: RecordSource,
    pub display: DisplayPayload,
}
