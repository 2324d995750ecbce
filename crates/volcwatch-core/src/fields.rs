//! Typed accessors for JSON objects whose field names drift between API
//! revisions and endpoints.
//!
//! Every logical field is described once as an [`Aliases`] list. Lookups walk
//! the list in order and return the first value that is usable for the
//! requested type, so all call sites agree on precedence.

use serde_json::{Map, Value};

/// A decoded JSON object.
pub type JsonObject = Map<String, Value>;

/// Ordered candidate keys for one logical field.
#[derive(Debug, Clone, Copy)]
pub struct Aliases(pub &'static [&'static str]);

pub const ID: Aliases = Aliases(&["vnum", "vn", "volcano_id", "id"]);
pub const COLOR_CODE: Aliases = Aliases(&[
    "color_code",
    "colorCode",
    "current_color_code",
    "color",
]);
pub const NAME: Aliases = Aliases(&["volcano_name", "volcanoName", "vName", "name"]);
pub const OBSERVATORY: Aliases = Aliases(&["obs_fullname", "observatory", "obs_abbr"]);
pub const ALERT_LEVEL: Aliases = Aliases(&["alert_level", "alertLevel", "current_alert_level"]);
pub const PUBLISHED: Aliases = Aliases(&["sent_utc", "published", "pubDate", "date"]);
pub const SYNOPSIS: Aliases = Aliases(&["synopsis", "notice_synopsis", "description"]);
pub const NOTICE_URL: Aliases = Aliases(&["notice_url", "noticeUrl", "volcano_url", "url"]);
pub const IMAGE_URL: Aliases = Aliases(&["volcano_image_url", "image_url", "imageUrl", "image"]);
pub const LATITUDE: Aliases = Aliases(&["latitude", "lat", "volcano_lat"]);
pub const LONGITUDE: Aliases = Aliases(&["longitude", "lng", "lon", "long", "volcano_lng"]);
pub const INSTRUMENTED: Aliases = Aliases(&["instrumented", "is_instrumented"]);
pub const UNINSTRUMENTED: Aliases = Aliases(&["uninstrumented", "is_uninstrumented"]);

impl Aliases {
    /// First non-empty string. Numbers are rendered as their JSON text so
    /// numeric identifiers such as `vnum: 311240` survive.
    #[must_use]
    pub fn string(self, obj: &JsonObject) -> Option<String> {
        self.values(obj).find_map(as_text)
    }

    /// First finite number. Numeric strings (`"19.421"`) are accepted.
    #[must_use]
    pub fn number(self, obj: &JsonObject) -> Option<f64> {
        self.values(obj).find_map(as_finite_f64)
    }

    /// First value that reads as a boolean flag.
    #[must_use]
    pub fn flag(self, obj: &JsonObject) -> Option<bool> {
        self.values(obj).find_map(as_flag)
    }

    fn values<'a>(self, obj: &'a JsonObject) -> impl Iterator<Item = &'a Value> + 'a {
        self.0.iter().filter_map(move |key| obj.get(*key))
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_finite_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
