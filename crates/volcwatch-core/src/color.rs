//! Volcano alert color codes.

use serde::{Deserialize, Serialize};

/// Aviation color code attached to a volcano.
///
/// `Unassigned` is used for volcanoes that are not instrumented or carry no
/// official code; the remaining variants follow the USGS scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorCode {
    Unassigned,
    Green,
    Yellow,
    Orange,
    Red,
}

impl ColorCode {
    pub const ALL: [ColorCode; 5] = [
        ColorCode::Unassigned,
        ColorCode::Green,
        ColorCode::Yellow,
        ColorCode::Orange,
        ColorCode::Red,
    ];

    /// Parses a raw API color string, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything outside the known scale (e.g. `"BLUE"`).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ColorCode::Unassigned => "UNASSIGNED",
            ColorCode::Green => "GREEN",
            ColorCode::Yellow => "YELLOW",
            ColorCode::Orange => "ORANGE",
            ColorCode::Red => "RED",
        }
    }

    /// `true` for codes that indicate above-baseline activity.
    #[must_use]
    pub fn is_elevated(self) -> bool {
        matches!(self, ColorCode::Yellow | ColorCode::Orange | ColorCode::Red)
    }
}

impl std::fmt::Display for ColorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
