//! Sensor kind: fixes the semantic type of a sensor's value.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification of a sensor, as announced by the device descriptor.
///
/// Deserializes through [`FromStr`], so descriptor type strings are matched
/// leniently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SensorKind {
    #[default]
    Unknown,
    Switch,
    Level,
    Range,
    Color,
    Custom,
}

impl SensorKind {
    /// Whether values of this kind are numeric.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Switch | Self::Level | Self::Range)
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Switch => f.write_str("switch"),
            Self::Level => f.write_str("level"),
            Self::Range => f.write_str("range"),
            Self::Color => f.write_str("color"),
            Self::Custom => f.write_str("custom"),
        }
    }
}

/// Descriptors use free-form type strings; anything unrecognised is
/// [`Unknown`](SensorKind::Unknown).
impl FromStr for SensorKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "switch" => Self::Switch,
            "level" => Self::Level,
            "range" => Self::Range,
            "color" | "colour" => Self::Color,
            "custom" => Self::Custom,
            _ => Self::Unknown,
        };
        Ok(kind)
    }
}

impl From<String> for SensorKind {
    fn from(value: String) -> Self {
        let Ok(kind) = value.parse::<Self>();
        kind
    }
}
