//! Typed sensor values and the property values they resolve to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SensorKind;

/// An RGB color as reported by color sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Returned when a string is not a `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color `{0}`, expected #rrggbb")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// The live value of a sensor.
///
/// Custom sensors carry text, switch/level/range sensors carry a number and
/// color sensors carry a [`Color`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    Number(f64),
    Text(String),
    Color(Color),
}

impl SensorValue {
    /// The value a sensor of `kind` holds before anything is delivered.
    #[must_use]
    pub fn initial_for(kind: SensorKind) -> Self {
        match kind {
            SensorKind::Switch | SensorKind::Level | SensorKind::Range => Self::Number(0.0),
            SensorKind::Color => Self::Color(Color::default()),
            SensorKind::Custom | SensorKind::Unknown => Self::Text(String::new()),
        }
    }

    /// Whether this value fits the semantic type of `kind`.
    ///
    /// [`SensorKind::Unknown`] asserts nothing and accepts every value.
    #[must_use]
    pub fn conforms_to(&self, kind: SensorKind) -> bool {
        match (self, kind) {
            (_, SensorKind::Unknown)
            | (
                Self::Number(_),
                SensorKind::Switch | SensorKind::Level | SensorKind::Range,
            )
            | (Self::Color(_), SensorKind::Color)
            | (Self::Text(_), SensorKind::Custom) => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Color(_) => "color",
        }
    }
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => n.fmt(f),
            Self::Text(s) => f.write_str(s),
            Self::Color(c) => c.fmt(f),
        }
    }
}

impl From<f64> for SensorValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for SensorValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for SensorValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SensorValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Color> for SensorValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

/// A value assigned to a component property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Color(Color),
}

impl PropertyValue {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Color(_) => "color",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => b.fmt(f),
            Self::Number(n) => n.fmt(f),
            Self::Text(s) => f.write_str(s),
            Self::Color(c) => c.fmt(f),
        }
    }
}

/// Untranslated passthrough of a raw sensor value.
impl From<SensorValue> for PropertyValue {
    fn from(value: SensorValue) -> Self {
        match value {
            SensorValue::Number(n) => Self::Number(n),
            SensorValue::Text(s) => Self::Text(s),
            SensorValue::Color(c) => Self::Color(c),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Color> for PropertyValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_format_color_as_hex() {
        assert_eq!(Color::rgb(255, 128, 0).to_string(), "#ff8000");
    }

    #[test]
    fn should_parse_color_with_or_without_hash() {
        assert_eq!("#0a0b0c".parse::<Color>(), Ok(Color::rgb(10, 11, 12)));
        assert_eq!("FFFFFF".parse::<Color>(), Ok(Color::rgb(255, 255, 255)));
    }

    #[test]
    fn should_reject_malformed_color() {
        assert!("#fff".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("#+f+f+f".parse::<Color>().is_err());
    }

    #[test]
    fn should_start_numeric_kinds_at_zero() {
        assert_eq!(
            SensorValue::initial_for(SensorKind::Level),
            SensorValue::Number(0.0)
        );
        assert_eq!(
            SensorValue::initial_for(SensorKind::Color),
            SensorValue::Color(Color::rgb(0, 0, 0))
        );
        assert_eq!(
            SensorValue::initial_for(SensorKind::Custom),
            SensorValue::Text(String::new())
        );
    }

    #[test]
    fn should_conform_when_variant_matches_kind() {
        assert!(SensorValue::from(1).conforms_to(SensorKind::Switch));
        assert!(SensorValue::from("idle").conforms_to(SensorKind::Custom));
        assert!(SensorValue::from(Color::rgb(1, 2, 3)).conforms_to(SensorKind::Color));
    }

    #[test]
    fn should_not_conform_when_variant_differs_from_kind() {
        assert!(!SensorValue::from("on").conforms_to(SensorKind::Switch));
        assert!(!SensorValue::from(3).conforms_to(SensorKind::Color));
    }

    #[test]
    fn should_accept_any_value_when_kind_is_unknown() {
        assert!(SensorValue::from("x").conforms_to(SensorKind::Unknown));
        assert!(SensorValue::from(2.5).conforms_to(SensorKind::Unknown));
    }

    #[test]
    fn should_pass_raw_value_through_to_property_value() {
        assert_eq!(
            PropertyValue::from(SensorValue::from(50)),
            PropertyValue::Number(50.0)
        );
        assert_eq!(
            PropertyValue::from(SensorValue::from("heating")),
            PropertyValue::Text("heating".to_string())
        );
    }

    #[test]
    fn should_deserialize_untagged_sensor_values() {
        let number: SensorValue = serde_json::from_str("21.5").unwrap();
        assert_eq!(number, SensorValue::Number(21.5));
        let text: SensorValue = serde_json::from_str("\"idle\"").unwrap();
        assert_eq!(text, SensorValue::Text("idle".to_string()));
        let color: SensorValue = serde_json::from_str(r#"{"r":1,"g":2,"b":3}"#).unwrap();
        assert_eq!(color, SensorValue::Color(Color::rgb(1, 2, 3)));
    }
}
