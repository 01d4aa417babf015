//! Error types shared across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SensorLinkError`] via `#[from]`.

use crate::id::Identifier;
use crate::sensor::SensorKind;

/// Umbrella error for the device model.
#[derive(Debug, thiserror::Error)]
pub enum SensorLinkError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("property error")]
    Property(#[from] PropertyError),

    #[error("sensor value error")]
    ValueKind(#[from] ValueKindMismatch),
}

/// A device descriptor broke one of the device graph invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("identifier `{0}` is used more than once")]
    DuplicateIdentifier(Identifier),

    #[error("sensor `{sensor}` references unknown command `{command}`")]
    UnknownCommand {
        sensor: Identifier,
        command: Identifier,
    },
}

/// A component could not accept a value for one of its properties.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    #[error("property `{property}` expects a {expected} value, got {actual}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A delivered value does not fit the semantic type of the sensor's kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} sensor cannot hold a {actual} value")]
pub struct ValueKindMismatch {
    pub kind: SensorKind,
    pub actual: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_umbrella() {
        let err: SensorLinkError = ValidationError::EmptyName.into();
        assert!(matches!(
            err,
            SensorLinkError::Validation(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn should_describe_type_mismatch() {
        let err = PropertyError::TypeMismatch {
            property: "on".to_string(),
            expected: "bool",
            actual: "text",
        };
        assert_eq!(
            err.to_string(),
            "property `on` expects a bool value, got text"
        );
    }

    #[test]
    fn should_describe_value_kind_mismatch() {
        let err = ValueKindMismatch {
            kind: SensorKind::Color,
            actual: "number",
        };
        assert_eq!(err.to_string(), "color sensor cannot hold a number value");
    }
}
