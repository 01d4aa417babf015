//! Serialisable descriptors the device graph is built from.
//!
//! Descriptors carry identity and classification only; live sensor values
//! are refreshed from value delivery and never persisted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::Identifier;
use crate::sensor::SensorKind;

/// Describes a device together with the commands and sensors it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub identifier: Identifier,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default)]
    pub commands: Vec<CommandDescriptor>,
    #[serde(default)]
    pub sensors: Vec<SensorDescriptor>,
}

/// Describes a command a device accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub identifier: Identifier,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

/// Describes a sensor a device exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorDescriptor {
    pub identifier: Identifier,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SensorKind,
    /// The command that produces this sensor's readings, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Identifier>,
}

impl DeviceDescriptor {
    #[must_use]
    pub fn new(identifier: impl Into<Identifier>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            protocol: None,
            commands: Vec::new(),
            sensors: Vec::new(),
        }
    }

    #[must_use]
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    #[must_use]
    pub fn command(mut self, command: CommandDescriptor) -> Self {
        self.commands.push(command);
        self
    }

    #[must_use]
    pub fn sensor(mut self, sensor: SensorDescriptor) -> Self {
        self.sensors.push(sensor);
        self
    }

    /// Check the device graph invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when the device, a command or a
    /// sensor has an empty name, [`ValidationError::DuplicateIdentifier`] when
    /// two commands or two sensors share an identifier, and
    /// [`ValidationError::UnknownCommand`] when a sensor references a command
    /// the device does not own.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let mut commands = HashSet::new();
        for command in &self.commands {
            if command.name.trim().is_empty() {
                return Err(ValidationError::EmptyName);
            }
            if !commands.insert(&command.identifier) {
                return Err(ValidationError::DuplicateIdentifier(
                    command.identifier.clone(),
                ));
            }
        }

        let mut sensors = HashSet::new();
        for sensor in &self.sensors {
            if sensor.name.trim().is_empty() {
                return Err(ValidationError::EmptyName);
            }
            if !sensors.insert(&sensor.identifier) {
                return Err(ValidationError::DuplicateIdentifier(
                    sensor.identifier.clone(),
                ));
            }
            if let Some(command) = &sensor.command
                && !commands.contains(command)
            {
                return Err(ValidationError::UnknownCommand {
                    sensor: sensor.identifier.clone(),
                    command: command.clone(),
                });
            }
        }

        Ok(())
    }
}

impl CommandDescriptor {
    #[must_use]
    pub fn new(identifier: impl Into<Identifier>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            protocol: None,
        }
    }

    #[must_use]
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }
}

impl SensorDescriptor {
    #[must_use]
    pub fn new(identifier: impl Into<Identifier>, name: impl Into<String>, kind: SensorKind) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            kind,
            command: None,
        }
    }

    /// Link this sensor to the command that produces its readings.
    #[must_use]
    pub fn linked_to(mut self, command: impl Into<Identifier>) -> Self {
        self.command = Some(command.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> DeviceDescriptor {
        DeviceDescriptor::new("dev-1", "Lamp")
            .protocol("zwave")
            .command(CommandDescriptor::new("cmd-1", "status"))
            .sensor(SensorDescriptor::new("s-1", "power", SensorKind::Switch).linked_to("cmd-1"))
            .sensor(SensorDescriptor::new("s-2", "dim", SensorKind::Level))
    }

    #[test]
    fn should_accept_well_formed_descriptor() {
        assert_eq!(lamp().validate(), Ok(()));
    }

    #[test]
    fn should_reject_empty_device_name() {
        let descriptor = DeviceDescriptor::new("dev-1", "  ");
        assert_eq!(descriptor.validate(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn should_reject_empty_sensor_name() {
        let descriptor =
            DeviceDescriptor::new("dev-1", "Lamp").sensor(SensorDescriptor::new("s-1", "", SensorKind::Switch));
        assert_eq!(descriptor.validate(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn should_reject_duplicate_sensor_identifier() {
        let descriptor = lamp().sensor(SensorDescriptor::new("s-1", "again", SensorKind::Custom));
        assert_eq!(
            descriptor.validate(),
            Err(ValidationError::DuplicateIdentifier(Identifier::from("s-1")))
        );
    }

    #[test]
    fn should_reject_dangling_command_reference() {
        let descriptor = DeviceDescriptor::new("dev-1", "Lamp")
            .sensor(SensorDescriptor::new("s-1", "power", SensorKind::Switch).linked_to("missing"));
        assert_eq!(
            descriptor.validate(),
            Err(ValidationError::UnknownCommand {
                sensor: Identifier::from("s-1"),
                command: Identifier::from("missing"),
            })
        );
    }

    #[test]
    fn should_deserialize_descriptor_with_type_field() {
        let json = r#"{
            "identifier": "12",
            "name": "Thermostat",
            "sensors": [{ "identifier": "13", "name": "setpoint", "type": "range" }]
        }"#;
        let descriptor: DeviceDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.sensors[0].kind, SensorKind::Range);
        assert!(descriptor.commands.is_empty());
        assert!(descriptor.protocol.is_none());
    }

    #[test]
    fn should_read_sensor_type_leniently_when_descriptor_uses_controller_casing() {
        let json = r#"{
            "identifier": "20",
            "name": "Lamp",
            "sensors": [
                { "identifier": "21", "name": "power", "type": "Switch" },
                { "identifier": "22", "name": "tint", "type": "colour" },
                { "identifier": "23", "name": "blob", "type": "binary" }
            ]
        }"#;
        let descriptor: DeviceDescriptor = serde_json::from_str(json).unwrap();
        let kinds: Vec<SensorKind> = descriptor.sensors.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SensorKind::Switch, SensorKind::Color, SensorKind::Unknown]);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let descriptor = lamp();
        let json = serde_json::to_string(&descriptor).unwrap();
        let parsed: DeviceDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, descriptor);
    }
}
