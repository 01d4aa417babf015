//! Device: a physical or virtual thing that owns commands and sensors.
//!
//! Devices are handed out as `Rc<Device>`. Commands and sensors are owned by
//! their device and point back to it through [`Weak`] handles, so a sensor
//! never keeps its device alive and has no lifetime of its own.

mod command;
mod descriptor;
mod device_sensor;

use std::rc::{Rc, Weak};

pub use command::DeviceCommand;
pub use descriptor::{CommandDescriptor, DeviceDescriptor, SensorDescriptor};
pub use device_sensor::DeviceSensor;

use crate::error::ValidationError;
use crate::id::Identifier;

/// A device with the commands and sensors it exposes.
#[derive(Debug)]
pub struct Device {
    identifier: Identifier,
    name: String,
    protocol: Option<String>,
    commands: Vec<Rc<DeviceCommand>>,
    sensors: Vec<Rc<DeviceSensor>>,
}

impl Device {
    /// Build the device graph described by `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] reported by
    /// [`DeviceDescriptor::validate`].
    pub fn from_descriptor(descriptor: DeviceDescriptor) -> Result<Rc<Self>, ValidationError> {
        descriptor.validate()?;

        let DeviceDescriptor {
            identifier,
            name,
            protocol,
            commands,
            sensors,
        } = descriptor;

        Ok(Rc::new_cyclic(|device: &Weak<Self>| {
            let commands: Vec<Rc<DeviceCommand>> = commands
                .into_iter()
                .map(|command| Rc::new(DeviceCommand::new(command, device.clone())))
                .collect();

            let sensors = sensors
                .into_iter()
                .map(|sensor| {
                    let command = sensor.command.as_ref().and_then(|id| {
                        commands
                            .iter()
                            .find(|c| c.identifier() == id)
                            .map(Rc::downgrade)
                    });
                    Rc::new(DeviceSensor::new(sensor, device.clone(), command))
                })
                .collect();

            Self {
                identifier,
                name,
                protocol,
                commands,
                sensors,
            }
        }))
    }

    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    #[must_use]
    pub fn commands(&self) -> &[Rc<DeviceCommand>] {
        &self.commands
    }

    #[must_use]
    pub fn sensors(&self) -> &[Rc<DeviceSensor>] {
        &self.sensors
    }

    /// Look up an owned command by identifier.
    #[must_use]
    pub fn command(&self, identifier: &Identifier) -> Option<&Rc<DeviceCommand>> {
        self.commands.iter().find(|c| c.identifier() == identifier)
    }

    /// Look up an owned sensor by identifier.
    #[must_use]
    pub fn sensor(&self, identifier: &Identifier) -> Option<&Rc<DeviceSensor>> {
        self.sensors.iter().find(|s| s.identifier() == identifier)
    }

    /// Look up an owned sensor by name.
    #[must_use]
    pub fn sensor_named(&self, name: &str) -> Option<&Rc<DeviceSensor>> {
        self.sensors.iter().find(|s| s.name() == name)
    }

    /// Describe this device for persistence. Sensor values are not included.
    #[must_use]
    pub fn descriptor(&self) -> DeviceDescriptor {
        DeviceDescriptor {
            identifier: self.identifier.clone(),
            name: self.name.clone(),
            protocol: self.protocol.clone(),
            commands: self.commands.iter().map(|c| c.descriptor()).collect(),
            sensors: self.sensors.iter().map(|s| s.descriptor()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{Sensor, SensorKind, SensorValue};

    fn thermostat() -> DeviceDescriptor {
        DeviceDescriptor::new("dev-7", "Thermostat")
            .protocol("knx")
            .command(CommandDescriptor::new("cmd-1", "read setpoint").protocol("knx"))
            .sensor(SensorDescriptor::new("s-1", "setpoint", SensorKind::Range).linked_to("cmd-1"))
            .sensor(SensorDescriptor::new("s-2", "mode", SensorKind::Custom))
    }

    #[test]
    fn should_build_device_graph_from_descriptor() {
        let device = Device::from_descriptor(thermostat()).unwrap();
        assert_eq!(device.name(), "Thermostat");
        assert_eq!(device.protocol(), Some("knx"));
        assert_eq!(device.commands().len(), 1);
        assert_eq!(device.sensors().len(), 2);
    }

    #[test]
    fn should_return_validation_error_when_descriptor_is_invalid() {
        let result = Device::from_descriptor(DeviceDescriptor::new("dev-1", ""));
        assert!(matches!(result, Err(ValidationError::EmptyName)));
    }

    #[test]
    fn should_link_sensor_back_to_owning_device() {
        let device = Device::from_descriptor(thermostat()).unwrap();
        let sensor = device.sensor_named("setpoint").unwrap();
        let owner = sensor.device().unwrap();
        assert!(Rc::ptr_eq(&owner, &device));
    }

    #[test]
    fn should_link_sensor_to_its_command() {
        let device = Device::from_descriptor(thermostat()).unwrap();
        let linked = device.sensor(&Identifier::from("s-1")).unwrap();
        let unlinked = device.sensor(&Identifier::from("s-2")).unwrap();

        let command = linked.command().unwrap();
        assert_eq!(command.name(), "read setpoint");
        assert!(unlinked.command().is_none());
    }

    #[test]
    fn should_start_sensors_with_initial_value_for_kind() {
        let device = Device::from_descriptor(thermostat()).unwrap();
        let setpoint = device.sensor_named("setpoint").unwrap();
        let mode = device.sensor_named("mode").unwrap();
        assert_eq!(setpoint.current_value(), SensorValue::Number(0.0));
        assert_eq!(mode.current_value(), SensorValue::Text(String::new()));
    }

    #[test]
    fn should_not_keep_device_alive_through_its_sensors() {
        let device = Device::from_descriptor(thermostat()).unwrap();
        let sensor = Rc::clone(device.sensor_named("setpoint").unwrap());
        let command = Rc::clone(device.command(&Identifier::from("cmd-1")).unwrap());

        drop(device);

        assert!(sensor.device().is_none());
        assert!(command.device().is_none());
    }

    #[test]
    fn should_describe_itself_with_the_descriptor_it_was_built_from() {
        let descriptor = thermostat();
        let device = Device::from_descriptor(descriptor.clone()).unwrap();
        assert_eq!(device.descriptor(), descriptor);
    }
}
