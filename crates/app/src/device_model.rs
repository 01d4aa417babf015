//! The parsed device graph the client works against.

use std::collections::HashSet;
use std::rc::Rc;

use sensorlink_domain::device::{Device, DeviceDescriptor, DeviceSensor};
use sensorlink_domain::error::{SensorLinkError, ValidationError};
use sensorlink_domain::id::Identifier;

/// Owns every known [`Device`] and, through them, every sensor.
///
/// Sensor identifiers are unique across the whole model.
#[derive(Debug, Default)]
pub struct DeviceModel {
    devices: Vec<Rc<Device>>,
}

impl DeviceModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from device descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`SensorLinkError::Validation`] when a descriptor is invalid or
    /// identifiers collide across devices.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = DeviceDescriptor>,
    ) -> Result<Self, SensorLinkError> {
        let mut model = Self::new();
        for descriptor in descriptors {
            model.add_device(Device::from_descriptor(descriptor)?)?;
        }
        Ok(model)
    }

    /// Take ownership of `device`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateIdentifier`] when the device, or
    /// one of its sensors, collides with one already in the model.
    pub fn add_device(&mut self, device: Rc<Device>) -> Result<(), ValidationError> {
        if self.device(device.identifier()).is_some() {
            return Err(ValidationError::DuplicateIdentifier(
                device.identifier().clone(),
            ));
        }
        let known: HashSet<&Identifier> = self.sensors().map(|s| s.identifier()).collect();
        if let Some(clash) = device
            .sensors()
            .iter()
            .find(|s| known.contains(s.identifier()))
        {
            return Err(ValidationError::DuplicateIdentifier(
                clash.identifier().clone(),
            ));
        }
        tracing::debug!(
            device = %device.identifier(),
            sensors = device.sensors().len(),
            "device added to model"
        );
        self.devices.push(device);
        Ok(())
    }

    /// Remove a device. Its sensors go with it unless the caller keeps the
    /// returned handle.
    pub fn remove_device(&mut self, identifier: &Identifier) -> Option<Rc<Device>> {
        let index = self
            .devices
            .iter()
            .position(|d| d.identifier() == identifier)?;
        Some(self.devices.remove(index))
    }

    #[must_use]
    pub fn devices(&self) -> &[Rc<Device>] {
        &self.devices
    }

    #[must_use]
    pub fn device(&self, identifier: &Identifier) -> Option<&Rc<Device>> {
        self.devices.iter().find(|d| d.identifier() == identifier)
    }

    /// Every sensor of every device.
    pub fn sensors(&self) -> impl Iterator<Item = &Rc<DeviceSensor>> {
        self.devices.iter().flat_map(|d| d.sensors())
    }

    #[must_use]
    pub fn find_sensor(&self, identifier: &Identifier) -> Option<&Rc<DeviceSensor>> {
        self.devices.iter().find_map(|d| d.sensor(identifier))
    }

    /// Describe every device for persistence.
    #[must_use]
    pub fn descriptors(&self) -> Vec<DeviceDescriptor> {
        self.devices.iter().map(|d| d.descriptor()).collect()
    }
}

#[cfg(test)]
mod tests {
    use sensorlink_domain::device::SensorDescriptor;
    use sensorlink_domain::sensor::SensorKind;

    use super::*;

    fn lamp(device: &str, sensor: &str) -> DeviceDescriptor {
        DeviceDescriptor::new(device, "Lamp")
            .sensor(SensorDescriptor::new(sensor, "power", SensorKind::Switch))
    }

    #[test]
    fn should_find_sensor_across_devices() {
        let model =
            DeviceModel::from_descriptors([lamp("d1", "s1"), lamp("d2", "s2")]).unwrap();

        let sensor = model.find_sensor(&Identifier::from("s2")).unwrap();
        assert_eq!(sensor.device().unwrap().identifier(), &Identifier::from("d2"));
        assert_eq!(model.sensors().count(), 2);
    }

    #[test]
    fn should_return_none_when_sensor_is_unknown() {
        let model = DeviceModel::from_descriptors([lamp("d1", "s1")]).unwrap();
        assert!(model.find_sensor(&Identifier::from("nope")).is_none());
    }

    #[test]
    fn should_reject_duplicate_device() {
        let result = DeviceModel::from_descriptors([lamp("d1", "s1"), lamp("d1", "s2")]);
        assert!(matches!(
            result,
            Err(SensorLinkError::Validation(ValidationError::DuplicateIdentifier(id))) if id == Identifier::from("d1")
        ));
    }

    #[test]
    fn should_reject_sensor_identifier_used_by_another_device() {
        let result = DeviceModel::from_descriptors([lamp("d1", "s1"), lamp("d2", "s1")]);
        assert!(matches!(
            result,
            Err(SensorLinkError::Validation(ValidationError::DuplicateIdentifier(id))) if id == Identifier::from("s1")
        ));
    }

    #[test]
    fn should_end_sensor_lifetime_with_removed_device() {
        let mut model = DeviceModel::from_descriptors([lamp("d1", "s1")]).unwrap();
        let weak = Rc::downgrade(model.find_sensor(&Identifier::from("s1")).unwrap());

        let removed = model.remove_device(&Identifier::from("d1"));
        assert!(removed.is_some());
        drop(removed);

        assert!(weak.upgrade().is_none());
        assert!(model.find_sensor(&Identifier::from("s1")).is_none());
    }

    #[test]
    fn should_describe_every_device() {
        let descriptors = vec![lamp("d1", "s1"), lamp("d2", "s2")];
        let model = DeviceModel::from_descriptors(descriptors.clone()).unwrap();
        assert_eq!(model.descriptors(), descriptors);
    }
}
