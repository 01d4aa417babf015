//! Device sensor: a named, typed sensor owned by one device.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{Device, DeviceCommand, SensorDescriptor};
use crate::error::ValueKindMismatch;
use crate::id::Identifier;
use crate::sensor::{Sensor, SensorKind, SensorValue};
use crate::time::{Timestamp, now};

/// A sensor owned by a [`Device`], carrying its live value.
///
/// Identity, name and kind are fixed at construction. The value is written
/// only by the value-delivery path through [`set_value`](Self::set_value).
#[derive(Debug)]
pub struct DeviceSensor {
    identifier: Identifier,
    name: String,
    kind: SensorKind,
    device: Weak<Device>,
    command: Option<Weak<DeviceCommand>>,
    value: RefCell<SensorValue>,
    last_updated: Cell<Option<Timestamp>>,
}

impl DeviceSensor {
    pub(crate) fn new(
        descriptor: SensorDescriptor,
        device: Weak<Device>,
        command: Option<Weak<DeviceCommand>>,
    ) -> Self {
        Self {
            value: RefCell::new(SensorValue::initial_for(descriptor.kind)),
            identifier: descriptor.identifier,
            name: descriptor.name,
            kind: descriptor.kind,
            device,
            command,
            last_updated: Cell::new(None),
        }
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
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// The owning device, or `None` once it has been dropped.
    #[must_use]
    pub fn device(&self) -> Option<Rc<Device>> {
        self.device.upgrade()
    }

    /// The command producing this sensor's readings, if one is linked and
    /// still alive.
    #[must_use]
    pub fn command(&self) -> Option<Rc<DeviceCommand>> {
        self.command.as_ref().and_then(Weak::upgrade)
    }

    #[must_use]
    pub fn value(&self) -> SensorValue {
        self.value.borrow().clone()
    }

    /// When a value was last delivered, `None` if it still holds its initial value.
    #[must_use]
    pub fn last_updated(&self) -> Option<Timestamp> {
        self.last_updated.get()
    }

    /// Store a freshly delivered value.
    ///
    /// Returns whether the stored value changed.
    ///
    /// # Errors
    ///
    /// Returns [`ValueKindMismatch`] when `value` does not fit this sensor's
    /// kind; the stored value is left untouched.
    pub fn set_value(&self, value: SensorValue) -> Result<bool, ValueKindMismatch> {
        if !value.conforms_to(self.kind) {
            return Err(ValueKindMismatch {
                kind: self.kind,
                actual: value.type_name(),
            });
        }
        self.last_updated.set(Some(now()));
        let changed = *self.value.borrow() != value;
        if changed {
            *self.value.borrow_mut() = value;
        }
        Ok(changed)
    }

    /// Describe this sensor for persistence. The live value is not included.
    #[must_use]
    pub fn descriptor(&self) -> SensorDescriptor {
        SensorDescriptor {
            identifier: self.identifier.clone(),
            name: self.name.clone(),
            kind: self.kind,
            command: self
                .command
                .as_ref()
                .and_then(Weak::upgrade)
                .map(|c| c.identifier().clone()),
        }
    }
}

impl Sensor for DeviceSensor {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn current_value(&self) -> SensorValue {
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceDescriptor;
    use crate::sensor::Color;

    fn lamp() -> Rc<Device> {
        Device::from_descriptor(
            DeviceDescriptor::new("dev-1", "Lamp")
                .sensor(SensorDescriptor::new("s-1", "power", SensorKind::Switch))
                .sensor(SensorDescriptor::new("s-2", "hue", SensorKind::Color))
                .sensor(SensorDescriptor::new("s-3", "raw", SensorKind::Unknown)),
        )
        .unwrap()
    }

    #[test]
    fn should_store_value_when_it_matches_kind() {
        let device = lamp();
        let power = device.sensor_named("power").unwrap();

        assert_eq!(power.set_value(SensorValue::from(1)), Ok(true));
        assert_eq!(power.value(), SensorValue::Number(1.0));
        assert!(power.last_updated().is_some());
    }

    #[test]
    fn should_report_unchanged_when_same_value_is_delivered_again() {
        let device = lamp();
        let power = device.sensor_named("power").unwrap();
        power.set_value(SensorValue::from(1)).unwrap();

        assert_eq!(power.set_value(SensorValue::from(1)), Ok(false));
    }

    #[test]
    fn should_reject_value_of_wrong_type() {
        let device = lamp();
        let hue = device.sensor_named("hue").unwrap();

        let result = hue.set_value(SensorValue::from("red"));
        assert_eq!(
            result,
            Err(ValueKindMismatch {
                kind: SensorKind::Color,
                actual: "text",
            })
        );
        assert_eq!(hue.value(), SensorValue::Color(Color::default()));
        assert!(hue.last_updated().is_none());
    }

    #[test]
    fn should_accept_any_value_when_kind_is_unknown() {
        let device = lamp();
        let raw = device.sensor_named("raw").unwrap();
        assert!(raw.set_value(SensorValue::from(42)).is_ok());
        assert!(raw.set_value(SensorValue::from("text")).is_ok());
    }

    #[test]
    fn should_describe_identity_and_kind_only() {
        let device = lamp();
        let power = device.sensor_named("power").unwrap();
        power.set_value(SensorValue::from(1)).unwrap();

        let descriptor = power.descriptor();
        assert_eq!(descriptor.identifier, Identifier::from("s-1"));
        assert_eq!(descriptor.kind, SensorKind::Switch);
        assert!(descriptor.command.is_none());
    }
}
