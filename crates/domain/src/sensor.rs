//! Sensor: a typed data source exposed by a device.
//!
//! A sensor has a stable [`Identifier`] and a [`SensorKind`] that fixes the
//! semantic type of its [`SensorValue`]. Component properties bound to a
//! sensor receive a [`PropertyValue`], optionally translated through a
//! [`SensorMapping`].

mod kind;
mod mapping;
mod value;

use std::rc::Rc;

pub use kind::SensorKind;
pub use mapping::{MappingEntry, SensorMapping};
pub use value::{Color, ParseColorError, PropertyValue, SensorValue};

use crate::id::Identifier;

/// Common capability of every concrete sensor.
pub trait Sensor {
    /// Stable identity, assigned at construction.
    fn identifier(&self) -> &Identifier;

    /// The kind determining the semantic type of [`current_value`](Self::current_value).
    fn kind(&self) -> SensorKind;

    /// Snapshot of the value last delivered to this sensor.
    fn current_value(&self) -> SensorValue;
}

impl<T: Sensor + ?Sized> Sensor for Rc<T> {
    fn identifier(&self) -> &Identifier {
        (**self).identifier()
    }

    fn kind(&self) -> SensorKind {
        (**self).kind()
    }

    fn current_value(&self) -> SensorValue {
        (**self).current_value()
    }
}
