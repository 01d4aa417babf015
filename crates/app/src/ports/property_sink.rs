//! Property sink port: how the registry writes into a component.

use std::rc::Rc;

use sensorlink_domain::error::PropertyError;
use sensorlink_domain::sensor::PropertyValue;

/// A component exposing named, typed properties the registry can set.
///
/// Setters take `&self`: components are shared and the registry only ever
/// holds a non-owning handle to them.
pub trait PropertySink {
    /// Assign `value` to the property called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::UnknownProperty`] when the component has no
    /// such property and [`PropertyError::TypeMismatch`] when it cannot hold
    /// a value of that type.
    fn set_property(&self, name: &str, value: &PropertyValue) -> Result<(), PropertyError>;
}

impl<T: PropertySink + ?Sized> PropertySink for Rc<T> {
    fn set_property(&self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        (**self).set_property(name, value)
    }
}
