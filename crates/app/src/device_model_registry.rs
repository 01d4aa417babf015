//! Bindings between device sensors and component properties.
//!
//! A binding links one sensor to one `(component, property)` pair through a
//! [`SensorMapping`]. Each pair holds at most one binding: registering the
//! pair again updates the mapping in place, or moves the binding over to a
//! different sensor. Components are referenced without ownership; a binding
//! whose component has been dropped is reclaimed on the next notify or sweep.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::rc::{Rc, Weak};

use sensorlink_domain::error::PropertyError;
use sensorlink_domain::id::Identifier;
use sensorlink_domain::sensor::{Sensor, SensorMapping, SensorValue};

use crate::ports::PropertySink;
use crate::sensor_registry::{Delivery, SensorDependent, SensorRegistry};

/// A resolved value could not be written into a bound property.
///
/// The binding stays registered, so a later value or a corrected mapping can
/// still succeed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot write sensor `{sensor_id}` into property `{property_name}`")]
pub struct BindingError {
    pub sensor_id: Identifier,
    pub property_name: String,
    #[source]
    pub source: PropertyError,
}

/// Snapshot of one binding, for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingInfo {
    pub sensor_id: Identifier,
    pub property_name: String,
    pub mapping: SensorMapping,
}

/// Result of [`DeviceModelSensorRegistry::notify`].
#[derive(Debug, Default, PartialEq)]
pub struct NotifyReport {
    /// Properties written.
    pub written: usize,
    /// Bindings dropped because their component is gone.
    pub reclaimed: usize,
    /// Properties that rejected their resolved value.
    pub errors: Vec<BindingError>,
}

/// Identity of a component allocation.
///
/// The address cannot be reused while a binding holds a [`Weak`] to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ComponentKey(usize);

impl ComponentKey {
    fn of<C: ?Sized>(component: &Rc<C>) -> Self {
        Self(Rc::as_ptr(component).cast::<()>().addr())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BindingKey {
    component: ComponentKey,
    property: String,
}

impl BindingKey {
    fn new<C: ?Sized>(component: &Rc<C>, property: &str) -> Self {
        Self {
            component: ComponentKey::of(component),
            property: property.to_string(),
        }
    }
}

#[derive(Debug)]
struct Binding {
    key: BindingKey,
    component: Weak<dyn PropertySink>,
    mapping: RefCell<SensorMapping>,
}

/// Shared handle to a [`Binding`], compared by identity.
#[derive(Debug, Clone)]
struct BindingHandle(Rc<Binding>);

impl PartialEq for BindingHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl BindingHandle {
    fn property(&self) -> &str {
        &self.0.key.property
    }

    fn is_stale(&self) -> bool {
        self.0.component.strong_count() == 0
    }

    fn replace_mapping(&self, mapping: SensorMapping) {
        *self.0.mapping.borrow_mut() = mapping;
    }

    fn write(&self, sensor_id: &Identifier, value: &SensorValue) -> Result<Delivery, BindingError> {
        let Some(component) = self.0.component.upgrade() else {
            return Ok(Delivery::Stale);
        };
        let resolved = self.0.mapping.borrow().resolve(value);
        tracing::trace!(%sensor_id, property = self.property(), %resolved, "writing sensor value");
        component
            .set_property(self.property(), &resolved)
            .map_err(|source| BindingError {
                sensor_id: sensor_id.clone(),
                property_name: self.property().to_string(),
                source,
            })?;
        Ok(Delivery::Applied)
    }
}

impl SensorDependent for BindingHandle {
    type Error = BindingError;

    fn sensor_changed(
        &self,
        sensor_id: &Identifier,
        value: &SensorValue,
    ) -> Result<Delivery, Self::Error> {
        self.write(sensor_id, value)
    }
}

#[derive(Debug)]
struct BindingEntry {
    sensor_id: Identifier,
    handle: BindingHandle,
}

/// Keeps track of which component properties depend on which sensors.
///
/// Driven from a single context: every method takes `&mut self`, so a
/// registration can never interleave with a notify.
#[derive(Debug, Default)]
pub struct DeviceModelSensorRegistry {
    sensors: SensorRegistry<BindingHandle>,
    bindings: HashMap<BindingKey, BindingEntry>,
}

impl DeviceModelSensorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `sensor` to `property_name` on `component` through `mapping`.
    ///
    /// - no binding for the pair yet: one is created and subscribed;
    /// - bound to the same sensor: only the mapping is replaced;
    /// - bound to another sensor: the old subscription is torn down and the
    ///   binding moves to `sensor` with the new mapping.
    ///
    /// The sensor's current value is resolved and written straight away.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError`] when the component rejects that first write.
    /// The binding is registered regardless.
    pub fn register_sensor<S, C>(
        &mut self,
        sensor: &S,
        component: &Rc<C>,
        property_name: &str,
        mapping: SensorMapping,
    ) -> Result<(), BindingError>
    where
        S: Sensor + ?Sized,
        C: PropertySink + 'static,
    {
        let weak = Rc::downgrade(component);
        let weak: Weak<dyn PropertySink> = weak;
        self.bind(sensor, BindingKey::new(component, property_name), weak, mapping)
    }

    /// [`register_sensor`](Self::register_sensor) for components already held
    /// as trait objects.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError`] when the component rejects the first write.
    /// The binding is registered regardless.
    pub fn register_sensor_dyn<S>(
        &mut self,
        sensor: &S,
        component: &Rc<dyn PropertySink>,
        property_name: &str,
        mapping: SensorMapping,
    ) -> Result<(), BindingError>
    where
        S: Sensor + ?Sized,
    {
        let key = BindingKey::new(component, property_name);
        self.bind(sensor, key, Rc::downgrade(component), mapping)
    }

    #[tracing::instrument(
        skip(self, sensor, key, component, mapping),
        fields(sensor_id = %sensor.identifier(), property_name = %key.property)
    )]
    fn bind<S: Sensor + ?Sized>(
        &mut self,
        sensor: &S,
        key: BindingKey,
        component: Weak<dyn PropertySink>,
        mapping: SensorMapping,
    ) -> Result<(), BindingError> {
        let sensor_id = sensor.identifier();

        let handle = match self.bindings.entry(key) {
            Entry::Vacant(vacant) => {
                let handle = BindingHandle(Rc::new(Binding {
                    key: vacant.key().clone(),
                    component,
                    mapping: RefCell::new(mapping),
                }));
                self.sensors.subscribe(sensor_id.clone(), handle.clone());
                vacant.insert(BindingEntry {
                    sensor_id: sensor_id.clone(),
                    handle: handle.clone(),
                });
                tracing::debug!("sensor bound");
                handle
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if &entry.sensor_id == sensor_id {
                    tracing::debug!("binding mapping updated");
                } else {
                    self.sensors.unsubscribe(&entry.sensor_id, &entry.handle);
                    self.sensors.subscribe(sensor_id.clone(), entry.handle.clone());
                    let previous = std::mem::replace(&mut entry.sensor_id, sensor_id.clone());
                    tracing::debug!(%previous, "property rebound to another sensor");
                }
                entry.handle.replace_mapping(mapping);
                entry.handle.clone()
            }
        };

        handle
            .write(sensor_id, &sensor.current_value())
            .inspect_err(|err| tracing::warn!(%err, source = %err.source, "initial write rejected"))
            .map(|_| ())
    }

    /// Deliver `value` to every property bound to `sensor_id`.
    ///
    /// Each binding translates the value through its own mapping. Bindings
    /// whose component is gone are dropped. One failing property never stops
    /// the others.
    pub fn notify(&mut self, sensor_id: &Identifier, value: &SensorValue) -> NotifyReport {
        let fan_out = self.sensors.notify(sensor_id, value);

        for handle in &fan_out.released {
            let key = &handle.0.key;
            if self
                .bindings
                .get(key)
                .is_some_and(|entry| entry.handle == *handle)
            {
                self.bindings.remove(key);
            }
            tracing::debug!(%sensor_id, property = handle.property(), "reclaimed binding of dropped component");
        }
        for err in &fan_out.errors {
            tracing::warn!(%err, source = %err.source, "sensor update rejected");
        }

        NotifyReport {
            written: fan_out.applied,
            reclaimed: fan_out.released.len(),
            errors: fan_out.errors,
        }
    }

    /// Remove the binding of `property_name` on `component`, if any.
    pub fn unregister<C: ?Sized>(&mut self, component: &Rc<C>, property_name: &str) -> bool {
        self.remove(&BindingKey::new(component, property_name))
    }

    /// Remove every binding of `component`. Returns how many were removed.
    pub fn unregister_component<C: ?Sized>(&mut self, component: &Rc<C>) -> usize {
        let component = ComponentKey::of(component);
        let keys: Vec<BindingKey> = self
            .bindings
            .keys()
            .filter(|key| key.component == component)
            .cloned()
            .collect();
        keys.iter().filter(|key| self.remove(key)).count()
    }

    /// Drop every binding whose component is gone. Returns how many were dropped.
    pub fn sweep(&mut self) -> usize {
        let stale: Vec<BindingKey> = self
            .bindings
            .iter()
            .filter(|(_, entry)| entry.handle.is_stale())
            .map(|(key, _)| key.clone())
            .collect();
        let reclaimed = stale.iter().filter(|key| self.remove(key)).count();
        if reclaimed > 0 {
            tracing::debug!(reclaimed, "swept stale bindings");
        }
        reclaimed
    }

    /// The binding of `property_name` on `component`, if any.
    #[must_use]
    pub fn binding<C: ?Sized>(&self, component: &Rc<C>, property_name: &str) -> Option<BindingInfo> {
        let entry = self.bindings.get(&BindingKey::new(component, property_name))?;
        Some(BindingInfo {
            sensor_id: entry.sensor_id.clone(),
            property_name: property_name.to_string(),
            mapping: entry.handle.0.mapping.borrow().clone(),
        })
    }

    /// Number of properties currently bound to `sensor_id`.
    #[must_use]
    pub fn bindings_for_sensor(&self, sensor_id: &Identifier) -> usize {
        self.sensors.dependents(sensor_id).len()
    }

    /// Number of stored bindings, including stale ones not yet reclaimed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn remove(&mut self, key: &BindingKey) -> bool {
        let Some(entry) = self.bindings.remove(key) else {
            return false;
        };
        self.sensors.unsubscribe(&entry.sensor_id, &entry.handle);
        true
    }
}
