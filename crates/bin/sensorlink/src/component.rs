//! Demo components: panels that log every property written into them.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use sensorlink_adapter_virtual::{VirtualColorLamp, VirtualLight, VirtualThermostat};
use sensorlink_app::device_model::DeviceModel;
use sensorlink_app::device_model_registry::{BindingError, DeviceModelSensorRegistry};
use sensorlink_app::ports::PropertySink;
use sensorlink_domain::error::PropertyError;
use sensorlink_domain::id::Identifier;
use sensorlink_domain::sensor::{PropertyValue, SensorMapping};

/// A named panel with a fixed set of typed properties.
///
/// A property declared with `None` as its type accepts any value.
#[derive(Debug)]
pub struct LoggingComponent {
    name: String,
    schema: BTreeMap<String, Option<&'static str>>,
    values: RefCell<BTreeMap<String, PropertyValue>>,
}

impl LoggingComponent {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: BTreeMap::new(),
            values: RefCell::default(),
        }
    }

    /// Declare a property holding values of `type_name` (see [`PropertyValue::type_name`]).
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, type_name: Option<&'static str>) -> Self {
        self.schema.insert(name.into(), type_name);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every written property with its current value.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, PropertyValue)> {
        self.values
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl PropertySink for LoggingComponent {
    fn set_property(&self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        let expected = self
            .schema
            .get(name)
            .ok_or_else(|| PropertyError::UnknownProperty(name.to_string()))?;
        if let Some(expected) = *expected
            && expected != value.type_name()
        {
            return Err(PropertyError::TypeMismatch {
                property: name.to_string(),
                expected,
                actual: value.type_name(),
            });
        }
        tracing::info!(component = %self.name, property = name, %value, "property updated");
        self.values.borrow_mut().insert(name.to_string(), value.clone());
        Ok(())
    }
}

/// Build the demo panels and bind them to the virtual sensors found in `model`.
///
/// Panels whose sensors are missing from the model are skipped.
///
/// # Errors
///
/// Returns the first [`BindingError`] raised by the immediate write.
pub fn bind_demo_panels(
    model: &DeviceModel,
    registry: &mut DeviceModelSensorRegistry,
) -> Result<Vec<Rc<LoggingComponent>>, BindingError> {
    let mut panels = Vec::new();

    let light = Rc::new(
        LoggingComponent::new("light panel")
            .property("on", Some("bool"))
            .property("brightness", Some("number")),
    );
    let power = SensorMapping::new().with(0.0, false).with(1.0, true);
    let on = bind(model, registry, &light, VirtualLight::POWER, "on", power)?;
    let brightness = bind(
        model,
        registry,
        &light,
        VirtualLight::LEVEL,
        "brightness",
        SensorMapping::new(),
    )?;
    if on || brightness {
        panels.push(light);
    }

    let lamp = Rc::new(LoggingComponent::new("lamp panel").property("color", Some("color")));
    if bind(model, registry, &lamp, VirtualColorLamp::COLOR, "color", SensorMapping::new())? {
        panels.push(lamp);
    }

    let thermostat = Rc::new(
        LoggingComponent::new("thermostat panel")
            .property("target", Some("number"))
            .property("status", None),
    );
    let status = SensorMapping::new()
        .with("idle", "Idle")
        .with("heating", "Heating")
        .with("cooling", "Cooling");
    let target = bind(
        model,
        registry,
        &thermostat,
        VirtualThermostat::SETPOINT,
        "target",
        SensorMapping::new(),
    )?;
    let mode = bind(model, registry, &thermostat, VirtualThermostat::MODE, "status", status)?;
    if target || mode {
        panels.push(thermostat);
    }

    Ok(panels)
}

fn bind(
    model: &DeviceModel,
    registry: &mut DeviceModelSensorRegistry,
    component: &Rc<LoggingComponent>,
    sensor_id: &str,
    property: &str,
    mapping: SensorMapping,
) -> Result<bool, BindingError> {
    let Some(sensor) = model.find_sensor(&Identifier::from(sensor_id)) else {
        tracing::warn!(sensor_id, component = %component.name(), "sensor not in device model, binding skipped");
        return Ok(false);
    };
    registry.register_sensor(&**sensor, component, property, mapping)?;
    Ok(true)
}
