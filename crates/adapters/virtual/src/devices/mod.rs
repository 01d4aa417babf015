//! Virtual device implementations: light, color lamp, thermostat.
//!
//! Each virtual device has fixed identifiers so bindings made against one
//! run remain valid in the next, and produces a deterministic reading for
//! every tick.

mod color_lamp;
mod light;
mod thermostat;

pub use color_lamp::VirtualColorLamp;
pub use light::VirtualLight;
pub use thermostat::VirtualThermostat;

use sensorlink_app::delivery::SensorUpdate;
use sensorlink_domain::device::DeviceDescriptor;

/// Wrapper enum for the concrete virtual device types.
#[derive(Debug, Clone)]
pub enum VirtualDevice {
    Light(VirtualLight),
    ColorLamp(VirtualColorLamp),
    Thermostat(VirtualThermostat),
}

impl VirtualDevice {
    /// The descriptor the device model is built from.
    #[must_use]
    pub fn descriptor(&self) -> DeviceDescriptor {
        match self {
            Self::Light(d) => d.descriptor(),
            Self::ColorLamp(d) => d.descriptor(),
            Self::Thermostat(d) => d.descriptor(),
        }
    }

    /// Sensor values emitted at `tick`.
    #[must_use]
    pub fn readings(&self, tick: u64) -> Vec<SensorUpdate> {
        match self {
            Self::Light(d) => d.readings(tick),
            Self::ColorLamp(d) => d.readings(tick),
            Self::Thermostat(d) => d.readings(tick),
        }
    }
}
