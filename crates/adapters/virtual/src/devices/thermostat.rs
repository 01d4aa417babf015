//! Virtual thermostat: a setpoint range and a free-text operating mode.

use sensorlink_app::delivery::SensorUpdate;
use sensorlink_domain::device::{CommandDescriptor, DeviceDescriptor, SensorDescriptor};
use sensorlink_domain::sensor::SensorKind;

const MODES: [&str; 3] = ["idle", "heating", "cooling"];

/// A simulated thermostat.
///
/// The setpoint walks between 18 and 23 degrees; the mode rotates through
/// `idle`, `heating` and `cooling`.
#[derive(Debug, Clone, Default)]
pub struct VirtualThermostat;

impl VirtualThermostat {
    pub const DEVICE: &'static str = "virtual-thermostat";
    pub const SETPOINT: &'static str = "virtual-thermostat.setpoint";
    pub const MODE: &'static str = "virtual-thermostat.mode";
    const READ_SETPOINT: &'static str = "virtual-thermostat.read-setpoint";
    const SET_SETPOINT: &'static str = "virtual-thermostat.set-setpoint";

    #[must_use]
    pub fn descriptor(&self) -> DeviceDescriptor {
        DeviceDescriptor::new(Self::DEVICE, "Virtual Thermostat")
            .protocol("virtual")
            .command(CommandDescriptor::new(Self::READ_SETPOINT, "read setpoint"))
            .command(CommandDescriptor::new(Self::SET_SETPOINT, "set setpoint"))
            .sensor(
                SensorDescriptor::new(Self::SETPOINT, "setpoint", SensorKind::Range)
                    .linked_to(Self::READ_SETPOINT),
            )
            .sensor(SensorDescriptor::new(Self::MODE, "mode", SensorKind::Custom))
    }

    #[must_use]
    pub fn readings(&self, tick: u64) -> Vec<SensorUpdate> {
        let setpoint = 18.0 + f64::from(u8::try_from(tick % 6).unwrap_or_default());
        let mode = MODES[usize::try_from(tick % 3).unwrap_or_default()];
        vec![
            SensorUpdate::new(Self::SETPOINT, setpoint),
            SensorUpdate::new(Self::MODE, mode),
        ]
    }
}
