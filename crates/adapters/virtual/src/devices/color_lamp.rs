//! Virtual color lamp: cycles through a fixed palette.

use sensorlink_app::delivery::SensorUpdate;
use sensorlink_domain::device::{DeviceDescriptor, SensorDescriptor};
use sensorlink_domain::sensor::{Color, SensorKind};

const PALETTE: [Color; 4] = [
    Color::rgb(255, 0, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(255, 255, 255),
];

/// A simulated RGB lamp.
#[derive(Debug, Clone, Default)]
pub struct VirtualColorLamp;

impl VirtualColorLamp {
    pub const DEVICE: &'static str = "virtual-color-lamp";
    pub const COLOR: &'static str = "virtual-color-lamp.color";

    #[must_use]
    pub fn descriptor(&self) -> DeviceDescriptor {
        DeviceDescriptor::new(Self::DEVICE, "Virtual Color Lamp")
            .protocol("virtual")
            .sensor(SensorDescriptor::new(Self::COLOR, "color", SensorKind::Color))
    }

    #[must_use]
    pub fn readings(&self, tick: u64) -> Vec<SensorUpdate> {
        let index = usize::try_from(tick % PALETTE.len() as u64).unwrap_or_default();
        vec![SensorUpdate::new(Self::COLOR, PALETTE[index])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorlink_domain::sensor::SensorValue;

    #[test]
    fn should_cycle_through_palette() {
        let lamp = VirtualColorLamp;
        assert_eq!(lamp.readings(1)[0].value, SensorValue::Color(Color::rgb(0, 255, 0)));
        assert_eq!(lamp.readings(4)[0].value, lamp.readings(0)[0].value);
    }
}
