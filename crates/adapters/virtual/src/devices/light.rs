//! Virtual dimmable light: a power switch and a brightness level.

use sensorlink_app::delivery::SensorUpdate;
use sensorlink_domain::device::{CommandDescriptor, DeviceDescriptor, SensorDescriptor};
use sensorlink_domain::sensor::SensorKind;

/// A simulated light that flips its power every tick and ramps its level.
#[derive(Debug, Clone, Default)]
pub struct VirtualLight;

impl VirtualLight {
    pub const DEVICE: &'static str = "virtual-light";
    pub const POWER: &'static str = "virtual-light.power";
    pub const LEVEL: &'static str = "virtual-light.level";
    const STATUS: &'static str = "virtual-light.status";

    #[must_use]
    pub fn descriptor(&self) -> DeviceDescriptor {
        DeviceDescriptor::new(Self::DEVICE, "Virtual Light")
            .protocol("virtual")
            .command(CommandDescriptor::new(Self::STATUS, "status").protocol("virtual"))
            .sensor(SensorDescriptor::new(Self::POWER, "power", SensorKind::Switch).linked_to(Self::STATUS))
            .sensor(SensorDescriptor::new(Self::LEVEL, "level", SensorKind::Level).linked_to(Self::STATUS))
    }

    /// Power is `1` on odd ticks, `0` on even ones; level climbs by 10 and wraps at 100.
    #[must_use]
    pub fn readings(&self, tick: u64) -> Vec<SensorUpdate> {
        let power = i32::from(tick % 2 == 1);
        let level = i32::try_from((tick * 10) % 110).unwrap_or_default();
        vec![
            SensorUpdate::new(Self::POWER, power),
            SensorUpdate::new(Self::LEVEL, level),
        ]
    }
}
