//! # sensorlink-adapter-virtual
//!
//! Virtual/demo integration that provides simulated devices for testing and
//! demonstration purposes.
//!
//! ## Provided devices
//!
//! | Device | Sensors | Behaviour |
//! |--------|---------|-----------|
//! | Virtual Light | `virtual-light.power` (switch), `virtual-light.level` (level) | Power flips every tick, level climbs by 10 |
//! | Virtual Color Lamp | `virtual-color-lamp.color` (color) | Cycles red, green, blue, white |
//! | Virtual Thermostat | `virtual-thermostat.setpoint` (range), `virtual-thermostat.mode` (custom) | Setpoint walks 18–23, mode rotates |
//!
//! ## Dependency rule
//!
//! Depends on `sensorlink-app` (port traits) and `sensorlink-domain` only.

mod devices;

use std::time::Duration;

use tokio::task::JoinHandle;

use sensorlink_app::delivery::{SensorUpdate, SensorUpdateSender};
use sensorlink_app::ports::{Integration, IntegrationError};
use sensorlink_domain::device::DeviceDescriptor;

pub use devices::{VirtualColorLamp, VirtualDevice, VirtualLight, VirtualThermostat};

/// Virtual integration that emits simulated sensor values on an interval.
#[derive(Debug)]
pub struct VirtualIntegration {
    devices: Vec<VirtualDevice>,
    interval: Duration,
    ticks: Option<u64>,
    task: Option<JoinHandle<()>>,
}

impl Default for VirtualIntegration {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl VirtualIntegration {
    /// Create the integration with every virtual device, ticking every `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            devices: vec![
                VirtualDevice::Light(VirtualLight),
                VirtualDevice::ColorLamp(VirtualColorLamp),
                VirtualDevice::Thermostat(VirtualThermostat),
            ],
            interval,
            ticks: None,
            task: None,
        }
    }

    /// Stop after `ticks` rounds of readings instead of running forever.
    #[must_use]
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.ticks = Some(ticks);
        self
    }

    /// Every reading the devices emit at `tick`.
    #[must_use]
    pub fn readings(&self, tick: u64) -> Vec<SensorUpdate> {
        self.devices.iter().flat_map(|d| d.readings(tick)).collect()
    }

    /// Whether the delivery task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Integration for VirtualIntegration {
    fn name(&self) -> &'static str {
        "virtual"
    }

    fn discover(&self) -> Vec<DeviceDescriptor> {
        self.devices.iter().map(VirtualDevice::descriptor).collect()
    }

    fn start(&mut self, sender: SensorUpdateSender) -> Result<(), IntegrationError> {
        if self.is_running() {
            return Err(IntegrationError::AlreadyRunning(self.name()));
        }

        let devices = self.devices.clone();
        let interval = self.interval;
        let limit = self.ticks;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut tick = 0_u64;
            while limit.is_none_or(|limit| tick < limit) {
                ticker.tick().await;
                tick += 1;
                tracing::trace!(tick, "virtual devices emitting readings");
                for update in devices.iter().flat_map(|d| d.readings(tick)) {
                    if sender.send(update).await.is_err() {
                        tracing::debug!("delivery channel closed, stopping virtual devices");
                        return;
                    }
                }
            }
            tracing::debug!(tick, "virtual devices finished");
        }));
        Ok(())
    }

    async fn teardown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use sensorlink_app::delivery;
    use sensorlink_app::device_model::DeviceModel;
    use sensorlink_app::device_model_registry::DeviceModelSensorRegistry;
    use sensorlink_domain::id::Identifier;
    use sensorlink_domain::sensor::SensorValue;

    use super::*;

    fn fast() -> VirtualIntegration {
        VirtualIntegration::new(Duration::from_millis(1))
    }

    #[test]
    fn should_return_virtual_as_name() {
        assert_eq!(fast().name(), "virtual");
    }

    #[test]
    fn should_discover_three_devices() {
        let descriptors = fast().discover();
        assert_eq!(descriptors.len(), 3);
        let names: Vec<_> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Virtual Light", "Virtual Color Lamp", "Virtual Thermostat"]
        );
    }

    #[test]
    fn should_build_valid_device_model() {
        let model = DeviceModel::from_descriptors(fast().discover()).unwrap();
        assert_eq!(model.sensors().count(), 5);
        assert!(model.find_sensor(&Identifier::from(VirtualLight::POWER)).is_some());
    }

    #[test]
    fn should_emit_readings_that_fit_every_sensor() {
        let integration = fast();
        let model = DeviceModel::from_descriptors(integration.discover()).unwrap();
        for tick in 0..8 {
            for update in integration.readings(tick) {
                let sensor = model.find_sensor(&update.sensor_id).unwrap();
                assert!(update.value.conforms_to(sensor.kind()));
            }
        }
    }

    #[tokio::test]
    async fn should_deliver_readings_until_tick_limit() {
        let mut integration = fast().with_ticks(2);
        let (tx, mut rx) = delivery::channel(64);

        integration.start(tx).unwrap();

        let model = DeviceModel::from_descriptors(integration.discover()).unwrap();
        let mut registry = DeviceModelSensorRegistry::new();
        let mut received = 0;
        while let Some(result) = rx.recv_and_apply(&model, &mut registry).await {
            result.unwrap();
            received += 1;
        }

        assert_eq!(received, 10);
        let power = model.find_sensor(&Identifier::from(VirtualLight::POWER)).unwrap();
        assert_eq!(power.value(), SensorValue::Number(0.0));
        integration.teardown().await;
        assert!(!integration.is_running());
    }

    #[tokio::test]
    async fn should_refuse_to_start_twice() {
        let mut integration = fast();
        let (tx, _rx) = delivery::channel(64);

        integration.start(tx.clone()).unwrap();
        assert_eq!(
            integration.start(tx),
            Err(IntegrationError::AlreadyRunning("virtual"))
        );

        integration.teardown().await;
        assert!(!integration.is_running());
    }
}
