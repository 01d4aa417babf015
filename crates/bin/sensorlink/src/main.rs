//! # sensorlink: device model demo daemon
//!
//! Composition root that wires the virtual integration, the device model and
//! the sensor registry together.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialise logging
//! - Discover devices and build the device model
//! - Bind the demo panels to their sensors
//! - Start the integration and drain sensor updates until it stops
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod component;
mod config;

use sensorlink_adapter_virtual::VirtualIntegration;
use sensorlink_app::delivery;
use sensorlink_app::device_model::DeviceModel;
use sensorlink_app::device_model_registry::DeviceModelSensorRegistry;
use sensorlink_app::ports::Integration;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Integration
    let mut integration = VirtualIntegration::new(config.simulation.interval());
    if let Some(ticks) = config.simulation.tick_limit() {
        integration = integration.with_ticks(ticks);
    }

    // Device model
    let model = DeviceModel::from_descriptors(integration.discover())?;
    tracing::info!(
        integration = integration.name(),
        devices = model.devices().len(),
        sensors = model.sensors().count(),
        "device model ready"
    );

    // Bindings
    let mut registry = DeviceModelSensorRegistry::new();
    let panels = component::bind_demo_panels(&model, &mut registry)?;
    tracing::info!(bindings = registry.len(), "panels bound");

    // Delivery
    let (sender, mut receiver) = delivery::channel(config.delivery.capacity);
    integration.start(sender)?;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(err) = result {
                    tracing::error!(%err, "failed to listen for shutdown signal");
                }
                tracing::info!("shutting down");
                break;
            }
            applied = receiver.recv_and_apply(&model, &mut registry) => match applied {
                Some(Ok(report)) => {
                    for err in &report.errors {
                        tracing::warn!(%err, source = %err.source, "binding rejected value");
                    }
                    if report.reclaimed > 0 {
                        tracing::debug!(reclaimed = report.reclaimed, "stale bindings dropped");
                    }
                }
                Some(Err(err)) => tracing::warn!(%err, "sensor update rejected"),
                None => {
                    tracing::info!("integration finished");
                    break;
                }
            },
        }
    }

    integration.teardown().await;

    for panel in &panels {
        for (property, value) in panel.snapshot() {
            tracing::info!(component = panel.name(), %property, %value, "final state");
        }
    }

    Ok(())
}
