//! Integration port: device discovery and value delivery for a transport.
//!
//! An integration bridges an external protocol (virtual, HTTP polling,
//! websocket push, …) into the client. It describes the devices it knows
//! about and pushes sensor values through a [`SensorUpdateSender`].

use std::future::Future;

use sensorlink_domain::device::DeviceDescriptor;

use crate::delivery::SensorUpdateSender;

/// Errors raised by integration lifecycle calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrationError {
    #[error("integration `{0}` is already running")]
    AlreadyRunning(&'static str),
}

/// A pluggable source of devices and sensor values.
///
/// Implementations live in adapter crates (e.g. `adapters/virtual`).
/// The binary crate calls the lifecycle methods in order:
///
/// 1. [`discover`](Self::discover): describe the devices to build the model from
/// 2. [`start`](Self::start): spawn the task delivering sensor values
/// 3. [`teardown`](Self::teardown): stop delivering
pub trait Integration {
    /// Unique name identifying this integration (e.g. `"virtual"`).
    fn name(&self) -> &'static str;

    /// Descriptors of every device this integration exposes.
    fn discover(&self) -> Vec<DeviceDescriptor>;

    /// Start delivering sensor values through `sender`.
    ///
    /// Spawns the delivery task and returns immediately. Must be called
    /// from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::AlreadyRunning`] if called twice without
    /// a [`teardown`](Self::teardown) in between.
    fn start(&mut self, sender: SensorUpdateSender) -> Result<(), IntegrationError>;

    /// Stop delivering values and wait for the delivery task to finish.
    fn teardown(&mut self) -> impl Future<Output = ()> + Send;
}
