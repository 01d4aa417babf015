//! # sensorlink-app
//!
//! Application layer: sensor registries and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** components implement so the registry can write
//!   resolved values into them: `PropertySink`
//! - Provide the generic subscribe / notify mechanism keyed by sensor
//!   identity: `SensorRegistry`
//! - Track bindings between device sensors and component properties, translate
//!   values through each binding's mapping and write them:
//!   `DeviceModelSensorRegistry`
//! - Hold the parsed device graph: `DeviceModel`
//! - Marshal sensor updates from any task onto the registry's context:
//!   `delivery`
//!
//! ## Threading
//! Registries are driven from a single context (the UI/update loop) and do no
//! locking of their own. Only the delivery sender crosses threads.
//!
//! ## Dependency rule
//! Depends on `sensorlink-domain` only (plus `tokio::sync` for the delivery
//! channel). Never imports adapter crates.

pub mod delivery;
pub mod device_model;
pub mod device_model_registry;
pub mod ports;
pub mod sensor_registry;
