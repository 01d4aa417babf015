//! # sensorlink-domain
//!
//! Pure device model for the sensorlink controller client.
//!
//! ## Responsibilities
//! - Foundational types: opaque identifiers, error conventions, timestamps
//! - Define **sensor kinds** and the typed **sensor values** they carry
//! - Define **mappings** that translate raw sensor values into the values a
//!   component property receives
//! - Define the **device graph**: devices own their commands and sensors,
//!   which point back at their owners through non-owning handles
//! - Define the serialisable **descriptors** the device graph is built from
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! Components and value delivery are expressed as ports in the `app` crate.

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod sensor;
