//! Port definitions: traits that components and adapters implement.
//!
//! Ports are the boundaries between the registries and the outside world.
//! They are defined here (in `app`) so that adapters and UI code can depend
//! on them without depending on each other.

pub mod integration;
pub mod property_sink;

pub use integration::{Integration, IntegrationError};
pub use property_sink::PropertySink;
