//! Device command: an action a device accepts.
//!
//! Only identity is modelled here; command execution belongs to the
//! transport layer.

use std::rc::{Rc, Weak};

use super::{CommandDescriptor, Device};
use crate::id::Identifier;

/// A command owned by a [`Device`].
#[derive(Debug)]
pub struct DeviceCommand {
    identifier: Identifier,
    name: String,
    protocol: Option<String>,
    device: Weak<Device>,
}

impl DeviceCommand {
    pub(crate) fn new(descriptor: CommandDescriptor, device: Weak<Device>) -> Self {
        Self {
            identifier: descriptor.identifier,
            name: descriptor.name,
            protocol: descriptor.protocol,
            device,
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    /// The owning device, or `None` once it has been dropped.
    #[must_use]
    pub fn device(&self) -> Option<Rc<Device>> {
        self.device.upgrade()
    }

    #[must_use]
    pub fn descriptor(&self) -> CommandDescriptor {
        CommandDescriptor {
            identifier: self.identifier.clone(),
            name: self.name.clone(),
            protocol: self.protocol.clone(),
        }
    }
}
