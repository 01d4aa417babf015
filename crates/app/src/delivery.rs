//! Value delivery: marshals sensor updates onto the registry's context.
//!
//! Transports run wherever they like (I/O tasks, other threads) and push
//! [`SensorUpdate`]s through a cloneable [`SensorUpdateSender`]. The context
//! that owns the [`DeviceModel`] and the [`DeviceModelSensorRegistry`] drains
//! the matching [`SensorUpdateReceiver`], so registrations and notifications
//! never interleave.

use tokio::sync::mpsc;

use sensorlink_domain::error::ValueKindMismatch;
use sensorlink_domain::id::Identifier;
use sensorlink_domain::sensor::SensorValue;

use crate::device_model::DeviceModel;
use crate::device_model_registry::{DeviceModelSensorRegistry, NotifyReport};

/// A new value for one sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorUpdate {
    pub sensor_id: Identifier,
    pub value: SensorValue,
}

impl SensorUpdate {
    #[must_use]
    pub fn new(sensor_id: impl Into<Identifier>, value: impl Into<SensorValue>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            value: value.into(),
        }
    }
}

/// Errors raised on the delivery path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeliveryError {
    #[error("sensor `{sensor_id}` rejected the delivered value")]
    ValueKind {
        sensor_id: Identifier,
        #[source]
        source: ValueKindMismatch,
    },

    #[error("value delivery channel is closed")]
    Closed,
}

/// Create a bounded delivery channel holding up to `capacity` pending updates.
///
/// # Panics
///
/// Panics if `capacity` is zero.
#[must_use]
pub fn channel(capacity: usize) -> (SensorUpdateSender, SensorUpdateReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (SensorUpdateSender { tx }, SensorUpdateReceiver { rx })
}

/// Sending half, used by transports. Cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct SensorUpdateSender {
    tx: mpsc::Sender<SensorUpdate>,
}

impl SensorUpdateSender {
    /// Queue `update`, waiting for room when the channel is full.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Closed`] once the receiver is gone.
    pub async fn send(&self, update: SensorUpdate) -> Result<(), DeliveryError> {
        self.tx.send(update).await.map_err(|_| DeliveryError::Closed)
    }

    /// Queue `update` without waiting. Returns `Ok(false)` when the channel
    /// is full and the update was dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Closed`] once the receiver is gone.
    pub fn try_send(&self, update: SensorUpdate) -> Result<bool, DeliveryError> {
        match self.tx.try_send(update) {
            Ok(()) => Ok(true),
            Err(mpsc::error::TrySendError::Full(update)) => {
                tracing::warn!(sensor_id = %update.sensor_id, "delivery channel full, dropping update");
                Ok(false)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(DeliveryError::Closed),
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half, owned by the registry's context.
#[derive(Debug)]
pub struct SensorUpdateReceiver {
    rx: mpsc::Receiver<SensorUpdate>,
}

impl SensorUpdateReceiver {
    /// Apply every update already queued, without waiting.
    ///
    /// Rejected updates are logged and skipped. Returns how many updates
    /// were taken off the channel.
    pub fn apply_pending(
        &mut self,
        model: &DeviceModel,
        registry: &mut DeviceModelSensorRegistry,
    ) -> usize {
        let mut count = 0;
        while let Ok(update) = self.rx.try_recv() {
            count += 1;
            if let Err(err) = apply(model, registry, &update) {
                tracing::warn!(%err, "sensor update skipped");
            }
        }
        count
    }

    /// Wait for the next update and apply it.
    ///
    /// Returns `None` once every sender is gone and the channel is drained.
    pub async fn recv_and_apply(
        &mut self,
        model: &DeviceModel,
        registry: &mut DeviceModelSensorRegistry,
    ) -> Option<Result<NotifyReport, DeliveryError>> {
        let update = self.rx.recv().await?;
        Some(apply(model, registry, &update))
    }
}

/// Store `update` on its sensor and fan it out.
///
/// Sensors outside the model are still notified, since bindings may target
/// any [`Sensor`](sensorlink_domain::sensor::Sensor). A model sensor whose
/// value did not change is not notified again.
///
/// # Errors
///
/// Returns [`DeliveryError::ValueKind`] when the value does not fit the
/// sensor's kind; nothing is written then.
pub fn apply(
    model: &DeviceModel,
    registry: &mut DeviceModelSensorRegistry,
    update: &SensorUpdate,
) -> Result<NotifyReport, DeliveryError> {
    if let Some(sensor) = model.find_sensor(&update.sensor_id) {
        let changed =
            sensor
                .set_value(update.value.clone())
                .map_err(|source| DeliveryError::ValueKind {
                    sensor_id: update.sensor_id.clone(),
                    source,
                })?;
        if !changed {
            tracing::trace!(sensor_id = %update.sensor_id, "value unchanged");
            return Ok(NotifyReport::default());
        }
    } else {
        tracing::trace!(sensor_id = %update.sensor_id, "update for sensor outside the device model");
    }
    Ok(registry.notify(&update.sensor_id, &update.value))
}
