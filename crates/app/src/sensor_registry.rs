//! Generic subscribe / notify mechanism keyed by sensor identity.

use std::collections::HashMap;

use sensorlink_domain::id::Identifier;
use sensorlink_domain::sensor::SensorValue;

/// Something interested in the value changes of one or more sensors.
pub trait SensorDependent {
    /// Failure reported for a single dependent; never stops the fan-out.
    type Error;

    /// React to `sensor_id` taking `value`.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the dependent could not apply the value.
    /// The dependent stays subscribed.
    fn sensor_changed(
        &self,
        sensor_id: &Identifier,
        value: &SensorValue,
    ) -> Result<Delivery, Self::Error>;
}

/// Outcome of delivering a value to one dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The value was applied; keep the subscription.
    Applied,
    /// The dependent is no longer reachable; drop the subscription.
    Stale,
}

/// Result of one [`SensorRegistry::notify`] call.
#[derive(Debug)]
pub struct FanOut<D, E> {
    /// Dependents that applied the value.
    pub applied: usize,
    /// Dependents that reported [`Delivery::Stale`], now unsubscribed.
    pub released: Vec<D>,
    /// Per-dependent failures, in delivery order.
    pub errors: Vec<E>,
}

impl<D, E> Default for FanOut<D, E> {
    fn default() -> Self {
        Self {
            applied: 0,
            released: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Maps sensor identity to the set of dependents interested in it.
///
/// A sensor nobody subscribed to is not an error: it simply has no
/// dependents. Dependents must not assume any delivery order.
#[derive(Debug)]
pub struct SensorRegistry<D> {
    dependents: HashMap<Identifier, Vec<D>>,
}

impl<D> Default for SensorRegistry<D> {
    fn default() -> Self {
        Self {
            dependents: HashMap::new(),
        }
    }
}

impl<D: PartialEq> SensorRegistry<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `dependent` as interested in `sensor_id`.
    ///
    /// Returns `false` when it was already subscribed; nothing changes then.
    pub fn subscribe(&mut self, sensor_id: Identifier, dependent: D) -> bool {
        let dependents = self.dependents.entry(sensor_id).or_default();
        if dependents.contains(&dependent) {
            return false;
        }
        dependents.push(dependent);
        true
    }

    /// Remove the relation between `sensor_id` and `dependent`.
    ///
    /// Returns `false` when there was nothing to remove.
    pub fn unsubscribe(&mut self, sensor_id: &Identifier, dependent: &D) -> bool {
        let Some(dependents) = self.dependents.get_mut(sensor_id) else {
            return false;
        };
        let before = dependents.len();
        dependents.retain(|d| d != dependent);
        let removed = dependents.len() != before;
        if dependents.is_empty() {
            self.dependents.remove(sensor_id);
        }
        removed
    }

    #[must_use]
    pub fn is_subscribed(&self, sensor_id: &Identifier, dependent: &D) -> bool {
        self.dependents(sensor_id).contains(dependent)
    }

    /// Current dependents of `sensor_id`, empty for unknown sensors.
    #[must_use]
    pub fn dependents(&self, sensor_id: &Identifier) -> &[D] {
        self.dependents
            .get(sensor_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of sensors with at least one dependent.
    #[must_use]
    pub fn sensor_count(&self) -> usize {
        self.dependents.len()
    }

    /// Keep only the subscriptions for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Identifier, &D) -> bool) {
        self.dependents.retain(|sensor_id, dependents| {
            dependents.retain(|d| keep(sensor_id, d));
            !dependents.is_empty()
        });
    }

    pub fn clear(&mut self) {
        self.dependents.clear();
    }
}

impl<D: SensorDependent + PartialEq> SensorRegistry<D> {
    /// Fan `value` out to every current dependent of `sensor_id`.
    ///
    /// Dependents reporting [`Delivery::Stale`] are unsubscribed and handed
    /// back in [`FanOut::released`]. A failing dependent does not prevent the
    /// others from being notified.
    pub fn notify(&mut self, sensor_id: &Identifier, value: &SensorValue) -> FanOut<D, D::Error> {
        let mut fan_out = FanOut::default();
        let Some(dependents) = self.dependents.remove(sensor_id) else {
            return fan_out;
        };

        let mut kept = Vec::with_capacity(dependents.len());
        for dependent in dependents {
            match dependent.sensor_changed(sensor_id, value) {
                Ok(Delivery::Applied) => {
                    fan_out.applied += 1;
                    kept.push(dependent);
                }
                Ok(Delivery::Stale) => fan_out.released.push(dependent),
                Err(err) => {
                    fan_out.errors.push(err);
                    kept.push(dependent);
                }
            }
        }

        if !kept.is_empty() {
            self.dependents.insert(sensor_id.clone(), kept);
        }
        fan_out
    }
}
