//! Sensor mapping: translation table from raw sensor values to the values a
//! component property receives.

use serde::{Deserialize, Serialize};

use super::{PropertyValue, SensorValue};

/// One `(match, present)` pair of a [`SensorMapping`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub matches: SensorValue,
    pub presents: PropertyValue,
}

/// Ordered translation table.
///
/// Match values are unique: inserting an existing match value replaces the
/// presented value in place and keeps its position. An empty mapping is the
/// identity translation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorMapping {
    entries: Vec<MappingEntry>,
}

impl SensorMapping {
    /// The identity translation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with(
        mut self,
        matches: impl Into<SensorValue>,
        presents: impl Into<PropertyValue>,
    ) -> Self {
        self.insert(matches, presents);
        self
    }

    pub fn insert(&mut self, matches: impl Into<SensorValue>, presents: impl Into<PropertyValue>) {
        let matches = matches.into();
        let presents = presents.into();
        match self.entries.iter_mut().find(|e| e.matches == matches) {
            Some(entry) => entry.presents = presents,
            None => self.entries.push(MappingEntry { matches, presents }),
        }
    }

    /// The presented value for an exact match on `raw`, if any.
    #[must_use]
    pub fn lookup(&self, raw: &SensorValue) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|e| &e.matches == raw)
            .map(|e| &e.presents)
    }

    /// Translate `raw`, passing it through unmodified when nothing matches.
    #[must_use]
    pub fn resolve(&self, raw: &SensorValue) -> PropertyValue {
        self.lookup(raw)
            .cloned()
            .unwrap_or_else(|| PropertyValue::from(raw.clone()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter()
    }
}

impl<M, P> FromIterator<(M, P)> for SensorMapping
where
    M: Into<SensorValue>,
    P: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (M, P)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (matches, presents) in iter {
            mapping.insert(matches, presents);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::Color;

    fn on_off() -> SensorMapping {
        SensorMapping::new().with(0, false).with(1, true)
    }

    #[test]
    fn should_translate_exact_match() {
        let mapping = on_off();
        assert_eq!(
            mapping.resolve(&SensorValue::from(1)),
            PropertyValue::Bool(true)
        );
        assert_eq!(
            mapping.resolve(&SensorValue::from(0)),
            PropertyValue::Bool(false)
        );
    }

    #[test]
    fn should_pass_through_when_no_entry_matches() {
        let mapping = on_off();
        assert_eq!(
            mapping.resolve(&SensorValue::from(7)),
            PropertyValue::Number(7.0)
        );
    }

    #[test]
    fn should_behave_as_identity_when_empty() {
        let mapping = SensorMapping::new();
        for raw in [
            SensorValue::from(50),
            SensorValue::from("idle"),
            SensorValue::from(Color::rgb(9, 8, 7)),
        ] {
            assert_eq!(mapping.resolve(&raw), PropertyValue::from(raw.clone()));
        }
    }

    #[test]
    fn should_not_match_across_variants() {
        let mapping = SensorMapping::new().with("1", "one");
        assert_eq!(
            mapping.resolve(&SensorValue::from(1)),
            PropertyValue::Number(1.0)
        );
    }

    #[test]
    fn should_replace_presented_value_when_match_already_present() {
        let mut mapping = on_off();
        mapping.insert(1, "ON");
        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.lookup(&SensorValue::from(1)),
            Some(&PropertyValue::Text("ON".to_string()))
        );
        let order: Vec<_> = mapping.entries().map(|e| e.matches.clone()).collect();
        assert_eq!(order, vec![SensorValue::from(0), SensorValue::from(1)]);
    }

    #[test]
    fn should_collect_from_pairs() {
        let mapping: SensorMapping = [("on", true), ("off", false)].into_iter().collect();
        assert_eq!(mapping.len(), 2);
        assert!(!mapping.is_empty());
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let mapping = on_off();
        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(
            json,
            r#"[{"matches":0.0,"presents":false},{"matches":1.0,"presents":true}]"#
        );
        let parsed: SensorMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, mapping);
    }
}
