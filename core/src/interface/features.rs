use serde::{Deserialize, Serialize};
use std::collections::btree_map::{BTreeMap, Iter};

/// A single named feature: a scalar or a short numeric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Scalar(f64),
    Array(Vec<f64>),
}

impl FeatureValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            FeatureValue::Scalar(value) => Some(*value),
            FeatureValue::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            FeatureValue::Scalar(_) => None,
            FeatureValue::Array(values) => Some(values),
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            FeatureValue::Scalar(value) => value.is_finite(),
            FeatureValue::Array(values) => values.iter().all(|v| v.is_finite()),
        }
    }
}

/// Flat, name-ordered mapping of extracted features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMap {
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_scalar(&mut self, name: &str, value: f64) {
        self.values
            .insert(name.to_string(), FeatureValue::Scalar(value));
    }

    pub fn insert_array(&mut self, name: &str, values: Vec<f64>) {
        self.values
            .insert(name.to_string(), FeatureValue::Array(values));
    }

    /// Builder-style insertion, mostly for hand-written feature maps.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert_scalar(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(FeatureValue::as_scalar)
    }

    pub fn array(&self, name: &str) -> Option<&[f64]> {
        self.values.get(name).and_then(FeatureValue::as_array)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, FeatureValue> {
        self.values.iter()
    }

    /// Scalar features only, in name order.
    pub fn scalars(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .filter_map(|(name, value)| value.as_scalar().map(|v| (name.as_str(), v)))
    }

    pub fn extend(&mut self, other: FeatureMap) {
        self.values.extend(other.values);
    }

    pub fn all_finite(&self) -> bool {
        self.values.values().all(FeatureValue::is_finite)
    }
}

impl<'a> IntoIterator for &'a FeatureMap {
    type Item = (&'a String, &'a FeatureValue);
    type IntoIter = Iter<'a, String, FeatureValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_array_lookups_are_typed() {
        let mut map = FeatureMap::new().with("speed_mean", 12.5);
        map.insert_array("speed", vec![12.0, 13.0]);

        assert_eq!(map.scalar("speed_mean"), Some(12.5));
        assert_eq!(map.scalar("speed"), None);
        assert_eq!(map.array("speed"), Some(&[12.0, 13.0][..]));
        assert_eq!(map.scalar("missing"), None);
        assert_eq!(map.scalars().count(), 1);
    }

    #[test]
    fn non_finite_values_are_reported() {
        let mut map = FeatureMap::new().with("a", 1.0);
        assert!(map.all_finite());
        map.insert_array("b", vec![0.0, f64::INFINITY]);
        assert!(!map.all_finite());
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut map = FeatureMap::new().with("duration", 60.0);
        map.insert_array("g_force", vec![1.0, 2.0]);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["duration"], 60.0);
        assert_eq!(json["g_force"][1], 2.0);
    }
}
