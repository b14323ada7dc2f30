use serde::{Deserialize, Serialize};

pub const SURFACE: &str = "surface";
pub const GROUND: &str = "ground";

/// Named position along a profile. A `None` value means "not set".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub label: String,
    pub value: Option<f64>,
}

impl Marker {
    pub fn new(label: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Marker labels in insertion order; labels are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Marker>", into = "Vec<Marker>")]
pub struct MarkerSet {
    entries: Vec<Marker>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|marker| marker.label == label)
            .and_then(|marker| marker.value)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Overwrites an existing label in place, otherwise appends.
    pub fn set(&mut self, label: &str, value: Option<f64>) {
        match self.entries.iter_mut().find(|marker| marker.label == label) {
            Some(marker) => marker.value = value,
            None => self.entries.push(Marker::new(label, value)),
        }
    }

    /// Drops the label and returns the value it held, if any.
    pub fn remove(&mut self, label: &str) -> Option<f64> {
        let idx = self.entries.iter().position(|marker| marker.label == label)?;
        self.entries.remove(idx).value
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries
            .iter()
            .map(|marker| (marker.label.as_str(), marker.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Marker>> for MarkerSet {
    fn from(markers: Vec<Marker>) -> Self {
        let mut set = MarkerSet::new();
        for marker in markers {
            set.set(&marker.label, marker.value);
        }
        set
    }
}

impl From<MarkerSet> for Vec<Marker> {
    fn from(set: MarkerSet) -> Self {
        set.entries
    }
}
