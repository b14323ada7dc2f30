use crate::prelude::{StageInput, StageResult};
use crate::profile::markers::MarkerSet;
use crate::profile::qa::QaRecord;
use crate::profile::ProfileError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// GPS position of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// SnowMicroPen device the profile was recorded with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmpDevice {
    pub serial: String,
    pub firmware: String,
    /// Maximum recording length in mm.
    pub length: u32,
    /// Tip diameter in µm.
    pub tip_diameter: f64,
    /// Sensor sensitivity in pC/N.
    pub sensor_sensitivity: f64,
    pub sensor_serial: String,
    pub amplifier_serial: String,
}

/// Force over penetration depth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    /// Depth in mm.
    pub distance: Vec<f64>,
    /// Force in N.
    pub force: Vec<f64>,
}

impl Samples {
    pub fn new(distance: Vec<f64>, force: Vec<f64>) -> Result<Self, ProfileError> {
        if distance.len() != force.len() {
            return Err(ProfileError::LengthMismatch {
                distance: distance.len(),
                force: force.len(),
            });
        }
        Ok(Self { distance, force })
    }

    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    /// Samples whose distance lies within `[begin, end)`.
    pub fn segment(&self, begin: f64, end: f64) -> StageResult<StageInput> {
        let (lo, hi) = if begin <= end { (begin, end) } else { (end, begin) };
        let (distance, force): (Vec<f64>, Vec<f64>) = self
            .distance
            .iter()
            .zip(&self.force)
            .filter(|(d, _)| **d >= lo && **d < hi)
            .map(|(d, f)| (*d, *f))
            .unzip();
        StageInput::new(distance, force)
    }

    pub fn to_stage_input(&self) -> StageResult<StageInput> {
        StageInput::new(self.distance.clone(), self.force.clone())
    }
}

/// One SMP penetration-force recording plus its metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub pnt_file: PathBuf,
    pub timestamp: Option<NaiveDateTime>,
    /// Recording length in mm.
    pub recording_length: f64,
    /// Distance between samples in mm.
    pub spatial_resolution: f64,
    /// Overload force in N.
    pub overload: f64,
    /// Traverse speed in mm/s.
    pub speed: f64,
    pub coordinates: Option<Coordinates>,
    pub device: SmpDevice,
    pub samples: Samples,
    pub markers: MarkerSet,
    pub qa: QaRecord,
}

impl Profile {
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn marker(&self, label: &str) -> Option<f64> {
        self.markers.get(label)
    }

    pub fn set_marker(&mut self, label: &str, value: f64) {
        self.markers.set(label, Some(value));
    }

    /// Returns `true` when a value was actually cleared.
    pub fn clear_marker(&mut self, label: &str) -> bool {
        self.markers.remove(label).is_some()
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.samples.distance.len() != self.samples.force.len() {
            return Err(ProfileError::LengthMismatch {
                distance: self.samples.distance.len(),
                force: self.samples.force.len(),
            });
        }
        Ok(())
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ProfileError> {
        let profile: Profile = serde_json::from_str(contents)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|source| ProfileError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;
        let mut profile = Self::from_json_str(&contents)?;
        if profile.pnt_file.as_os_str().is_empty() {
            profile.pnt_file = path_ref.to_path_buf();
        }
        Ok(profile)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ProfileError> {
        let path_ref = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path_ref, contents).map_err(|source| ProfileError::Io {
            path: path_ref.to_path_buf(),
            source,
        })
    }
}
