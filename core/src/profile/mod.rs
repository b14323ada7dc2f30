pub mod markers;
pub mod qa;
pub mod recording;

pub use markers::{Marker, MarkerSet, GROUND, SURFACE};
pub use qa::{QaRecord, QaTextField, QualityFlag};
pub use recording::{Coordinates, Profile, Samples, SmpDevice};

use std::path::PathBuf;

/// Errors raised while building or loading a profile.
#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("distance has {distance} samples but force has {force}")]
    LengthMismatch { distance: usize, force: usize },
    #[error("quality flag level {0} is not one of 0, 1, 2, 3, 4, 9")]
    InvalidQualityLevel(u8),
    #[error("reading profile {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed profile json: {0}")]
    Json(#[from] serde_json::Error),
}
