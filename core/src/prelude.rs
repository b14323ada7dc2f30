use serde::{Deserialize, Serialize};

/// Tuning shared by the analysis stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Moving-average window (samples) used before surface detection.
    pub smoothing_window: usize,
    /// Leading share of the recording treated as air for the baseline.
    pub air_fraction: f64,
    /// Baseline standard deviations the force must exceed at the surface.
    pub noise_factor: f64,
    /// Minimum force step above baseline (N) regardless of noise.
    pub min_step: f64,
    /// Overload force (N) that marks the ground.
    pub overload: f64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 50,
            air_fraction: 0.05,
            noise_factor: 8.0,
            min_step: 0.02,
            overload: 40.0,
        }
    }
}

/// Force/penetration samples handed to a stage.
#[derive(Debug, Clone)]
pub struct StageInput {
    pub distance: Vec<f64>,
    pub force: Vec<f64>,
}

impl StageInput {
    pub fn new(distance: Vec<f64>, force: Vec<f64>) -> StageResult<Self> {
        if distance.len() != force.len() {
            return Err(StageError::InvalidInput(format!(
                "distance has {} samples but force has {}",
                distance.len(),
                force.len()
            )));
        }
        Ok(Self { distance, force })
    }

    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }
}

/// Result of a stage run.
#[derive(Debug, Clone, Default)]
pub struct StageOutput {
    /// Marker position (mm) found by a detection stage.
    pub position: Option<f64>,
    pub drift: Option<DriftEstimate>,
    pub notes: Vec<String>,
}

/// Linear drift fitted over a force segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftEstimate {
    /// Slope in N/mm.
    pub drift: f64,
    /// Force at the segment start in N.
    pub offset: f64,
    /// Residual standard deviation in N.
    pub noise: f64,
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("nothing found: {0}")]
    NotFound(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Analysis step run by the controller over a profile's samples.
pub trait ProcessingStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()>;
    fn execute(&mut self, input: &StageInput) -> StageResult<StageOutput>;
    fn cleanup(&mut self);
}
