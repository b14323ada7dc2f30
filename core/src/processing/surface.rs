use crate::math::stats::StatsHelper;
use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageOutput, StageResult,
};
use crate::telemetry::log::LogManager;

/// Finds where the tip leaves the air and enters the snowpack.
///
/// The leading `air_fraction` of the recording gives the baseline force and
/// its noise. The surface is the first smoothed sample rising clearly above
/// that baseline.
pub struct SurfaceStage {
    config: Option<StageConfig>,
    logger: LogManager,
}

impl SurfaceStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new("smpcore::surface"),
        }
    }
}

impl Default for SurfaceStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for SurfaceStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        if !(0.0..1.0).contains(&config.air_fraction) {
            return Err(StageError::InvalidInput(format!(
                "air fraction {} outside [0, 1)",
                config.air_fraction
            )));
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: &StageInput) -> StageResult<StageOutput> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        if input.is_empty() {
            return Err(StageError::InvalidInput("no samples to scan".into()));
        }

        let len = input.len();
        let air_len = ((len as f64 * config.air_fraction).ceil() as usize).clamp(1, len);
        let air = &input.force[..air_len];
        let baseline = StatsHelper::mean(air);
        let noise = StatsHelper::std_dev(air);
        let threshold = baseline + (config.noise_factor * noise).max(config.min_step);

        let smoothed = StatsHelper::moving_average(&input.force, config.smoothing_window);
        let idx = smoothed
            .iter()
            .position(|&value| value > threshold)
            .ok_or_else(|| {
                StageError::NotFound(format!("force never exceeds {:.4} N", threshold))
            })?;

        let position = input.distance[idx];
        self.logger.record(&format!(
            "SurfaceStage surface {:.3} mm (threshold {:.4} N)",
            position, threshold
        ));

        Ok(StageOutput {
            position: Some(position),
            notes: vec![format!("surface threshold {:.4}", threshold)],
            ..Default::default()
        })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
