use crate::math::stats::StatsHelper;
use crate::prelude::{
    DriftEstimate, ProcessingStage, StageConfig, StageError, StageInput, StageOutput,
    StageResult,
};
use crate::telemetry::log::LogManager;

/// Fits a line through a force segment (normally the air before the surface)
/// to estimate sensor drift, offset and noise.
pub struct DriftStage {
    configured: bool,
    logger: LogManager,
}

impl DriftStage {
    pub fn new() -> Self {
        Self {
            configured: false,
            logger: LogManager::new("smpcore::drift"),
        }
    }
}

impl Default for DriftStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for DriftStage {
    fn initialize(&mut self, _config: &StageConfig) -> StageResult<()> {
        self.configured = true;
        Ok(())
    }

    fn execute(&mut self, input: &StageInput) -> StageResult<StageOutput> {
        if !self.configured {
            return Err(StageError::Internal("stage not initialized".into()));
        }
        if input.len() < 2 {
            return Err(StageError::InvalidInput(format!(
                "need at least 2 samples, got {}",
                input.len()
            )));
        }

        let fit = StatsHelper::linear_fit(&input.distance, &input.force)
            .ok_or_else(|| StageError::InvalidInput("segment has no distance span".into()))?;
        let residuals: Vec<f64> = input
            .distance
            .iter()
            .zip(&input.force)
            .map(|(&d, &f)| f - fit.at(d))
            .collect();

        let estimate = DriftEstimate {
            drift: fit.slope,
            offset: fit.at(input.distance[0]),
            noise: StatsHelper::std_dev(&residuals),
        };
        self.logger.record(&format!(
            "DriftStage drift {:.3e} N/mm, offset {:.4} N, noise {:.4} N",
            estimate.drift, estimate.offset, estimate.noise
        ));

        Ok(StageOutput {
            drift: Some(estimate),
            notes: vec![format!(
                "fitted {} samples, residual rms {:.4}",
                input.len(),
                StatsHelper::rms(&residuals)
            )],
            ..Default::default()
        })
    }

    fn cleanup(&mut self) {
        self.configured = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_stage_recovers_slope_and_offset() {
        let mut stage = DriftStage::new();
        stage.initialize(&StageConfig::default()).unwrap();
        let distance: Vec<f64> = (0..10).map(|i| 5.0 + i as f64).collect();
        let force: Vec<f64> = distance.iter().map(|d| 0.002 * d + 0.1).collect();
        let input = StageInput::new(distance, force).unwrap();

        let estimate = stage.execute(&input).unwrap().drift.unwrap();
        assert!((estimate.drift - 0.002).abs() < 1e-12);
        assert!((estimate.offset - 0.11).abs() < 1e-12);
        assert!(estimate.noise < 1e-12);
        stage.cleanup();
    }

    #[test]
    fn drift_stage_measures_residual_noise() {
        let mut stage = DriftStage::new();
        stage.initialize(&StageConfig::default()).unwrap();
        let input =
            StageInput::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, -1.0, 1.0, -1.0]).unwrap();
        let estimate = stage.execute(&input).unwrap().drift.unwrap();
        assert!(estimate.noise > 0.8 && estimate.noise < 1.0);
    }

    #[test]
    fn drift_stage_needs_two_samples() {
        let mut stage = DriftStage::new();
        stage.initialize(&StageConfig::default()).unwrap();
        let input = StageInput::new(vec![1.0], vec![0.0]).unwrap();
        assert!(matches!(
            stage.execute(&input),
            Err(StageError::InvalidInput(_))
        ));
    }
}
