use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageOutput, StageResult,
};
use crate::telemetry::log::LogManager;

/// Places the ground where the force first reaches overload, or at the last
/// sample when the recording never overloads.
pub struct GroundStage {
    config: Option<StageConfig>,
    logger: LogManager,
}

impl GroundStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new("smpcore::ground"),
        }
    }
}

impl Default for GroundStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for GroundStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: &StageInput) -> StageResult<StageOutput> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let last = input
            .distance
            .last()
            .copied()
            .ok_or_else(|| StageError::InvalidInput("no samples to scan".into()))?;

        let overloaded = input.force.iter().position(|&f| f >= config.overload);
        let position = overloaded.map(|idx| input.distance[idx]).unwrap_or(last);
        let note = match overloaded {
            Some(_) => format!("overload {:.1} N reached", config.overload),
            None => "no overload, using last sample".to_string(),
        };
        self.logger
            .record(&format!("GroundStage ground {:.3} mm ({})", position, note));

        Ok(StageOutput {
            position: Some(position),
            notes: vec![note],
            ..Default::default()
        })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StageConfig {
        StageConfig {
            overload: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn ground_stage_stops_at_first_overload() {
        let mut stage = GroundStage::new();
        stage.initialize(&config()).unwrap();
        let input =
            StageInput::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.1, 10.0, 12.0, 3.0]).unwrap();
        let output = stage.execute(&input).unwrap();
        assert_eq!(output.position, Some(1.0));
        stage.cleanup();
    }

    #[test]
    fn ground_stage_falls_back_to_last_sample() {
        let mut stage = GroundStage::new();
        stage.initialize(&config()).unwrap();
        let input = StageInput::new(vec![0.0, 1.0, 2.0], vec![0.1, 0.2, 0.3]).unwrap();
        let output = stage.execute(&input).unwrap();
        assert_eq!(output.position, Some(2.0));
        assert!(output.notes[0].starts_with("no overload"));
    }

    #[test]
    fn ground_stage_rejects_empty_input() {
        let mut stage = GroundStage::new();
        stage.initialize(&config()).unwrap();
        let input = StageInput::new(Vec::new(), Vec::new()).unwrap();
        assert!(matches!(
            stage.execute(&input),
            Err(StageError::InvalidInput(_))
        ));
    }
}
