use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use smpcore::prelude::StageConfig;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

pub const DRIFT_BEGIN: &str = "drift_begin";
pub const DRIFT_END: &str = "drift_end";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub bridge_address: SocketAddr,
    pub stages: StageConfig,
    /// Marker labels bounding the drift fit when both are set.
    pub drift_begin_label: String,
    pub drift_end_label: String,
    pub generator: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            bridge_address: SocketAddr::from(([127, 0, 0, 1], 9000)),
            stages: StageConfig::default(),
            drift_begin_label: DRIFT_BEGIN.to_string(),
            drift_end_label: DRIFT_END.to_string(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Stage tuning with the overload taken from the open profile when it has one.
    pub fn to_stage_config(&self, profile_overload: f64) -> StageConfig {
        let mut stages = self.stages.clone();
        if profile_overload > 0.0 {
            stages.overload = profile_overload;
        }
        stages
    }
}
