use crate::workflow::config::WorkflowConfig;
use anyhow::{anyhow, Context};
use log::{debug, info, warn};
use smpcore::prelude::{DriftEstimate, ProcessingStage, StageConfig, StageInput, StageOutput};
use smpcore::processing::{DriftStage, GroundStage, SurfaceStage};
use smpcore::profile::{Profile, GROUND, SURFACE};
use smpcore::sidebar::{
    DetectKind, EventOutcome, PanelCommand, PanelEvent, SidebarPanel, SidebarView,
};
use smpcore::telemetry::{MetricsRecorder, MetricsSnapshot};
use std::path::Path;

/// Drift fit bounds used for the most recent computation.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftWindow {
    pub begin_label: String,
    pub begin: f64,
    pub end_label: String,
    pub end: f64,
}

/// Owns the open profile and the sidebar bound to it.
///
/// The sidebar only queues commands; everything that changes the profile
/// happens here, after which the sidebar is told what to show.
pub struct Controller {
    config: WorkflowConfig,
    profile: Option<Profile>,
    panel: SidebarPanel,
    drift: Option<DriftEstimate>,
    metrics: MetricsRecorder,
}

impl Controller {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            profile: None,
            panel: SidebarPanel::new(),
            drift: None,
            metrics: MetricsRecorder::new(),
        }
    }

    /// Opens `profile`, replacing whatever was open before.
    pub fn open(&mut self, profile: Profile) {
        info!(
            "opening profile {} ({} samples)",
            profile.name,
            profile.sample_count()
        );
        self.panel.bind(Some(&profile));
        self.profile = Some(profile);
        self.refresh_drift();
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn panel(&self) -> &SidebarPanel {
        &self.panel
    }

    pub fn view(&self) -> SidebarView {
        self.panel.render()
    }

    pub fn drift(&self) -> Option<DriftEstimate> {
        self.drift
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Feeds a user event to the sidebar and applies whatever it queued.
    pub fn dispatch(&mut self, event: PanelEvent) -> EventOutcome {
        let outcome = self.panel.handle(event);
        match outcome {
            EventOutcome::Rejected => self.metrics.record_rejected(),
            EventOutcome::Ignored => debug!("sidebar ignored event"),
            EventOutcome::Forwarded => {}
        }
        self.process_commands();
        outcome
    }

    /// Applies a command as if the sidebar had queued it.
    pub fn run_command(&mut self, command: PanelCommand) -> anyhow::Result<()> {
        let result = self.apply(command);
        self.process_commands();
        result
    }

    /// Drains the sidebar queue in FIFO order until it stays empty.
    pub fn process_commands(&mut self) -> usize {
        let mut applied = 0;
        while let Some(command) = self.panel.next_command() {
            match self.apply(command) {
                Ok(()) => applied += 1,
                Err(err) => {
                    warn!("command failed: {:#}", err);
                    self.metrics.record_failed();
                }
            }
        }
        applied
    }

    fn apply(&mut self, command: PanelCommand) -> anyhow::Result<()> {
        let profile = self
            .profile
            .as_mut()
            .ok_or_else(|| anyhow!("no profile open"))?;

        match command {
            PanelCommand::SetMarker { label, value } => {
                self.write_marker(&label, value);
            }
            PanelCommand::ClearMarker { label } => {
                // The panel echoes a clear back once its row is gone.
                if !profile.markers.contains(&label) {
                    debug!("marker {} already cleared", label);
                    return Ok(());
                }
                profile.clear_marker(&label);
                debug!("cleared marker {}", label);
                self.panel.set_marker(&label, None);
                self.refresh_drift();
            }
            PanelCommand::Detect { kind } => {
                let position = self.detect(kind)?;
                let label = match kind {
                    DetectKind::Surface => SURFACE,
                    DetectKind::Ground => GROUND,
                };
                info!("detected {} at {:.3} mm", label, position);
                self.write_marker(label, position);
            }
            PanelCommand::SetUsable { usable } => {
                profile.qa.usable = usable;
            }
            PanelCommand::SetQualityFlag { flag } => {
                profile.qa.quality_flag = flag;
            }
            PanelCommand::SetQaText { field, text } => {
                profile.qa.set_text(field, text);
            }
        }
        self.metrics.record_applied();
        Ok(())
    }

    fn write_marker(&mut self, label: &str, value: f64) {
        if let Some(profile) = self.profile.as_mut() {
            profile.set_marker(label, value);
            self.panel.set_marker(label, Some(value));
            self.refresh_drift();
        }
    }

    fn detect(&self, kind: DetectKind) -> anyhow::Result<f64> {
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| anyhow!("no profile open"))?;
        let input = profile
            .samples
            .to_stage_input()
            .context("preparing detection input")?;
        let stage_config = self.config.to_stage_config(profile.overload);

        let output = match kind {
            DetectKind::Surface => run_stage(SurfaceStage::new(), &stage_config, &input)
                .context("detecting surface")?,
            DetectKind::Ground => run_stage(GroundStage::new(), &stage_config, &input)
                .context("detecting ground")?,
        };
        output
            .position
            .ok_or_else(|| anyhow!("detection produced no position"))
    }

    /// Picks the drift fit bounds: the configured drift markers, otherwise
    /// the air from the first sample down to the surface, otherwise the
    /// whole recording.
    pub fn drift_window(&self) -> Option<DriftWindow> {
        let profile = self.profile.as_ref()?;
        let first = *profile.samples.distance.first()?;
        // Segments are half-open, so step past the last sample.
        let last = *profile.samples.distance.last()? + profile.spatial_resolution.max(1e-9);

        let begin_label = &self.config.drift_begin_label;
        let end_label = &self.config.drift_end_label;
        let window = match (profile.marker(begin_label), profile.marker(end_label)) {
            (Some(begin), Some(end)) => DriftWindow {
                begin_label: begin_label.clone(),
                begin,
                end_label: end_label.clone(),
                end,
            },
            _ => match profile.marker(SURFACE) {
                Some(surface) => DriftWindow {
                    begin_label: "start".into(),
                    begin: first,
                    end_label: SURFACE.into(),
                    end: surface,
                },
                None => DriftWindow {
                    begin_label: "start".into(),
                    begin: first,
                    end_label: "end".into(),
                    end: last,
                },
            },
        };
        Some(window)
    }

    fn refresh_drift(&mut self) {
        let Some(window) = self.drift_window() else {
            self.drift = None;
            self.panel.clear_drift();
            return;
        };
        let estimate = self.estimate_drift(&window);
        match estimate {
            Ok(estimate) => {
                self.panel.set_drift(
                    &window.begin_label,
                    &window.end_label,
                    estimate.drift,
                    estimate.offset,
                    estimate.noise,
                );
                self.drift = Some(estimate);
            }
            Err(err) => {
                debug!("drift not available: {:#}", err);
                self.drift = None;
                self.panel.clear_drift();
            }
        }
    }

    fn estimate_drift(&self, window: &DriftWindow) -> anyhow::Result<DriftEstimate> {
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| anyhow!("no profile open"))?;
        let segment = profile
            .samples
            .segment(window.begin, window.end)
            .context("selecting drift segment")?;
        let stage_config = self.config.to_stage_config(profile.overload);
        let output =
            run_stage(DriftStage::new(), &stage_config, &segment).context("fitting drift")?;
        output
            .drift
            .ok_or_else(|| anyhow!("drift stage produced no estimate"))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| anyhow!("no profile open"))?;
        profile
            .save(path_ref)
            .with_context(|| format!("saving profile {}", path_ref.display()))
    }
}

fn run_stage<S: ProcessingStage>(
    mut stage: S,
    config: &StageConfig,
    input: &StageInput,
) -> anyhow::Result<StageOutput> {
    stage.initialize(config).context("initializing stage")?;
    let output = stage.execute(input).context("executing stage");
    stage.cleanup();
    output
}
