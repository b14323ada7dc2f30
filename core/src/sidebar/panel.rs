use crate::profile::{Profile, QaRecord, QaTextField, GROUND, SURFACE};
use crate::sidebar::command::{CommandQueue, DetectKind, EventOutcome, PanelCommand, PanelEvent};
use crate::sidebar::format::{self, CoordinatesCell};
use crate::sidebar::rows::{
    CoordinatesRow, FieldRow, MarkerRow, QaCheckboxRow, QaCommentRow, QaFlagRow, SidebarRow,
};
use crate::sidebar::view::{SidebarSection, SidebarView};
use crate::telemetry::log::LogManager;

pub const RECORDING_SECTION: &str = "Recording";
pub const SMP_SECTION: &str = "SnowMicroPen";
pub const MARKERS_SECTION: &str = "Markers";
pub const QA_SECTION: &str = "Quality Assurance";
pub const DRIFT_SECTION: &str = "Drift, Offset, Noise";

/// Formatted recording fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingFields {
    pub name: String,
    pub pnt_file: String,
    pub timestamp: String,
    pub coordinates: CoordinatesCell,
    pub length: String,
    pub spatial_resolution: String,
    pub overload: String,
    pub speed: String,
}

/// Formatted SnowMicroPen device fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFields {
    pub serial: String,
    pub firmware: String,
    pub max_length: String,
    pub tip_diameter: String,
    pub sensor_sensitivity: String,
    pub sensor_serial: String,
    pub amplifier_serial: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriftFields {
    pub begin: String,
    pub end: String,
    pub drift: String,
    pub offset: String,
    pub noise: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QaRows {
    usable: QaCheckboxRow,
    quality: QaFlagRow,
    comments: Vec<QaCommentRow>,
}

impl Default for QaRows {
    fn default() -> Self {
        Self {
            usable: QaCheckboxRow {
                name: "usable",
                checked: false,
            },
            quality: QaFlagRow {
                name: "quality_flag",
                selected: None,
            },
            comments: QaTextField::ALL
                .iter()
                .map(|field| QaCommentRow {
                    field: *field,
                    text: String::new(),
                })
                .collect(),
        }
    }
}

impl QaRows {
    fn load(&mut self, qa: &QaRecord) {
        self.usable.checked = qa.usable;
        self.quality.selected = Some(qa.quality_flag);
        for row in &mut self.comments {
            row.text = qa.text(row.field).to_string();
        }
    }

    fn comment_mut(&mut self, field: QaTextField) -> Option<&mut QaCommentRow> {
        self.comments.iter_mut().find(|row| row.field == field)
    }
}

/// View-model of the profile sidebar.
///
/// The panel never writes a [`Profile`]. User edits become [`PanelCommand`]s
/// on an internal queue; the owning controller drains them, updates the
/// profile and reflects the result back through [`SidebarPanel::set_marker`]
/// or [`SidebarPanel::bind`].
pub struct SidebarPanel {
    recording: RecordingFields,
    device: DeviceFields,
    markers: Vec<MarkerRow>,
    qa: QaRows,
    drift: DriftFields,
    queue: CommandQueue,
    logger: LogManager,
}

impl SidebarPanel {
    pub fn new() -> Self {
        Self {
            recording: RecordingFields::default(),
            device: DeviceFields::default(),
            markers: Vec::new(),
            qa: QaRows::default(),
            drift: DriftFields::default(),
            queue: CommandQueue::new(),
            logger: LogManager::new("smpcore::sidebar"),
        }
    }

    /// Shows `profile`. `None` leaves the panel untouched.
    ///
    /// Marker rows, drift fields and pending commands from the previous
    /// profile are discarded, never merged.
    pub fn bind(&mut self, profile: Option<&Profile>) {
        let Some(p) = profile else {
            return;
        };

        self.recording = RecordingFields {
            name: p.name.clone(),
            pnt_file: p.pnt_file.display().to_string(),
            timestamp: format::format_timestamp(p.timestamp.as_ref()),
            coordinates: CoordinatesCell::from_coordinates(p.coordinates.as_ref()),
            length: format::format_recording_length(p.recording_length, p.sample_count()),
            spatial_resolution: format::format_spatial_resolution(p.spatial_resolution),
            overload: format::format_overload(p.overload),
            speed: format::format_speed(p.speed),
        };

        self.device = DeviceFields {
            serial: p.device.serial.clone(),
            firmware: p.device.firmware.clone(),
            max_length: format::format_max_length(p.device.length),
            tip_diameter: format::format_tip_diameter(p.device.tip_diameter),
            sensor_sensitivity: format::format_sensitivity(p.device.sensor_sensitivity),
            sensor_serial: p.device.sensor_serial.clone(),
            amplifier_serial: p.device.amplifier_serial.clone(),
        };

        self.qa.load(&p.qa);
        self.drift = DriftFields::default();

        let dropped = self.queue.clear();
        if dropped > 0 {
            self.logger
                .trace(&format!("dropped {} stale commands on rebind", dropped));
        }

        self.markers.clear();
        for (label, value) in p.markers.iter() {
            self.set_marker(label, value);
        }
        self.logger.record(&format!(
            "bound profile {} ({} markers)",
            p.name,
            self.markers.len()
        ));
    }

    /// Shows, updates or removes the row for `label`.
    ///
    /// Removing an existing row also queues a clear command so the controller
    /// drops the marker; removing a missing row does nothing.
    pub fn set_marker(&mut self, label: &str, value: Option<f64>) {
        let Some(value) = value else {
            if let Some(idx) = self.marker_index(label) {
                self.markers.remove(idx);
                self.queue.push(PanelCommand::ClearMarker {
                    label: label.to_string(),
                });
            }
            return;
        };

        let text = format::format_marker_value(value);
        match self.marker_index(label) {
            Some(idx) => self.markers[idx].text = text,
            None => self.markers.push(MarkerRow {
                label: label.to_string(),
                text,
                deletable: true,
                detectable: label == SURFACE || label == GROUND,
            }),
        }
    }

    /// Shows a drift/offset/noise result computed elsewhere.
    ///
    /// `drift` is N/mm and `offset`/`noise` are N.
    pub fn set_drift(
        &mut self,
        begin_label: &str,
        end_label: &str,
        drift: f64,
        offset: f64,
        noise: f64,
    ) {
        self.drift = DriftFields {
            begin: begin_label.to_string(),
            end: end_label.to_string(),
            drift: format::format_drift(drift),
            offset: format::format_millinewton(offset),
            noise: format::format_millinewton(noise),
        };
    }

    /// Blanks the drift section when no estimate is available.
    pub fn clear_drift(&mut self) {
        self.drift = DriftFields::default();
    }

    /// Translates a user interaction into a queued command.
    pub fn handle(&mut self, event: PanelEvent) -> EventOutcome {
        match event {
            PanelEvent::MarkerEdited { label, text } => {
                if self.marker_index(&label).is_none() {
                    return EventOutcome::Ignored;
                }
                match format::parse_marker_text(&text) {
                    Some(value) => {
                        self.queue.push(PanelCommand::SetMarker { label, value });
                        EventOutcome::Forwarded
                    }
                    None => {
                        self.logger
                            .trace(&format!("rejected marker text {:?} for {}", text, label));
                        EventOutcome::Rejected
                    }
                }
            }
            PanelEvent::MarkerDeleted { label } => {
                if self.marker_index(&label).is_none() {
                    return EventOutcome::Ignored;
                }
                self.queue.push(PanelCommand::ClearMarker { label });
                EventOutcome::Forwarded
            }
            PanelEvent::MarkerDetect { label } => {
                let detectable = self
                    .marker_index(&label)
                    .map(|idx| self.markers[idx].detectable)
                    .unwrap_or(false);
                if !detectable {
                    return EventOutcome::Ignored;
                }
                let kind = if label == SURFACE {
                    DetectKind::Surface
                } else {
                    DetectKind::Ground
                };
                self.queue.push(PanelCommand::Detect { kind });
                EventOutcome::Forwarded
            }
            PanelEvent::UsableToggled { checked } => {
                self.qa.usable.checked = checked;
                self.queue.push(PanelCommand::SetUsable { usable: checked });
                EventOutcome::Forwarded
            }
            PanelEvent::QualityFlagClicked { flag } => {
                self.qa.quality.selected = Some(flag);
                self.queue.push(PanelCommand::SetQualityFlag { flag });
                EventOutcome::Forwarded
            }
            PanelEvent::QaTextCommitted { field, text } => {
                if let Some(row) = self.qa.comment_mut(field) {
                    row.text = text.clone();
                }
                self.queue.push(PanelCommand::SetQaText { field, text });
                EventOutcome::Forwarded
            }
        }
    }

    pub fn take_commands(&mut self) -> Vec<PanelCommand> {
        self.queue.drain()
    }

    pub fn next_command(&mut self) -> Option<PanelCommand> {
        self.queue.pop()
    }

    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    pub fn recording(&self) -> &RecordingFields {
        &self.recording
    }

    pub fn device(&self) -> &DeviceFields {
        &self.device
    }

    pub fn drift(&self) -> &DriftFields {
        &self.drift
    }

    pub fn markers(&self) -> &[MarkerRow] {
        &self.markers
    }

    pub fn marker_text(&self, label: &str) -> Option<&str> {
        self.marker_index(label)
            .map(|idx| self.markers[idx].text.as_str())
    }

    pub fn usable(&self) -> bool {
        self.qa.usable.checked
    }

    pub fn quality_flag(&self) -> &QaFlagRow {
        &self.qa.quality
    }

    pub fn qa_text(&self, field: QaTextField) -> &str {
        self.qa
            .comments
            .iter()
            .find(|row| row.field == field)
            .map(|row| row.text.as_str())
            .unwrap_or_default()
    }

    pub fn render(&self) -> SidebarView {
        let r = &self.recording;
        let recording = vec![
            SidebarRow::Field(FieldRow::new("Name", r.name.clone())),
            SidebarRow::Field(FieldRow::new("Pnt File", r.pnt_file.clone())),
            SidebarRow::Field(FieldRow::new("Timestamp", r.timestamp.clone())),
            SidebarRow::Coordinates(CoordinatesRow {
                name: "Coordinates",
                cell: r.coordinates.clone(),
            }),
            SidebarRow::Field(FieldRow::new("Length", r.length.clone())),
            SidebarRow::Field(FieldRow::new("Spatial Resolution", r.spatial_resolution.clone())),
            SidebarRow::Field(FieldRow::new("Overload Force", r.overload.clone())),
            SidebarRow::Field(FieldRow::new("Speed", r.speed.clone())),
        ];

        let d = &self.device;
        let device = vec![
            FieldRow::new("Serial Number", d.serial.clone()),
            FieldRow::new("Firmware Version", d.firmware.clone()),
            FieldRow::new("Max. Recording Length", d.max_length.clone()),
            FieldRow::new("Tip Diameter", d.tip_diameter.clone()),
            FieldRow::new("Sensor Sensitivity", d.sensor_sensitivity.clone()),
            FieldRow::new("Sensor Serial Number", d.sensor_serial.clone()),
            FieldRow::new("Amplifier Serial Number", d.amplifier_serial.clone()),
        ];

        let mut qa = vec![
            SidebarRow::QaCheckbox(self.qa.usable.clone()),
            SidebarRow::QaFlag((&self.qa.quality).into()),
        ];
        qa.extend(self.qa.comments.iter().cloned().map(SidebarRow::QaComment));

        let dr = &self.drift;
        let drift = vec![
            FieldRow::new("Begin", dr.begin.clone()),
            FieldRow::new("End", dr.end.clone()),
            FieldRow::new("Drift", dr.drift.clone()),
            FieldRow::new("Offset", dr.offset.clone()),
            FieldRow::new("Noise", dr.noise.clone()),
        ];

        SidebarView {
            sections: vec![
                SidebarSection {
                    title: RECORDING_SECTION,
                    rows: recording,
                },
                SidebarSection {
                    title: SMP_SECTION,
                    rows: device.into_iter().map(SidebarRow::Field).collect(),
                },
                SidebarSection {
                    title: MARKERS_SECTION,
                    rows: self.markers.iter().cloned().map(SidebarRow::Marker).collect(),
                },
                SidebarSection {
                    title: QA_SECTION,
                    rows: qa,
                },
                SidebarSection {
                    title: DRIFT_SECTION,
                    rows: drift.into_iter().map(SidebarRow::Field).collect(),
                },
            ],
        }
    }

    fn marker_index(&self, label: &str) -> Option<usize> {
        self.markers.iter().position(|row| row.label == label)
    }
}

impl Default for SidebarPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Coordinates, QualityFlag, Samples, SmpDevice};
    use chrono::NaiveDateTime;

    fn sample_profile() -> Profile {
        let mut profile = Profile {
            name: "S37M0876".into(),
            pnt_file: "profiles/S37M0876.pnt".into(),
            timestamp: NaiveDateTime::parse_from_str("2017-01-20 10:25:32", "%Y-%m-%d %H:%M:%S")
                .ok(),
            recording_length: 1234.4,
            spatial_resolution: 0.004,
            overload: 40.0,
            speed: 20.0,
            coordinates: Some(Coordinates::new(47.123456, 8.987654)),
            device: SmpDevice {
                serial: "0876".into(),
                firmware: "3.02".into(),
                length: 1000,
                tip_diameter: 5000.0,
                sensor_sensitivity: 9.12,
                sensor_serial: "SN5120".into(),
                amplifier_serial: "AMP-22".into(),
            },
            samples: Samples::new(vec![0.0, 0.004, 0.008], vec![0.01, 0.02, 0.03]).unwrap(),
            ..Default::default()
        };
        profile.set_marker(SURFACE, 12.0);
        profile.set_marker(GROUND, 640.25);
        profile.qa.quality_flag = QualityFlag::Good;
        profile.qa.comment = "windpacked".into();
        profile
    }

    #[test]
    fn bind_formats_every_field() {
        let mut panel = SidebarPanel::new();
        panel.bind(Some(&sample_profile()));

        let r = panel.recording();
        assert_eq!(r.name, "S37M0876");
        assert_eq!(r.pnt_file, "profiles/S37M0876.pnt");
        assert_eq!(r.timestamp, "2017-01-20 10:25:32");
        assert_eq!(r.length, "1234 mm (3 Samples)");
        assert_eq!(r.spatial_resolution, "4.000 µm");
        assert_eq!(r.overload, "40.0 N");
        assert_eq!(r.speed, "20.0 mm/s");
        assert_eq!(r.coordinates.text, "47.123456, 8.987654");

        let d = panel.device();
        assert_eq!(d.serial, "0876");
        assert_eq!(d.max_length, "1000 mm");
        assert_eq!(d.tip_diameter, "5.0 mm");
        assert_eq!(d.sensor_sensitivity, "9.12 pC/N");
        assert_eq!(d.amplifier_serial, "AMP-22");

        assert_eq!(panel.marker_text(SURFACE), Some("12.000"));
        assert_eq!(panel.marker_text(GROUND), Some("640.250"));
        assert_eq!(panel.quality_flag().summary(), "2: good");
        assert_eq!(panel.qa_text(QaTextField::Comment), "windpacked");
        assert!(panel.usable());
        assert_eq!(panel.pending_commands(), 0);
    }

    #[test]
    fn bind_none_keeps_previous_state() {
        let mut panel = SidebarPanel::new();
        panel.bind(Some(&sample_profile()));
        panel.bind(None);
        assert_eq!(panel.recording().name, "S37M0876");
        assert_eq!(panel.markers().len(), 2);
    }

    #[test]
    fn rebind_discards_markers_of_previous_profile() {
        let mut panel = SidebarPanel::new();
        panel.bind(Some(&sample_profile()));
        panel.set_marker("crust", Some(80.0));
        panel.set_drift("surface", "ground", 1e-6, 2e-3, 3e-3);

        let mut other = Profile {
            name: "S37M0877".into(),
            ..Default::default()
        };
        other.set_marker("ground", 300.0);
        panel.bind(Some(&other));

        let labels: Vec<&str> = panel.markers().iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, vec![GROUND]);
        assert_eq!(panel.recording().coordinates.text, "None");
        assert_eq!(panel.drift().drift, "");
        assert_eq!(panel.pending_commands(), 0);
    }

    #[test]
    fn set_marker_creates_updates_and_removes_rows() {
        let mut panel = SidebarPanel::new();
        panel.set_marker("crust", Some(80.12345));
        assert_eq!(panel.marker_text("crust"), Some("80.123"));
        panel.set_marker("crust", Some(81.0));
        assert_eq!(panel.markers().len(), 1);
        assert_eq!(panel.marker_text("crust"), Some("81.000"));

        panel.set_marker("crust", None);
        assert!(panel.marker_text("crust").is_none());
        assert_eq!(
            panel.take_commands(),
            vec![PanelCommand::ClearMarker {
                label: "crust".into()
            }]
        );

        panel.set_marker("crust", None);
        assert!(panel.marker_text("crust").is_none());
        assert_eq!(panel.pending_commands(), 0);

        panel.set_marker("crust", Some(5.0));
        assert_eq!(panel.marker_text("crust"), Some("5.000"));
    }

    #[test]
    fn only_builtin_markers_are_detectable() {
        let mut panel = SidebarPanel::new();
        panel.bind(Some(&sample_profile()));
        panel.set_marker("crust", Some(80.0));

        let flags: Vec<(String, bool)> = panel
            .markers()
            .iter()
            .map(|row| (row.label.clone(), row.detectable))
            .collect();
        assert_eq!(
            flags,
            vec![
                (SURFACE.to_string(), true),
                (GROUND.to_string(), true),
                ("crust".to_string(), false)
            ]
        );
    }

    #[test]
    fn marker_edits_forward_only_valid_numbers() {
        let mut panel = SidebarPanel::new();
        panel.bind(Some(&sample_profile()));

        let outcome = panel.handle(PanelEvent::MarkerEdited {
            label: SURFACE.into(),
            text: "abc".into(),
        });
        assert_eq!(outcome, EventOutcome::Rejected);
        assert_eq!(panel.pending_commands(), 0);
        assert_eq!(panel.marker_text(SURFACE), Some("12.000"));

        let outcome = panel.handle(PanelEvent::MarkerEdited {
            label: SURFACE.into(),
            text: "13.5".into(),
        });
        assert_eq!(outcome, EventOutcome::Forwarded);
        assert_eq!(
            panel.take_commands(),
            vec![PanelCommand::SetMarker {
                label: SURFACE.into(),
                value: 13.5
            }]
        );
    }

    #[test]
    fn marker_actions_dispatch_per_label() {
        let mut panel = SidebarPanel::new();
        panel.bind(Some(&sample_profile()));
        panel.set_marker("crust", Some(80.0));

        panel.handle(PanelEvent::MarkerDetect {
            label: SURFACE.into(),
        });
        panel.handle(PanelEvent::MarkerDetect {
            label: GROUND.into(),
        });
        let crust = panel.handle(PanelEvent::MarkerDetect {
            label: "crust".into(),
        });
        panel.handle(PanelEvent::MarkerDeleted {
            label: "crust".into(),
        });
        let missing = panel.handle(PanelEvent::MarkerDeleted {
            label: "missing".into(),
        });

        assert_eq!(crust, EventOutcome::Ignored);
        assert_eq!(missing, EventOutcome::Ignored);
        assert_eq!(
            panel.take_commands(),
            vec![
                PanelCommand::Detect {
                    kind: DetectKind::Surface
                },
                PanelCommand::Detect {
                    kind: DetectKind::Ground
                },
                PanelCommand::ClearMarker {
                    label: "crust".into()
                },
            ]
        );
        // Deleting only asks; the row stays until the controller reflects it.
        assert_eq!(panel.marker_text("crust"), Some("80.000"));
    }

    #[test]
    fn quality_picker_labels_and_colors_each_level() {
        let mut panel = SidebarPanel::new();
        let expected = [
            (0, "0: not set", "black"),
            (1, "1: excellent", "green"),
            (2, "2: good", "#8B8000"),
            (3, "3: satisfying", "orange"),
            (4, "4: sufficient", "red"),
            (9, "9: unsatisfactory", "#630700"),
        ];
        assert_eq!(QualityFlag::ALL.len(), expected.len());

        for (level, summary, color) in expected {
            let flag = QualityFlag::from_level(level).unwrap();
            assert_eq!(
                panel.handle(PanelEvent::QualityFlagClicked { flag }),
                EventOutcome::Forwarded
            );
            assert_eq!(panel.quality_flag().summary(), summary);
            assert_eq!(panel.quality_flag().summary_color(), Some(color));
            assert_eq!(
                panel.take_commands(),
                vec![PanelCommand::SetQualityFlag { flag }]
            );
        }

        let buttons = panel.quality_flag().buttons();
        assert_eq!(buttons.len(), 6);
        assert_eq!(buttons.iter().filter(|b| b.checked).count(), 1);
    }

    #[test]
    fn qa_text_is_forwarded_verbatim() {
        let mut panel = SidebarPanel::new();
        panel.handle(PanelEvent::UsableToggled { checked: false });
        panel.handle(PanelEvent::QaTextCommitted {
            field: QaTextField::Experiment,
            text: "  RHOSSA 2016 <raw> ".into(),
        });
        assert!(!panel.usable());
        assert_eq!(panel.qa_text(QaTextField::Experiment), "  RHOSSA 2016 <raw> ");
        assert_eq!(
            panel.take_commands(),
            vec![
                PanelCommand::SetUsable { usable: false },
                PanelCommand::SetQaText {
                    field: QaTextField::Experiment,
                    text: "  RHOSSA 2016 <raw> ".into()
                },
            ]
        );
    }

    #[test]
    fn set_drift_converts_units() {
        let mut panel = SidebarPanel::new();
        panel.set_drift("drift_begin", "surface", 1e-6, 2e-3, 3e-3);
        let drift = panel.drift();
        assert_eq!(drift.begin, "drift_begin");
        assert_eq!(drift.end, "surface");
        assert_eq!(drift.drift, "1 mN/m");
        assert_eq!(drift.offset, "2.00 mN");
        assert_eq!(drift.noise, "3.00 mN");
    }

    #[test]
    fn clear_drift_blanks_previous_result() {
        let mut panel = SidebarPanel::new();
        panel.set_drift("start", "surface", 1e-6, 2e-3, 3e-3);
        panel.clear_drift();
        assert_eq!(panel.drift(), &DriftFields::default());
    }

    #[test]
    fn render_lists_sections_in_order() {
        let mut panel = SidebarPanel::new();
        panel.bind(Some(&sample_profile()));
        let view = panel.render();

        let titles: Vec<&str> = view.sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![RECORDING_SECTION, SMP_SECTION, MARKERS_SECTION, QA_SECTION, DRIFT_SECTION]
        );
        assert_eq!(view.section(MARKERS_SECTION).unwrap().rows.len(), 2);
        assert_eq!(view.section(QA_SECTION).unwrap().rows.len(), 5);

        let text = view.to_string();
        assert!(text.contains(
            "Coordinates: 47.123456, 8.987654 <https://www.google.com/maps/search/?api=1&query=47.123456,8.987654>"
        ));
        assert!(text.contains("[del][detect] surface: 12.000"));
        assert!(text.contains("quality_flag: [0][1]<2>[3][4][9] 2: good"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["sections"][2]["rows"][0]["kind"], "marker");
        assert_eq!(json["sections"][3]["rows"][1]["summary"], "2: good");
    }
}
