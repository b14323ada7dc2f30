use crate::profile::{QaTextField, QualityFlag};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Which built-in marker a detect action recomputes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectKind {
    Surface,
    Ground,
}

/// Request from the sidebar to the controller, the only writer of the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PanelCommand {
    SetMarker { label: String, value: f64 },
    ClearMarker { label: String },
    Detect { kind: DetectKind },
    SetUsable { usable: bool },
    SetQualityFlag { flag: QualityFlag },
    SetQaText { field: QaTextField, text: String },
}

/// User interaction with a sidebar row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PanelEvent {
    /// Marker text edit was committed (enter or focus loss).
    MarkerEdited { label: String, text: String },
    MarkerDeleted { label: String },
    MarkerDetect { label: String },
    UsableToggled { checked: bool },
    QualityFlagClicked { flag: QualityFlag },
    QaTextCommitted { field: QaTextField, text: String },
}

/// What the sidebar did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// A command was queued for the controller.
    Forwarded,
    /// Input failed validation; nothing was queued.
    Rejected,
    /// The event targets a row or action that does not exist.
    Ignored,
}

/// FIFO of commands waiting for the controller.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<PanelCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: PanelCommand) {
        self.pending.push_back(command);
    }

    pub fn pop(&mut self) -> Option<PanelCommand> {
        self.pending.pop_front()
    }

    pub fn drain(&mut self) -> Vec<PanelCommand> {
        self.pending.drain(..).collect()
    }

    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_preserves_order() {
        let mut queue = CommandQueue::new();
        queue.push(PanelCommand::Detect {
            kind: DetectKind::Surface,
        });
        queue.push(PanelCommand::ClearMarker {
            label: "ground".into(),
        });
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.pop(),
            Some(PanelCommand::Detect {
                kind: DetectKind::Surface
            })
        );
        assert_eq!(queue.drain().len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: PanelEvent =
            serde_json::from_str(r#"{"event":"quality_flag_clicked","flag":9}"#).unwrap();
        assert_eq!(
            event,
            PanelEvent::QualityFlagClicked {
                flag: QualityFlag::Unsatisfactory
            }
        );

        let event: PanelEvent = serde_json::from_str(
            r#"{"event":"qa_text_committed","field":"details","text":"wet snow"}"#,
        )
        .unwrap();
        assert!(matches!(
            event,
            PanelEvent::QaTextCommitted {
                field: QaTextField::Details,
                ..
            }
        ));

        assert!(serde_json::from_str::<PanelEvent>(
            r#"{"event":"quality_flag_clicked","flag":5}"#
        )
        .is_err());
    }
}
