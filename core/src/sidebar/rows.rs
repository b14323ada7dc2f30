use crate::profile::{QaTextField, QualityFlag};
use crate::sidebar::format::CoordinatesCell;
use serde::Serialize;

/// Read-only `name: value` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub name: &'static str,
    pub value: String,
}

impl FieldRow {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinatesRow {
    pub name: &'static str,
    #[serde(flatten)]
    pub cell: CoordinatesCell,
}

/// Editable marker row with delete and, for surface/ground, detect actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerRow {
    pub label: String,
    /// Value formatted to three decimals.
    pub text: String,
    pub deletable: bool,
    pub detectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaCheckboxRow {
    pub name: &'static str,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerButton {
    pub level: u8,
    pub color: &'static str,
    pub checked: bool,
}

/// Quality flag picker: one button per level plus a summary label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaFlagRow {
    pub name: &'static str,
    pub selected: Option<QualityFlag>,
}

impl QaFlagRow {
    pub fn buttons(&self) -> Vec<PickerButton> {
        QualityFlag::ALL
            .iter()
            .map(|flag| PickerButton {
                level: flag.level(),
                color: flag.color(),
                checked: self.selected == Some(*flag),
            })
            .collect()
    }

    /// Empty until a flag is chosen.
    pub fn summary(&self) -> String {
        self.selected.map(QualityFlag::summary).unwrap_or_default()
    }

    pub fn summary_color(&self) -> Option<&'static str> {
        self.selected.map(QualityFlag::color)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaCommentRow {
    pub field: QaTextField,
    pub text: String,
}

/// Rendered picker state, flattened for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaFlagView {
    pub name: &'static str,
    pub buttons: Vec<PickerButton>,
    pub summary: String,
    pub summary_color: Option<&'static str>,
}

impl From<&QaFlagRow> for QaFlagView {
    fn from(row: &QaFlagRow) -> Self {
        Self {
            name: row.name,
            buttons: row.buttons(),
            summary: row.summary(),
            summary_color: row.summary_color(),
        }
    }
}

/// Every kind of row the sidebar tree can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SidebarRow {
    Field(FieldRow),
    Coordinates(CoordinatesRow),
    Marker(MarkerRow),
    QaCheckbox(QaCheckboxRow),
    QaFlag(QaFlagView),
    QaComment(QaCommentRow),
}
