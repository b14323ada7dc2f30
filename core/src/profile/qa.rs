use crate::profile::ProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Graded data-quality rating. Only these six levels exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum QualityFlag {
    #[default]
    NotSet,
    Excellent,
    Good,
    Satisfying,
    Sufficient,
    Unsatisfactory,
}

impl QualityFlag {
    /// Picker order.
    pub const ALL: [QualityFlag; 6] = [
        QualityFlag::NotSet,
        QualityFlag::Excellent,
        QualityFlag::Good,
        QualityFlag::Satisfying,
        QualityFlag::Sufficient,
        QualityFlag::Unsatisfactory,
    ];

    pub fn level(self) -> u8 {
        match self {
            QualityFlag::NotSet => 0,
            QualityFlag::Excellent => 1,
            QualityFlag::Good => 2,
            QualityFlag::Satisfying => 3,
            QualityFlag::Sufficient => 4,
            QualityFlag::Unsatisfactory => 9,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.level() == level)
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityFlag::NotSet => "not set",
            QualityFlag::Excellent => "excellent",
            QualityFlag::Good => "good",
            QualityFlag::Satisfying => "satisfying",
            QualityFlag::Sufficient => "sufficient",
            QualityFlag::Unsatisfactory => "unsatisfactory",
        }
    }

    /// CSS colour of the picker button and summary.
    pub fn color(self) -> &'static str {
        match self {
            QualityFlag::NotSet => "black",
            QualityFlag::Excellent => "green",
            QualityFlag::Good => "#8B8000",
            QualityFlag::Satisfying => "orange",
            QualityFlag::Sufficient => "red",
            QualityFlag::Unsatisfactory => "#630700",
        }
    }

    /// Summary text shown under the picker, e.g. `"2: good"`.
    pub fn summary(self) -> String {
        format!("{}: {}", self.level(), self.label())
    }
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl TryFrom<u8> for QualityFlag {
    type Error = ProfileError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::from_level(level).ok_or(ProfileError::InvalidQualityLevel(level))
    }
}

impl From<QualityFlag> for u8 {
    fn from(flag: QualityFlag) -> Self {
        flag.level()
    }
}

/// Free-text QA fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaTextField {
    Comment,
    Details,
    Experiment,
}

impl QaTextField {
    pub const ALL: [QaTextField; 3] = [
        QaTextField::Comment,
        QaTextField::Details,
        QaTextField::Experiment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QaTextField::Comment => "comment",
            QaTextField::Details => "details",
            QaTextField::Experiment => "experiment",
        }
    }
}

/// Quality-assurance annotations carried with a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaRecord {
    pub usable: bool,
    pub quality_flag: QualityFlag,
    pub comment: String,
    pub details: String,
    pub experiment: String,
}

impl Default for QaRecord {
    fn default() -> Self {
        Self {
            usable: true,
            quality_flag: QualityFlag::NotSet,
            comment: String::new(),
            details: String::new(),
            experiment: String::new(),
        }
    }
}

impl QaRecord {
    pub fn text(&self, field: QaTextField) -> &str {
        match field {
            QaTextField::Comment => &self.comment,
            QaTextField::Details => &self.details,
            QaTextField::Experiment => &self.experiment,
        }
    }

    pub fn set_text(&mut self, field: QaTextField, text: String) {
        match field {
            QaTextField::Comment => self.comment = text,
            QaTextField::Details => self.details = text,
            QaTextField::Experiment => self.experiment = text,
        }
    }
}
